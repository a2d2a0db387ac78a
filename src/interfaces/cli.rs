use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Result, anyhow};
use clap::Parser;
use console::style;
use dialoguer::{Confirm, Editor, Input, theme::ColorfulTheme};

use crate::{
    application::commands::{InputSource, SplitSqlCommand},
    domain::{
        segment::DEFAULT_STARTING_SEGMENT,
        statement::{DEFAULT_STATEMENT_LIMIT, StatementLimit},
    },
};

const DEFAULT_BASE_NAME: &str = "migration";
const STDIN_MARKER: &str = "-";

#[derive(Debug, Parser)]
#[command(
    name = "sql-segmenter",
    version,
    about = "Split a SQL script into numbered files with a bounded statement count"
)]
pub struct CliArgs {
    #[arg(long, short = 'i', help = "SQL script to split, or - for stdin")]
    input: Option<String>,
    #[arg(long, short = 'b', default_value = DEFAULT_BASE_NAME, help = "Prefix of generated segment files")]
    base_name: String,
    #[arg(long, short = 's', default_value_t = DEFAULT_STARTING_SEGMENT)]
    start_segment: u32,
    #[arg(long, short = 'l', default_value_t = DEFAULT_STATEMENT_LIMIT, help = "Statements per segment")]
    statement_limit: usize,
    #[arg(long, help = "Header text written at the top of every file")]
    header: Option<String>,
    #[arg(long, help = "Read header text from file path")]
    header_file: Option<PathBuf>,
    #[arg(long, help = "Footer text written at the end of every file")]
    footer: Option<String>,
    #[arg(long, help = "Read footer text from file path")]
    footer_file: Option<PathBuf>,
    #[arg(long, short = 'o', help = "Write everything to this single file instead of segmenting")]
    output: Option<PathBuf>,
    #[arg(long, short = 'v', help = "Log each segment as it is opened")]
    pub verbose: bool,
}

impl CliArgs {
    /// `None` when the program was started without arguments.
    pub fn from_env() -> Option<Self> {
        if env::args_os().len() == 1 {
            return None;
        }
        Some(Self::parse())
    }
}

pub fn collect_split_command(args: Option<CliArgs>) -> Result<SplitSqlCommand> {
    match args {
        Some(args) => collect_command_from_args(args),
        None => collect_interactive_command(),
    }
}

fn collect_command_from_args(args: CliArgs) -> Result<SplitSqlCommand> {
    let input = args
        .input
        .ok_or_else(|| anyhow!("--input is required when using argument mode"))?;
    let base_name = ensure_non_empty_value(args.base_name, "Base name")?;

    Ok(SplitSqlCommand {
        input: parse_input_source(&input),
        base_name,
        starting_segment: args.start_segment,
        statement_limit: StatementLimit::new(args.statement_limit)?,
        header: read_text_from_sources(args.header, args.header_file, "header")?,
        footer: read_text_from_sources(args.footer, args.footer_file, "footer")?,
        output: args.output,
    })
}

fn collect_interactive_command() -> Result<SplitSqlCommand> {
    let theme = ColorfulTheme::default();

    println!();
    println!(
        "{}",
        style(" SQL SEGMENTER ")
            .black()
            .on_cyan()
            .bold()
            .underlined()
    );
    println!("{}", style("Split a SQL script into bounded files").dim());
    println!();

    let input_path: String = Input::with_theme(&theme)
        .with_prompt("SQL script path")
        .validate_with(|value: &String| {
            if Path::new(value.trim()).is_file() {
                Ok(())
            } else {
                Err("SQL script must be an existing file")
            }
        })
        .interact_text()?;

    let fixed_output = Confirm::with_theme(&theme)
        .with_prompt("Write everything to a single file?")
        .default(false)
        .interact()?;

    let (base_name, starting_segment, statement_limit, output) = if fixed_output {
        let output_name: String = Input::with_theme(&theme)
            .with_prompt("Output file")
            .default(format!("{DEFAULT_BASE_NAME}.sql"))
            .interact_text()?;
        (
            DEFAULT_BASE_NAME.to_string(),
            DEFAULT_STARTING_SEGMENT,
            StatementLimit::default(),
            Some(PathBuf::from(output_name.trim())),
        )
    } else {
        let base_name: String = Input::with_theme(&theme)
            .with_prompt("Segment file prefix")
            .default(DEFAULT_BASE_NAME.to_string())
            .validate_with(|value: &String| {
                if value.trim().is_empty() {
                    Err("Segment file prefix must not be empty")
                } else {
                    Ok(())
                }
            })
            .interact_text()?;

        let starting_segment: u32 = Input::with_theme(&theme)
            .with_prompt("First segment number")
            .default(DEFAULT_STARTING_SEGMENT)
            .interact_text()?;

        let statement_limit: usize = Input::with_theme(&theme)
            .with_prompt("Statements per segment")
            .default(DEFAULT_STATEMENT_LIMIT)
            .validate_with(|value: &usize| {
                if *value == 0 {
                    Err("Statements per segment must be greater than 0")
                } else {
                    Ok(())
                }
            })
            .interact_text()?;

        (
            base_name.trim().to_string(),
            starting_segment,
            StatementLimit::new(statement_limit)?,
            None,
        )
    };

    let header = edit_optional_text(&theme, "Edit header text in your editor?")?;
    let footer = edit_optional_text(&theme, "Edit footer text in your editor?")?;

    Ok(SplitSqlCommand {
        input: InputSource::File(PathBuf::from(input_path.trim())),
        base_name,
        starting_segment,
        statement_limit,
        header,
        footer,
        output,
    })
}

fn edit_optional_text(theme: &ColorfulTheme, prompt: &str) -> Result<String> {
    let wants_text = Confirm::with_theme(theme)
        .with_prompt(prompt)
        .default(false)
        .interact()?;
    if !wants_text {
        return Ok(String::new());
    }

    let edited = Editor::new().extension(".sql").edit("")?;
    Ok(edited.map(ensure_trailing_newline).unwrap_or_default())
}

fn parse_input_source(value: &str) -> InputSource {
    if value.trim() == STDIN_MARKER {
        InputSource::Stdin
    } else {
        InputSource::File(PathBuf::from(value))
    }
}

fn read_text_from_sources(
    text: Option<String>,
    file: Option<PathBuf>,
    field_name: &str,
) -> Result<String> {
    match (text, file) {
        (Some(_), Some(_)) => Err(anyhow!(
            "Please provide only one of --{field_name} or --{field_name}-file"
        )),
        (Some(text), None) => Ok(ensure_trailing_newline(text)),
        (None, Some(path)) => read_text_file(&path),
        (None, None) => Ok(String::new()),
    }
}

fn read_text_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|error| anyhow!("Unable to read file {}: {error}", path.display()))
}

/// Text passed inline gets a newline so it never shares a line with the SQL
/// that follows it.
fn ensure_trailing_newline(mut text: String) -> String {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

fn ensure_non_empty_value(value: String, field_name: &str) -> Result<String> {
    if value.trim().is_empty() {
        return Err(anyhow!("{field_name} must not be empty"));
    }
    Ok(value)
}
