use anyhow::Result;
use console::style;
use tracing_subscriber::EnvFilter;

use sql_segmenter::application::use_cases::split_sql_script::SplitSqlScriptUseCase;
use sql_segmenter::interfaces::cli::{CliArgs, collect_split_command};

fn main() -> Result<()> {
    let args = CliArgs::from_env();

    let filter = if args.as_ref().is_some_and(|args| args.verbose) {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let command = collect_split_command(args)?;
    let use_case = SplitSqlScriptUseCase;

    println!("{}", style("Splitting SQL script...").cyan());
    let result = use_case.execute(command)?;

    for segment in &result.segments {
        println!(
            "  {} ({} statements)",
            style(&segment.name).bold(),
            segment.statement_count
        );
    }
    println!(
        "{} {} ({} statements, {} lines)",
        style("SQL has been written to").green(),
        style(format!("{} file(s)", result.segments.len())).bold(),
        result.statement_count(),
        result.line_count,
    );
    Ok(())
}
