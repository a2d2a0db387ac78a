use std::{
    fs::{self, File},
    io::{self, BufRead, BufReader, BufWriter},
    path::Path,
};

use anyhow::{Context, Result};
use tracing::info;

use crate::{
    application::commands::{InputSource, SplitSqlCommand, SplitSqlResult},
    infrastructure::segmented_writer::SegmentedWriter,
};

#[derive(Debug, Default)]
pub struct SplitSqlScriptUseCase;

impl SplitSqlScriptUseCase {
    pub fn execute(&self, command: SplitSqlCommand) -> Result<SplitSqlResult> {
        let input = open_input(&command.input)?;
        let mut writer = build_writer(&command)?;
        writer.set_header(command.header);
        writer.append_footer(&command.footer);

        let mut line_count = 0usize;
        for line in input.lines() {
            let line = line
                .with_context(|| format!("Unable to read SQL input from {}", command.input))?;
            writer.write_line(&line).with_context(|| {
                format!(
                    "Unable to write line {} of {}",
                    line_count + 1,
                    command.input
                )
            })?;
            line_count += 1;
        }

        let segments = writer.finish().context("Unable to finalize SQL output")?;
        info!(
            "Split {line_count} lines from {} into {} file(s)",
            command.input,
            segments.len()
        );

        Ok(SplitSqlResult {
            segments,
            line_count,
        })
    }
}

fn open_input(input: &InputSource) -> Result<Box<dyn BufRead>> {
    match input {
        InputSource::File(path) => {
            let file = File::open(path)
                .with_context(|| format!("Unable to open SQL file: {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        InputSource::Stdin => Ok(Box::new(io::stdin().lock())),
    }
}

fn build_writer(command: &SplitSqlCommand) -> Result<SegmentedWriter> {
    let Some(output_path) = &command.output else {
        create_parent_dir(Path::new(&command.base_name))?;
        return Ok(SegmentedWriter::new(
            command.base_name.clone(),
            command.starting_segment,
            command.statement_limit,
        ));
    };

    create_parent_dir(output_path)?;
    let output_file = File::create(output_path)
        .with_context(|| format!("Unable to create file: {}", output_path.display()))?;
    let writer = SegmentedWriter::with_destination(
        command.base_name.clone(),
        command.starting_segment,
        BufWriter::new(output_file),
        output_path.display().to_string(),
    )?;
    Ok(writer)
}

fn create_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .with_context(|| format!("Unable to create directory: {}", parent.display())),
        _ => Ok(()),
    }
}
