use std::{fmt, path::PathBuf};

use crate::domain::{segment::SegmentSummary, statement::StatementLimit};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    File(PathBuf),
    Stdin,
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::File(path) => write!(f, "{}", path.display()),
            InputSource::Stdin => f.write_str("<stdin>"),
        }
    }
}

#[derive(Debug)]
pub struct SplitSqlCommand {
    pub input: InputSource,
    pub base_name: String,
    pub starting_segment: u32,
    pub statement_limit: StatementLimit,
    pub header: String,
    pub footer: String,
    /// Single destination file; disables segmenting when set.
    pub output: Option<PathBuf>,
}

#[derive(Debug)]
pub struct SplitSqlResult {
    pub segments: Vec<SegmentSummary>,
    pub line_count: usize,
}

impl SplitSqlResult {
    pub fn statement_count(&self) -> usize {
        self.segments
            .iter()
            .map(|segment| segment.statement_count)
            .sum()
    }
}
