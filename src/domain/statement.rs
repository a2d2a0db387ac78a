use crate::domain::error::{SegmentError, SegmentResult};

pub const DEFAULT_STATEMENT_LIMIT: usize = 900;

/// Maximum number of statements written to one segment before rolling over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementLimit(usize);

impl StatementLimit {
    pub fn new(value: usize) -> SegmentResult<Self> {
        if value == 0 {
            return Err(SegmentError::InvalidConfiguration(
                "statement limit must be greater than 0".to_string(),
            ));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> usize {
        self.0
    }

    pub fn is_reached_by(self, statement_count: usize) -> bool {
        statement_count >= self.0
    }
}

impl Default for StatementLimit {
    fn default() -> Self {
        Self(DEFAULT_STATEMENT_LIMIT)
    }
}

/// Counts the lines of `text` whose last character is `;`.
///
/// This is a line heuristic, not a SQL parser: a semicolon inside a string
/// literal or comment at end of line counts, a statement terminated by `;`
/// followed by trailing text does not, and `\r\n` line endings never count.
pub fn count_statements(text: &str) -> usize {
    text.split('\n').filter(|line| line.ends_with(';')).count()
}
