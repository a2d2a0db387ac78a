use std::io;

use thiserror::Error;

pub type SegmentResult<T> = Result<T, SegmentError>;

/// Errors raised by [`SegmentedWriter`](crate::infrastructure::segmented_writer::SegmentedWriter).
#[derive(Debug, Error)]
pub enum SegmentError {
    /// The writer was constructed with settings it cannot honour.
    #[error("invalid segment writer configuration: {0}")]
    InvalidConfiguration(String),

    /// A segment file could not be created.
    #[error("failed to open output file {destination}: {source}")]
    OpenFailure {
        destination: String,
        #[source]
        source: io::Error,
    },

    /// Rolling over would need a segment number past `u32::MAX`.
    #[error("no segment number left after {base_name}{last}")]
    SegmentNumbersExhausted { base_name: String, last: u32 },

    /// Text could not be written to the current destination.
    #[error("failed to write to {destination}: {source}")]
    WriteFailure {
        destination: String,
        #[source]
        source: io::Error,
    },

    /// Flushing or closing a destination failed.
    #[error("failed to close {destination}: {source}")]
    CloseFailure {
        destination: String,
        #[source]
        source: io::Error,
    },
}
