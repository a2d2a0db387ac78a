//! Segmented SQL output.
//!
//! [`SegmentedWriter`] streams SQL text into `<base_name><n>.sql` files,
//! starting a new file whenever the per-file statement limit is reached and
//! wrapping each file in header and footer text. It can also be bound to a
//! single caller-supplied destination, in which case it never segments.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use domain::error::{SegmentError, SegmentResult};
pub use domain::segment::SegmentSummary;
pub use domain::statement::{DEFAULT_STATEMENT_LIMIT, StatementLimit, count_statements};
pub use infrastructure::segmented_writer::SegmentedWriter;
