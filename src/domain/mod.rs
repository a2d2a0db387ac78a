pub mod error;
pub mod segment;
pub mod statement;
