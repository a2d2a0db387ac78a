pub const DEFAULT_STARTING_SEGMENT: u32 = 1;
pub const SEGMENT_EXTENSION: &str = ".sql";

/// File name of segment `segment_number`: the base name with the number and
/// `.sql` appended, with no separator.
pub fn segment_file_name(base_name: &str, segment_number: u32) -> String {
    format!("{base_name}{segment_number}{SEGMENT_EXTENSION}")
}

/// Identifying comment written as the first line of every destination.
pub fn destination_comment(destination_name: &str) -> String {
    format!("-- {destination_name}\n")
}

/// A destination the writer has closed, with the statements it received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentSummary {
    pub name: String,
    pub statement_count: usize,
}

#[cfg(test)]
mod tests {
    use super::{destination_comment, segment_file_name};

    #[test]
    fn appends_number_and_extension_to_base_name() {
        assert_eq!(segment_file_name("upgrade_stage1_", 3), "upgrade_stage1_3.sql");
        assert_eq!(segment_file_name("out/schema", 12), "out/schema12.sql");
    }

    #[test]
    fn comment_names_destination() {
        assert_eq!(destination_comment("schema1.sql"), "-- schema1.sql\n");
    }
}
