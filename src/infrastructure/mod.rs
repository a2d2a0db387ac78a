pub mod segmented_writer;
