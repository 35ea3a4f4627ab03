//! Readers for raw catalogue tables.

pub mod vizier;

pub use vizier::{read_catalogue_file, read_catalogue_rows, DirectoryTableSource, TableSource};
