//! Row source abstraction for reading the threshold table.
//!
//! A source yields every [`Row`] of the table or fails as a whole; there is
//! no partial result.

mod file;
mod memory;

pub use file::{CsvSource, REQUIRED_COLUMNS};
pub use memory::MemorySource;

use std::fmt::Debug;

use monsync_types::Row;

use crate::error::Result;

/// Trait for reading threshold rows from various backends.
///
/// # Example
///
/// ```
/// use monsync::{MemorySource, RowSource};
///
/// let mut source = MemorySource::new(Vec::new());
/// assert!(source.read_rows().unwrap().is_empty());
/// assert_eq!(source.description(), "memory: 0 rows");
/// ```
pub trait RowSource: Send + Debug {
    /// Read and validate every row.
    fn read_rows(&mut self) -> Result<Vec<Row>>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;
}
