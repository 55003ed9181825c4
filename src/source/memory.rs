//! In-memory row source.

use monsync_types::Row;

use super::RowSource;
use crate::error::Result;

/// A source holding rows that were already read or built in code.
#[derive(Debug, Clone)]
pub struct MemorySource {
    rows: Vec<Row>,
    description: String,
}

impl MemorySource {
    pub fn new(rows: Vec<Row>) -> Self {
        let description = format!("memory: {} rows", rows.len());
        Self { rows, description }
    }
}

impl RowSource for MemorySource {
    fn read_rows(&mut self) -> Result<Vec<Row>> {
        Ok(self.rows.clone())
    }

    fn description(&self) -> &str {
        &self.description
    }
}
