//! CSV threshold table source.
//!
//! Reads the table with header and field whitespace trimmed, checks that every
//! required column is present, then validates every row before returning any.

use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use monsync_types::Row;

use super::RowSource;
use crate::error::{Result, SyncError};

/// Columns the table must provide. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "Account_Name",
    "pluginset_name",
    "display_name",
    "critical",
    "warning",
    "Instances_InstanceId",
    "host_name",
];

/// Position of each required column in the header row.
#[derive(Debug, Clone, Copy)]
struct Columns([usize; REQUIRED_COLUMNS.len()]);

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self> {
        let mut indices = [0; REQUIRED_COLUMNS.len()];
        for (slot, column) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h == column)
                .ok_or(SyncError::MissingColumn { column })?;
        }
        Ok(Self(indices))
    }

    fn text<'r>(&self, record: &'r StringRecord, slot: usize, line: u64) -> Result<&'r str> {
        match record.get(self.0[slot]) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(SyncError::MalformedRow {
                line,
                reason: format!("missing value for `{}`", REQUIRED_COLUMNS[slot]),
            }),
        }
    }

    fn integer(&self, record: &StringRecord, slot: usize, line: u64) -> Result<i64> {
        let value = self.text(record, slot, line)?;
        value.parse().map_err(|_| SyncError::MalformedRow {
            line,
            reason: format!(
                "`{}` is not an integer: {:?}",
                REQUIRED_COLUMNS[slot], value
            ),
        })
    }

    fn row(&self, record: &StringRecord, line: u64) -> Result<Row> {
        Ok(Row {
            account: self.text(record, 0, line)?.to_string(),
            family: self.text(record, 1, line)?.to_string(),
            display_name: self.text(record, 2, line)?.to_string(),
            critical: self.integer(record, 3, line)?,
            warning: self.integer(record, 4, line)?,
            instance_id: self.text(record, 5, line)?.to_string(),
            host_name: self.text(record, 6, line)?.to_string(),
        })
    }
}

/// A source that reads threshold rows from a CSV file.
#[derive(Debug)]
pub struct CsvSource {
    path: PathBuf,
    description: String,
}

impl CsvSource {
    /// Create a new CSV source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("csv: {}", path.display());
        Self { path, description }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_error(&self, err: impl ToString) -> SyncError {
        SyncError::ReadInput {
            path: self.path.clone(),
            details: err.to_string(),
        }
    }
}

impl RowSource for CsvSource {
    fn read_rows(&mut self) -> Result<Vec<Row>> {
        if !self.path.is_file() {
            return Err(SyncError::MissingInput {
                path: self.path.clone(),
            });
        }

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .from_path(&self.path)
            .map_err(|e| self.read_error(e))?;

        let headers = reader.headers().map_err(|e| self.read_error(e))?.clone();
        let columns = Columns::locate(&headers)?;

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            // Header is line 1.
            let fallback_line = index as u64 + 2;
            let record = record.map_err(|e| SyncError::MalformedRow {
                line: e.position().map_or(fallback_line, |p| p.line()),
                reason: e.to_string(),
            })?;
            let line = record.position().map_or(fallback_line, |p| p.line());
            rows.push(columns.row(&record, line)?);
        }

        tracing::debug!(source = %self.description, rows = rows.len(), "Read threshold table");
        Ok(rows)
    }

    fn description(&self) -> &str {
        &self.description
    }
}
