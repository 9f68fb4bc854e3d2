//! # Report Destination
//!
//! Boundary to the shared spreadsheet that receives the reconciled report.
//!
//! The destination exposes exactly two operations: clearing a range and writing
//! rows starting at a range's anchor cell. Header rows above the range belong to
//! the report owner and are never touched.

use crate::models::{CellRange, CellValue};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DestinationError {
    #[error("destination unreachable: {0}")]
    Unreachable(String),

    #[error("destination rejected request: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait ReportDestination: Send + Sync {
    /// Backend name for logging
    fn backend_name(&self) -> &'static str;

    /// Clear every cell in `range`
    async fn clear(&self, destination_id: &str, range: &CellRange) -> Result<(), DestinationError>;

    /// Write `rows` into `range`, beginning at its anchor cell
    async fn write(
        &self,
        destination_id: &str,
        range: &CellRange,
        rows: &[Vec<CellValue>],
    ) -> Result<(), DestinationError>;
}

/// A concrete report location: which document, which range, and the backend serving it
#[derive(Clone)]
pub struct DestinationHandle {
    pub destination_id: String,
    pub range: CellRange,
    backend: Arc<dyn ReportDestination>,
}

impl DestinationHandle {
    pub fn new<S: Into<String>>(
        destination_id: S,
        range: CellRange,
        backend: Arc<dyn ReportDestination>,
    ) -> Self {
        Self {
            destination_id: destination_id.into(),
            range,
            backend,
        }
    }

    pub fn backend(&self) -> &dyn ReportDestination {
        self.backend.as_ref()
    }

    pub async fn clear(&self) -> Result<(), DestinationError> {
        self.backend.clear(&self.destination_id, &self.range).await
    }

    pub async fn write(&self, rows: &[Vec<CellValue>]) -> Result<(), DestinationError> {
        self.backend
            .write(&self.destination_id, &self.range, rows)
            .await
    }
}

impl fmt::Debug for DestinationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DestinationHandle")
            .field("destination_id", &self.destination_id)
            .field("range", &self.range.to_string())
            .field("backend", &self.backend.backend_name())
            .finish()
    }
}

/// Destination operation recorded by [`InMemorySpreadsheet`]
#[derive(Debug, Clone, PartialEq)]
pub enum DestinationCall {
    Clear {
        destination_id: String,
        range: CellRange,
    },
    Write {
        destination_id: String,
        range: CellRange,
        rows: usize,
    },
}

#[derive(Debug, Default)]
struct SheetState {
    /// Cells keyed by (destination_id, row, column)
    cells: BTreeMap<(String, u32, u32), CellValue>,
    calls: Vec<DestinationCall>,
}

/// Spreadsheet held in memory. Serves dry runs and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemorySpreadsheet {
    state: Arc<Mutex<SheetState>>,
}

impl InMemorySpreadsheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell directly, bypassing the destination contract
    pub fn seed(&self, destination_id: &str, row: u32, column: u32, value: CellValue) {
        self.state
            .lock()
            .cells
            .insert((destination_id.to_string(), row, column), value);
    }

    pub fn cell(&self, destination_id: &str, row: u32, column: u32) -> Option<CellValue> {
        self.state
            .lock()
            .cells
            .get(&(destination_id.to_string(), row, column))
            .cloned()
    }

    /// Every populated cell of a document as `(row, column, value)`, row-major
    pub fn cells(&self, destination_id: &str) -> Vec<(u32, u32, CellValue)> {
        self.state
            .lock()
            .cells
            .iter()
            .filter(|((id, _, _), _)| id == destination_id)
            .map(|((_, row, column), value)| (*row, *column, value.clone()))
            .collect()
    }

    pub fn calls(&self) -> Vec<DestinationCall> {
        self.state.lock().calls.clone()
    }
}

#[async_trait]
impl ReportDestination for InMemorySpreadsheet {
    fn backend_name(&self) -> &'static str {
        "in_memory"
    }

    async fn clear(&self, destination_id: &str, range: &CellRange) -> Result<(), DestinationError> {
        let mut state = self.state.lock();
        state.cells.retain(|(id, row, column), _| {
            id != destination_id || !range.contains(*column, *row)
        });
        state.calls.push(DestinationCall::Clear {
            destination_id: destination_id.to_string(),
            range: *range,
        });
        Ok(())
    }

    async fn write(
        &self,
        destination_id: &str,
        range: &CellRange,
        rows: &[Vec<CellValue>],
    ) -> Result<(), DestinationError> {
        let widest = rows.iter().map(Vec::len).max().unwrap_or(0);
        if rows.len() > range.row_capacity() || widest > range.column_capacity() {
            return Err(DestinationError::Rejected(format!(
                "{} rows x {} columns exceed range {}",
                rows.len(),
                widest,
                range
            )));
        }

        let mut state = self.state.lock();
        for (row_offset, row) in rows.iter().enumerate() {
            for (column_offset, value) in row.iter().enumerate() {
                state.cells.insert(
                    (
                        destination_id.to_string(),
                        range.start_row + row_offset as u32,
                        range.start_column + column_offset as u32,
                    ),
                    value.clone(),
                );
            }
        }
        state.calls.push(DestinationCall::Write {
            destination_id: destination_id.to_string(),
            range: *range,
            rows: rows.len(),
        });
        Ok(())
    }
}
