//! # Reconciled Matrix
//!
//! Dense customer × module view produced once per run by the reconciler and
//! consumed by the report sink.

use super::CellValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One report row: a customer and its lag per expected module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixRow {
    pub customer_id: i64,
    pub customer_name: String,
    /// Keys are exactly the expected modules, in expected order
    pub lag_by_module: IndexMap<String, f64>,
}

impl MatrixRow {
    pub fn lag(&self, module: &str) -> Option<f64> {
        self.lag_by_module.get(module).copied()
    }

    /// Render as `[customer_id, customer_name, lag...]`
    pub fn to_cells(&self) -> Vec<CellValue> {
        let mut cells = Vec::with_capacity(self.lag_by_module.len() + 2);
        cells.push(CellValue::Integer(self.customer_id));
        cells.push(CellValue::Text(self.customer_name.clone()));
        cells.extend(self.lag_by_module.values().map(|lag| CellValue::Number(*lag)));
        cells
    }
}

/// Anomalies observed while reconciling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationStats {
    /// Delay records received across all batches
    pub input_records: usize,
    /// Records ignored because the customer already had a lag for that module
    pub duplicate_records: usize,
    /// Records ignored because their module is not an expected column
    pub dropped_records: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconciledMatrix {
    pub expected_modules: Vec<String>,
    pub rows: Vec<MatrixRow>,
    pub stats: ReconciliationStats,
}

impl ReconciledMatrix {
    /// A matrix with nothing to report
    pub fn empty(expected_modules: &[String]) -> Self {
        Self {
            expected_modules: expected_modules.to_vec(),
            rows: Vec::new(),
            stats: ReconciliationStats::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Width of the rendered report, leading customer columns included
    pub fn column_count(&self) -> usize {
        crate::constants::LEADING_REPORT_COLUMNS + self.expected_modules.len()
    }

    /// Cell values in report order, ready to be written to a destination
    pub fn to_rows(&self) -> Vec<Vec<CellValue>> {
        self.rows.iter().map(MatrixRow::to_cells).collect()
    }
}
