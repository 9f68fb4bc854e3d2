//! # Pipeline Types
//!
//! Results exchanged between the coordinator and its callers.

use super::report_sink::PublishOutcome;
use crate::error::BatchEvaluationError;
use crate::models::{DelayRecord, ReconciliationStats};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Result of evaluating one batch, collected at the join barrier
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    pub batch_index: usize,
    pub customers: usize,
    pub result: Result<Vec<DelayRecord>, BatchEvaluationError>,
}

/// A batch excluded from reconciliation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub batch_index: usize,
    pub customers: usize,
    pub error: String,
}

/// Summary of one completed pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    /// Customers returned by the source
    pub customers_fetched: usize,
    /// Customers dropped for having no modules
    pub customers_filtered: usize,
    pub batches: usize,
    pub failed_batches: Vec<BatchFailure>,
    pub delay_records: usize,
    pub reconciliation: ReconciliationStats,
    pub rows: usize,
    pub publish: PublishOutcome,
    pub duration: Duration,
}

impl RunSummary {
    pub fn succeeded_batches(&self) -> usize {
        self.batches - self.failed_batches.len()
    }

    pub fn is_partial(&self) -> bool {
        !self.failed_batches.is_empty()
    }
}
