//! Error types for the delay monitor pipeline.
//!
//! The taxonomy follows the run lifecycle:
//! - [`ConfigurationError`]: invalid run configuration, fatal before any batch work
//! - [`BatchEvaluationError`]: one batch failed; isolated and excluded from reconciliation
//! - [`PublishError`]: the destination could not be overwritten; fatal for the run
//! - [`PipelineError`]: what a run surfaces to the scheduler

pub use crate::config::ConfigurationError;
use crate::services::{DestinationError, SourceError, WarehouseError};
use thiserror::Error;

/// Failure of a single batch evaluation. Never aborts the run on its own.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BatchEvaluationError {
    #[error("Malformed customer in batch {batch_index}: {reason}")]
    MalformedCustomer { batch_index: usize, reason: String },

    #[error("Lag strategy '{strategy}' failed for batch {batch_index}: {reason}")]
    Strategy {
        batch_index: usize,
        strategy: String,
        reason: String,
    },

    #[error("No lag computed for customer {customer_id} module '{module}' in batch {batch_index}")]
    MissingLag {
        batch_index: usize,
        customer_id: i64,
        module: String,
    },

    #[error("Non-finite lag {lag} for customer {customer_id} module '{module}' in batch {batch_index}")]
    NonFiniteLag {
        batch_index: usize,
        customer_id: i64,
        module: String,
        lag: f64,
    },

    #[error("Evaluation task for batch {batch_index} did not complete: {reason}")]
    TaskFailed { batch_index: usize, reason: String },
}

/// Errors raised by lag strategies before they are attributed to a batch
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LagStrategyError {
    #[error("Warehouse error: {0}")]
    Warehouse(#[from] WarehouseError),
}

/// Failure to overwrite the destination report
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PublishError {
    #[error(
        "Matrix of {rows} rows x {columns} columns does not fit range {range} \
         ({max_rows} rows x {max_columns} columns) of destination {destination_id}"
    )]
    CapacityExceeded {
        destination_id: String,
        range: String,
        rows: usize,
        columns: usize,
        max_rows: usize,
        max_columns: usize,
    },

    #[error("Destination {destination_id} unreachable while clearing {range}: {source}")]
    Unreachable {
        destination_id: String,
        range: String,
        source: DestinationError,
    },

    #[error("Destination {destination_id} rejected write to {range}: {source}")]
    Rejected {
        destination_id: String,
        range: String,
        source: DestinationError,
    },
}

/// Errors a pipeline run surfaces to its caller
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Customer source error: {0}")]
    Source(#[from] SourceError),

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error("Pipeline run {run_id} cancelled before publishing")]
    Cancelled { run_id: uuid::Uuid },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
