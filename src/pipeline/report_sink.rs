//! # Report Sink
//!
//! Publishes a reconciled matrix by overwriting the destination range in full:
//! the range is cleared, then the matrix is written from its anchor cell. Rows
//! left over from an earlier, larger run never survive, and publishing the same
//! matrix twice leaves the destination unchanged.

use crate::constants::StageStatus;
use crate::error::PublishError;
use crate::logging::log_publish_operation;
use crate::models::ReconciledMatrix;
use crate::services::DestinationHandle;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// What a publish did to the destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PublishOutcome {
    /// Nothing to report; the destination was not touched
    Skipped,
    Published {
        destination_id: String,
        range: String,
        rows: usize,
        columns: usize,
    },
}

impl PublishOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportSink;

impl ReportSink {
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip(self, matrix, destination), fields(destination_id = %destination.destination_id, rows = matrix.row_count()))]
    pub async fn publish(
        &self,
        matrix: &ReconciledMatrix,
        destination: &DestinationHandle,
    ) -> Result<PublishOutcome, PublishError> {
        let range = destination.range.to_string();

        if matrix.is_empty() {
            info!(destination_id = %destination.destination_id, "No delays to report, skipping publish");
            log_publish_operation(&destination.destination_id, &range, 0, StageStatus::Skipped, None);
            return Ok(PublishOutcome::Skipped);
        }

        let rows = matrix.row_count();
        let columns = matrix.column_count();
        if rows > destination.range.row_capacity() || columns > destination.range.column_capacity() {
            return Err(PublishError::CapacityExceeded {
                destination_id: destination.destination_id.clone(),
                range,
                rows,
                columns,
                max_rows: destination.range.row_capacity(),
                max_columns: destination.range.column_capacity(),
            });
        }

        let values = matrix.to_rows();

        destination
            .clear()
            .await
            .map_err(|source| PublishError::Unreachable {
                destination_id: destination.destination_id.clone(),
                range: range.clone(),
                source,
            })?;

        destination
            .write(&values)
            .await
            .map_err(|source| PublishError::Rejected {
                destination_id: destination.destination_id.clone(),
                range: range.clone(),
                source,
            })?;

        log_publish_operation(
            &destination.destination_id,
            &range,
            rows,
            StageStatus::Completed,
            Some(destination.backend().backend_name()),
        );

        Ok(PublishOutcome::Published {
            destination_id: destination.destination_id.clone(),
            range,
            rows,
            columns,
        })
    }
}
