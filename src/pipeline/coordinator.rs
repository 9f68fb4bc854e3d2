//! # Pipeline Coordinator
//!
//! Drives one delay-reconciliation run end to end:
//!
//! ```text
//! CustomerSource ──▶ filter ──▶ Batcher ──┬──▶ DelayEvaluator (batch 0) ──┐
//!                                        ├──▶ DelayEvaluator (batch 1) ──┼──▶ Reconciler ──▶ ReportSink
//!                                        └──▶ DelayEvaluator (batch n) ──┘
//! ```
//!
//! Every batch is evaluated on its own tokio task, bounded by a semaphore. The
//! reconciler waits until every task has finished. A failed or panicked batch is
//! logged, recorded in the [`RunSummary`] and left out of the report while the
//! remaining batches are still published.
//!
//! ## Cancellation
//!
//! [`PipelineCoordinator::run_until_cancelled`] races the run against a caller
//! supplied future. If that future resolves before fan-in completes, in-flight
//! evaluations are aborted and the destination is never touched. Once fan-in has
//! completed the publish runs to completion.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use delay_monitor::config::PipelineConfig;
//! use delay_monitor::models::CustomerRecord;
//! use delay_monitor::pipeline::{FixedLagStrategy, PipelineCoordinator};
//! use delay_monitor::services::{InMemorySpreadsheet, StaticCustomerSource};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PipelineConfig::new("sheet-1", vec!["m1".to_string(), "m2".to_string()])?;
//! let source = StaticCustomerSource::new(vec![CustomerRecord::new(1, "A", ["m1"])]);
//!
//! let coordinator = PipelineCoordinator::new(
//!     config,
//!     Arc::new(source),
//!     Arc::new(FixedLagStrategy::new(1.0)),
//!     Arc::new(InMemorySpreadsheet::new()),
//! );
//! let summary = coordinator.run().await?;
//! println!("published {} rows", summary.rows);
//! # Ok(())
//! # }
//! ```

use super::batcher::Batcher;
use super::evaluator::{DelayEvaluator, LagStrategy};
use super::reconciler::Reconciler;
use super::report_sink::ReportSink;
use super::types::{BatchFailure, BatchOutcome, RunSummary};
use crate::config::{ConfigResult, PipelineConfig, RunConfig};
use crate::constants::StageStatus;
use crate::error::{BatchEvaluationError, PipelineError, Result};
use crate::logging::{log_batch_operation, log_error};
use crate::models::{Batch, CustomerRecord, DelayRecord};
use crate::services::{CustomerSource, DestinationHandle, ReportDestination};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Batch evaluations gathered at the fan-in barrier
#[derive(Debug)]
struct FanIn {
    customers_fetched: usize,
    customers_filtered: usize,
    outcomes: Vec<BatchOutcome>,
}

/// Aborts spawned evaluations that are still running when dropped
struct InFlight(Vec<(usize, usize, JoinHandle<std::result::Result<Vec<DelayRecord>, BatchEvaluationError>>)>);

impl Drop for InFlight {
    fn drop(&mut self) {
        for (_, _, handle) in &self.0 {
            handle.abort();
        }
    }
}

pub struct PipelineCoordinator {
    config: Arc<PipelineConfig>,
    source: Arc<dyn CustomerSource>,
    batcher: Batcher,
    evaluator: DelayEvaluator,
    reconciler: Reconciler,
    sink: ReportSink,
    destination: DestinationHandle,
    /// Bounds concurrently evaluating batches
    batch_semaphore: Arc<Semaphore>,
}

impl PipelineCoordinator {
    pub fn new(
        config: PipelineConfig,
        source: Arc<dyn CustomerSource>,
        strategy: Arc<dyn LagStrategy>,
        backend: Arc<dyn ReportDestination>,
    ) -> Self {
        let destination =
            DestinationHandle::new(config.destination_id.clone(), config.target_range, backend);

        Self {
            batcher: Batcher::with_size(config.batch_size),
            evaluator: DelayEvaluator::new(strategy),
            reconciler: Reconciler::new(config.expected_modules.clone()),
            sink: ReportSink::new(),
            batch_semaphore: Arc::new(Semaphore::new(config.max_concurrent_batches.get())),
            destination,
            source,
            config: Arc::new(config),
        }
    }

    /// Validate raw configuration, then build the coordinator
    pub fn from_run_config(
        config: &RunConfig,
        source: Arc<dyn CustomerSource>,
        strategy: Arc<dyn LagStrategy>,
        backend: Arc<dyn ReportDestination>,
    ) -> ConfigResult<Self> {
        let config = config.validate()?;
        Ok(Self::new(config, source, strategy, backend))
    }

    pub async fn run(&self) -> Result<RunSummary> {
        self.run_until_cancelled(std::future::pending()).await
    }

    pub async fn run_until_cancelled<C>(&self, cancel: C) -> Result<RunSummary>
    where
        C: Future<Output = ()>,
    {
        let run_id = Uuid::new_v4();
        let span = info_span!("pipeline_run", %run_id, destination_id = %self.config.destination_id);

        async move {
            let started = Instant::now();
            info!(
                batch_size = self.batcher.batch_size(),
                expected_modules = self.config.expected_modules.len(),
                strategy = self.evaluator.strategy_name(),
                "Starting delay pipeline run"
            );

            let fan_in = tokio::select! {
                fan_in = self.fan_out(run_id) => fan_in?,
                () = cancel => {
                    warn!("Pipeline run cancelled before fan-in completed");
                    return Err(PipelineError::Cancelled { run_id });
                }
            };

            let batches = fan_in.outcomes.len();
            let mut successful: Vec<Vec<DelayRecord>> = Vec::with_capacity(batches);
            let mut failed_batches = Vec::new();
            for outcome in fan_in.outcomes {
                match outcome.result {
                    Ok(records) => successful.push(records),
                    Err(e) => failed_batches.push(BatchFailure {
                        batch_index: outcome.batch_index,
                        customers: outcome.customers,
                        error: e.to_string(),
                    }),
                }
            }
            let delay_records: usize = successful.iter().map(Vec::len).sum();

            let matrix = self.reconciler.reconcile(&successful);
            debug!(
                rows = matrix.row_count(),
                duplicates = matrix.stats.duplicate_records,
                dropped = matrix.stats.dropped_records,
                "Delay records reconciled"
            );

            let publish = self
                .sink
                .publish(&matrix, &self.destination)
                .await
                .inspect_err(|e| log_error("report_sink", "publish", &e.to_string(), None))?;

            let summary = RunSummary {
                run_id,
                customers_fetched: fan_in.customers_fetched,
                customers_filtered: fan_in.customers_filtered,
                batches,
                failed_batches,
                delay_records,
                reconciliation: matrix.stats,
                rows: matrix.row_count(),
                publish,
                duration: started.elapsed(),
            };

            info!(
                batches = summary.batches,
                failed_batches = summary.failed_batches.len(),
                delay_records = summary.delay_records,
                rows = summary.rows,
                skipped = summary.publish.is_skipped(),
                duration_ms = summary.duration.as_millis() as u64,
                "Delay pipeline run completed"
            );

            Ok(summary)
        }
        .instrument(span)
        .await
    }

    /// Fetch, filter and batch customers, then evaluate every batch
    async fn fan_out(&self, run_id: Uuid) -> Result<FanIn> {
        let customers = self.source.fetch_customers().await.inspect_err(|e| {
            log_error("customer_source", self.source.source_name(), &e.to_string(), None)
        })?;

        let customers_fetched = customers.len();
        let eligible: Vec<CustomerRecord> =
            customers.into_iter().filter(CustomerRecord::has_modules).collect();
        let customers_filtered = customers_fetched - eligible.len();

        if eligible.is_empty() {
            info!(customers_fetched, "No customers with modules, nothing to evaluate");
        }

        let batches = self.batcher.batch(eligible);
        let outcomes = self.evaluate_batches(run_id, batches).await;

        Ok(FanIn {
            customers_fetched,
            customers_filtered,
            outcomes,
        })
    }

    async fn evaluate_batches(&self, run_id: Uuid, batches: Vec<Batch>) -> Vec<BatchOutcome> {
        if batches.is_empty() {
            return Vec::new();
        }

        let run_id = run_id.to_string();
        let mut in_flight = InFlight(Vec::with_capacity(batches.len()));

        for batch in batches {
            let evaluator = self.evaluator.clone();
            let semaphore = self.batch_semaphore.clone();
            let (batch_index, customers) = (batch.index, batch.len());
            log_batch_operation(&run_id, batch_index, customers, StageStatus::Started, None, None);

            let handle = tokio::spawn(
                async move {
                    let _permit = semaphore.acquire_owned().await.map_err(|e| {
                        BatchEvaluationError::TaskFailed {
                            batch_index: batch.index,
                            reason: e.to_string(),
                        }
                    })?;
                    evaluator.evaluate(&batch).await
                }
                .in_current_span(),
            );
            in_flight.0.push((batch_index, customers, handle));
        }

        let mut outcomes = Vec::with_capacity(in_flight.0.len());
        for (batch_index, customers, handle) in in_flight.0.iter_mut() {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(BatchEvaluationError::TaskFailed {
                    batch_index: *batch_index,
                    reason: if e.is_panic() {
                        "evaluation panicked".to_string()
                    } else {
                        e.to_string()
                    },
                }),
            };

            match &result {
                Ok(records) => log_batch_operation(
                    &run_id,
                    *batch_index,
                    *customers,
                    StageStatus::Completed,
                    Some(records.len()),
                    None,
                ),
                Err(e) => {
                    error!(batch_index = *batch_index, error = %e, "Batch evaluation failed, excluding batch from report");
                    log_batch_operation(
                        &run_id,
                        *batch_index,
                        *customers,
                        StageStatus::Failed,
                        None,
                        Some(&e.to_string()),
                    );
                }
            }

            outcomes.push(BatchOutcome {
                batch_index: *batch_index,
                customers: *customers,
                result,
            });
        }

        outcomes
    }
}
