//! # Delay Pipeline
//!
//! Batch-wise fan-out/fan-in pipeline that turns a customer list into a
//! published delay report.
//!
//! ## Core Components
//!
//! - **Batcher**: splits customers into fixed-size batches
//! - **DelayEvaluator**: computes one lag per (customer, module) for a single batch,
//!   delegating the metric to a pluggable **LagStrategy**
//! - **Reconciler**: merges every batch's records into a dense matrix over the expected modules
//! - **ReportSink**: overwrites the destination range with the matrix, or skips when empty
//! - **PipelineCoordinator**: runs the stages, evaluating batches concurrently with isolated failures

pub mod batcher;
pub mod coordinator;
pub mod evaluator;
pub mod reconciler;
pub mod report_sink;
pub mod types;

pub use batcher::{batch, Batcher};
pub use coordinator::PipelineCoordinator;
pub use evaluator::{DelayEvaluator, FixedLagStrategy, FreshnessLagStrategy, LagStrategy, LagTable};
pub use reconciler::{reconcile, Reconciler};
pub use report_sink::{PublishOutcome, ReportSink};
pub use types::{BatchFailure, BatchOutcome, RunSummary};
