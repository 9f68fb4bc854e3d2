#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Delay Monitor
//!
//! Periodic per-customer delay reporting built as a batch fan-out/fan-in pipeline.
//!
//! ## Overview
//!
//! Each run computes, for every customer, a lag value per product module and
//! republishes the results as a customers × modules report in a shared
//! spreadsheet. Customers are split into fixed-size batches, batches are
//! evaluated independently and concurrently, and the results are reconciled into
//! a dense matrix with a stable, configured column set before the destination
//! range is overwritten in full.
//!
//! ## Module Organization
//!
//! - [`pipeline`] - Batcher, DelayEvaluator, Reconciler, ReportSink and the run coordinator
//! - [`models`] - Customer, batch, delay record and report types
//! - [`services`] - Contracts for the customer source, warehouse and report destination
//! - [`config`] - Run configuration loading and validation
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup and helpers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use delay_monitor::config::ConfigLoader;
//! use delay_monitor::pipeline::{FixedLagStrategy, PipelineCoordinator};
//! use delay_monitor::services::{InMemorySpreadsheet, StaticCustomerSource};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! delay_monitor::logging::init_structured_logging();
//!
//! let config = ConfigLoader::load()?.validate()?;
//! let coordinator = PipelineCoordinator::new(
//!     config,
//!     Arc::new(StaticCustomerSource::default()),
//!     Arc::new(FixedLagStrategy::new(1.0)),
//!     Arc::new(InMemorySpreadsheet::new()),
//! );
//!
//! let summary = coordinator.run().await?;
//! println!("{}", serde_json::to_string_pretty(&summary)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # All tests
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod validation;

pub use config::{ConfigLoader, ConfigurationError, PipelineConfig, RunConfig};
pub use constants::StageStatus;
pub use error::{BatchEvaluationError, PipelineError, PublishError, Result};
pub use models::{Batch, CellRange, CellValue, CustomerRecord, DelayRecord, MatrixRow, ReconciledMatrix};
pub use pipeline::{
    DelayEvaluator, LagStrategy, PipelineCoordinator, PublishOutcome, Reconciler, ReportSink,
    RunSummary,
};
