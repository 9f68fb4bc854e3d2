//! # Data Models
//!
//! Value types that flow through one pipeline run:
//!
//! - [`CustomerRecord`] - customers fetched from the external source
//! - [`Batch`] - fixed-size groups of customers, the unit of parallel work
//! - [`DelayRecord`] - per (customer, module) lag emitted by a batch evaluation
//! - [`ReconciledMatrix`] - dense customer × module view handed to the report sink
//! - [`CellValue`] / [`CellRange`] - what gets written to the destination, and where

pub mod batch;
pub mod customer;
pub mod delay_record;
pub mod matrix;
pub mod report;

pub use batch::Batch;
pub use customer::CustomerRecord;
pub use delay_record::DelayRecord;
pub use matrix::{MatrixRow, ReconciledMatrix, ReconciliationStats};
pub use report::{CellRange, CellValue};
