//! # External Services
//!
//! Contracts for the collaborators the pipeline calls but does not own: the
//! customer source, the data warehouse and the report destination.

pub mod customer_source;
pub mod destination;
pub mod warehouse;

pub use customer_source::{CustomerSource, SourceError, StaticCustomerSource};
pub use destination::{
    DestinationCall, DestinationError, DestinationHandle, InMemorySpreadsheet, ReportDestination,
};
pub use warehouse::{FreshnessQuery, FreshnessRow, WarehouseClient, WarehouseError};
