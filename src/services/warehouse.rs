//! # Warehouse Client
//!
//! Boundary to the data warehouse holding the raw inputs for lag computation.
//! Connection and credential handling live behind the implementation.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WarehouseError {
    /// Transient failure reaching the warehouse
    #[error("warehouse connectivity error: {0}")]
    Connectivity(String),

    #[error("warehouse query failed: {0}")]
    Query(String),
}

/// Freshness lookup for one batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreshnessQuery {
    pub customer_ids: Vec<i64>,
    pub modules: Vec<String>,
}

/// Most recent date with data for a customer's module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreshnessRow {
    pub customer_id: i64,
    pub module: String,
    pub last_available: NaiveDate,
}

#[async_trait]
pub trait WarehouseClient: Send + Sync {
    /// Return the latest loaded date for each requested (customer, module) pair that has data
    async fn fetch_freshness(&self, query: &FreshnessQuery)
        -> Result<Vec<FreshnessRow>, WarehouseError>;
}
