//! # Customer Source
//!
//! Boundary to the system of record that lists customers and their modules.

use crate::models::CustomerRecord;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("customer source unavailable: {0}")]
    Unavailable(String),
}

/// Supplies the customers considered by a run
#[async_trait]
pub trait CustomerSource: Send + Sync {
    /// Source name for logging
    fn source_name(&self) -> &'static str;

    /// Fetch every customer. Filtering out customers without modules is the caller's job.
    async fn fetch_customers(&self) -> Result<Vec<CustomerRecord>, SourceError>;
}

/// Fixed, in-memory customer list
#[derive(Debug, Clone, Default)]
pub struct StaticCustomerSource {
    customers: Vec<CustomerRecord>,
}

impl StaticCustomerSource {
    pub fn new(customers: Vec<CustomerRecord>) -> Self {
        Self { customers }
    }
}

#[async_trait]
impl CustomerSource for StaticCustomerSource {
    fn source_name(&self) -> &'static str {
        "static"
    }

    async fn fetch_customers(&self) -> Result<Vec<CustomerRecord>, SourceError> {
        Ok(self.customers.clone())
    }
}
