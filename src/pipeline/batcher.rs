//! # Batcher
//!
//! Partitions the customer list into fixed-size batches. Order is preserved and
//! every customer lands in exactly one batch; only the last batch may be short.

use crate::config::{ConfigResult, ConfigurationError};
use crate::models::{Batch, CustomerRecord};
use std::num::NonZeroUsize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batcher {
    batch_size: NonZeroUsize,
}

impl Batcher {
    /// Fails for any batch size below 1
    pub fn new(batch_size: i64) -> ConfigResult<Self> {
        usize::try_from(batch_size)
            .ok()
            .and_then(NonZeroUsize::new)
            .map(Self::with_size)
            .ok_or(ConfigurationError::NonPositiveBatchSize { batch_size })
    }

    pub fn with_size(batch_size: NonZeroUsize) -> Self {
        Self { batch_size }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size.get()
    }

    /// Number of batches `customer_count` customers split into
    pub fn batch_count(&self, customer_count: usize) -> usize {
        customer_count.div_ceil(self.batch_size.get())
    }

    pub fn batch(&self, customers: Vec<CustomerRecord>) -> Vec<Batch> {
        let size = self.batch_size.get();
        let mut batches = Vec::with_capacity(self.batch_count(customers.len()));
        let mut remaining = customers.into_iter().peekable();

        while remaining.peek().is_some() {
            let chunk: Vec<CustomerRecord> = remaining.by_ref().take(size).collect();
            batches.push(Batch::new(batches.len(), chunk));
        }

        batches
    }
}

/// Split `customers` into batches of `batch_size`
pub fn batch(customers: Vec<CustomerRecord>, batch_size: i64) -> ConfigResult<Vec<Batch>> {
    Ok(Batcher::new(batch_size)?.batch(customers))
}
