use super::CustomerRecord;
use serde::{Deserialize, Serialize};

/// A bounded group of customers evaluated as one independent unit of work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    /// Zero-based position of the batch within its run
    pub index: usize,
    pub customers: Vec<CustomerRecord>,
}

impl Batch {
    pub fn new(index: usize, customers: Vec<CustomerRecord>) -> Self {
        Self { index, customers }
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    pub fn customer_ids(&self) -> Vec<i64> {
        self.customers.iter().map(|c| c.id).collect()
    }

    /// Every distinct module referenced by a customer in this batch, first-seen order
    pub fn modules(&self) -> Vec<String> {
        let mut modules: Vec<String> = Vec::new();
        for module in self.customers.iter().flat_map(|c| c.distinct_modules()) {
            if !modules.iter().any(|m| m == module) {
                modules.push(module.to_string());
            }
        }
        modules
    }
}
