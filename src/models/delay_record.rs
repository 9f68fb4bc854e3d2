use serde::{Deserialize, Serialize};

/// Lag of one module for one customer, produced by a batch evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayRecord {
    pub customer_id: i64,
    pub customer_name: String,
    pub module: String,
    pub lag: f64,
}

impl DelayRecord {
    pub fn new<N: Into<String>, M: Into<String>>(
        customer_id: i64,
        customer_name: N,
        module: M,
        lag: f64,
    ) -> Self {
        Self {
            customer_id,
            customer_name: customer_name.into(),
            module: module.into(),
            lag,
        }
    }
}
