//! # Customer Records
//!
//! Customers as delivered by the external customer source. Immutable for the
//! lifetime of a pipeline run.

use serde::{Deserialize, Serialize};

/// A customer and the product modules attributed to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub id: i64,
    pub name: String,
    /// Module names, treated as a set. Repeated names collapse during evaluation.
    #[serde(default)]
    pub modules: Vec<String>,
}

impl CustomerRecord {
    pub fn new<N, I, M>(id: i64, name: N, modules: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        Self {
            id,
            name: name.into(),
            modules: modules.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the customer has at least one module and so takes part in a run
    pub fn has_modules(&self) -> bool {
        !self.modules.is_empty()
    }

    /// Module names in first-seen order with repeats removed
    pub fn distinct_modules(&self) -> impl Iterator<Item = &str> {
        let mut seen = std::collections::HashSet::new();
        self.modules
            .iter()
            .map(String::as_str)
            .filter(move |module| seen.insert(*module))
    }
}
