//! # Reconciler
//!
//! Fan-in step of the pipeline. Merges the delay records of every successful
//! batch into a dense customer × module matrix whose columns are exactly the
//! expected modules, in configured order.
//!
//! ## Rules
//!
//! - Records are grouped by `(customer_id, customer_name)`
//! - The first record for a customer's module wins; later duplicates are counted and ignored
//! - Expected modules with no record default to `0`
//! - Modules outside the expected list are counted and dropped
//! - Rows are ordered by `(customer_id, customer_name)`, independent of batch arrival order

use crate::constants::MISSING_MODULE_LAG;
use crate::models::{DelayRecord, MatrixRow, ReconciledMatrix, ReconciliationStats};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciler {
    expected_modules: Vec<String>,
}

impl Reconciler {
    pub fn new(expected_modules: Vec<String>) -> Self {
        Self { expected_modules }
    }

    pub fn reconcile(&self, batches_of_records: &[Vec<DelayRecord>]) -> ReconciledMatrix {
        reconcile(batches_of_records, &self.expected_modules)
    }
}

pub fn reconcile(
    batches_of_records: &[Vec<DelayRecord>],
    expected_modules: &[String],
) -> ReconciledMatrix {
    let mut stats = ReconciliationStats::default();
    let expected: HashSet<&str> = expected_modules.iter().map(String::as_str).collect();

    // BTreeMap keeps groups sorted by customer identity
    let mut groups: BTreeMap<(i64, &str), HashMap<&str, f64>> = BTreeMap::new();

    for record in batches_of_records.iter().flatten() {
        stats.input_records += 1;

        let observed = groups
            .entry((record.customer_id, record.customer_name.as_str()))
            .or_default();

        if observed.contains_key(record.module.as_str()) {
            stats.duplicate_records += 1;
            warn!(
                customer_id = record.customer_id,
                module = %record.module,
                "Duplicate delay record for customer module, keeping first"
            );
            continue;
        }
        observed.insert(record.module.as_str(), record.lag);

        if !expected.contains(record.module.as_str()) {
            stats.dropped_records += 1;
            debug!(
                customer_id = record.customer_id,
                module = %record.module,
                "Dropping delay record for module outside the report columns"
            );
        }
    }

    if groups.is_empty() {
        return ReconciledMatrix::empty(expected_modules);
    }

    let rows = groups
        .into_iter()
        .map(|((customer_id, customer_name), observed)| MatrixRow {
            customer_id,
            customer_name: customer_name.to_string(),
            lag_by_module: expected_modules
                .iter()
                .map(|module| {
                    let lag = observed
                        .get(module.as_str())
                        .copied()
                        .unwrap_or(MISSING_MODULE_LAG);
                    (module.clone(), lag)
                })
                .collect::<IndexMap<_, _>>(),
        })
        .collect();

    ReconciledMatrix {
        expected_modules: expected_modules.to_vec(),
        rows,
        stats,
    }
}
