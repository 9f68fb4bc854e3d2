use delay_monitor::models::{CustomerRecord, DelayRecord};
use proptest::prelude::*;
use proptest::sample::subsequence;

/// Pool of module names records and configurations draw from
pub const MODULE_POOL: &[&str] = &["example1", "example2", "example3", "example4", "example5", "legacy"];

/// Strategy for generating a non-empty set of module names
pub fn module_set_strategy() -> impl Strategy<Value = Vec<String>> {
    subsequence(MODULE_POOL, 1..=MODULE_POOL.len())
        .prop_map(|modules| modules.into_iter().map(str::to_string).collect())
}

/// Strategy for generating customers with unique, positive ids in ascending order
pub fn customer_list_strategy(max_len: usize) -> impl Strategy<Value = Vec<CustomerRecord>> {
    prop::collection::vec(module_set_strategy(), 0..=max_len).prop_map(|module_sets| {
        module_sets
            .into_iter()
            .enumerate()
            .map(|(i, modules)| {
                let id = i as i64 + 1;
                CustomerRecord::new(id, format!("Customer {id}"), modules)
            })
            .collect()
    })
}

/// Strategy for generating delay records spread over batches, duplicates and unknown modules included
pub fn batched_records_strategy() -> impl Strategy<Value = Vec<Vec<DelayRecord>>> {
    let record = (1i64..=20, prop::sample::select(MODULE_POOL), 0u32..=30).prop_map(
        |(customer_id, module, lag)| {
            DelayRecord::new(customer_id, format!("Customer {customer_id}"), module, lag as f64)
        },
    );
    prop::collection::vec(prop::collection::vec(record, 0..8), 0..6)
}
