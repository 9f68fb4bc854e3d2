//! # Delay Evaluator
//!
//! Turns one batch of customers into one [`DelayRecord`] per distinct
//! (customer, module) pair.
//!
//! The lag itself comes from a [`LagStrategy`]. The evaluator owns the contract
//! around it: customers are validated up front, every pair gets exactly one
//! record, and every lag is finite. Any violation fails the batch being
//! evaluated and nothing else. The evaluator holds no mutable state, so a single
//! instance is cloned into every concurrent batch task.

use crate::error::{BatchEvaluationError, LagStrategyError};
use crate::models::{Batch, DelayRecord};
use crate::services::{FreshnessQuery, WarehouseClient};
use crate::validation::validate_customer;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Lags computed for a batch, keyed by customer then module
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LagTable {
    lags: HashMap<i64, HashMap<String, f64>>,
}

impl LagTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<M: Into<String>>(&mut self, customer_id: i64, module: M, lag: f64) {
        self.lags
            .entry(customer_id)
            .or_default()
            .insert(module.into(), lag);
    }

    pub fn get(&self, customer_id: i64, module: &str) -> Option<f64> {
        self.lags.get(&customer_id)?.get(module).copied()
    }
}

/// Business rule that assigns a lag to each (customer, module) pair of a batch
#[async_trait]
pub trait LagStrategy: Send + Sync {
    /// Strategy name for logging
    fn name(&self) -> &'static str;

    async fn lags_for_batch(&self, batch: &Batch) -> Result<LagTable, LagStrategyError>;
}

/// Assigns the same lag to every pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedLagStrategy {
    lag: f64,
}

impl FixedLagStrategy {
    pub fn new(lag: f64) -> Self {
        Self { lag }
    }
}

#[async_trait]
impl LagStrategy for FixedLagStrategy {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn lags_for_batch(&self, batch: &Batch) -> Result<LagTable, LagStrategyError> {
        let mut table = LagTable::new();
        for customer in &batch.customers {
            for module in customer.distinct_modules() {
                table.insert(customer.id, module, self.lag);
            }
        }
        Ok(table)
    }
}

/// Lag in whole days between a module's last loaded date and the reference date.
///
/// Issues one warehouse query per batch. Pairs the warehouse has no data for get
/// no entry, which the evaluator reports as a missing lag.
pub struct FreshnessLagStrategy {
    warehouse: Arc<dyn WarehouseClient>,
    reference_date: Option<NaiveDate>,
}

impl FreshnessLagStrategy {
    /// Measure against today's UTC date at evaluation time
    pub fn new(warehouse: Arc<dyn WarehouseClient>) -> Self {
        Self {
            warehouse,
            reference_date: None,
        }
    }

    /// Measure against a fixed date
    pub fn with_reference_date(mut self, reference_date: NaiveDate) -> Self {
        self.reference_date = Some(reference_date);
        self
    }

    fn reference_date(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Utc::now().date_naive())
    }
}

impl fmt::Debug for FreshnessLagStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FreshnessLagStrategy")
            .field("reference_date", &self.reference_date)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl LagStrategy for FreshnessLagStrategy {
    fn name(&self) -> &'static str {
        "freshness"
    }

    async fn lags_for_batch(&self, batch: &Batch) -> Result<LagTable, LagStrategyError> {
        let query = FreshnessQuery {
            customer_ids: batch.customer_ids(),
            modules: batch.modules(),
        };
        let rows = self.warehouse.fetch_freshness(&query).await?;

        let today = self.reference_date();
        let mut table = LagTable::new();
        for row in rows {
            let days = (today - row.last_available).num_days().max(0);
            table.insert(row.customer_id, row.module, days as f64);
        }
        Ok(table)
    }
}

#[derive(Clone)]
pub struct DelayEvaluator {
    strategy: Arc<dyn LagStrategy>,
}

impl DelayEvaluator {
    pub fn new(strategy: Arc<dyn LagStrategy>) -> Self {
        Self { strategy }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    #[instrument(skip(self, batch), fields(batch_index = batch.index, customers = batch.len()))]
    pub async fn evaluate(&self, batch: &Batch) -> Result<Vec<DelayRecord>, BatchEvaluationError> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        for customer in &batch.customers {
            validate_customer(customer).map_err(|e| BatchEvaluationError::MalformedCustomer {
                batch_index: batch.index,
                reason: e.to_string(),
            })?;
        }

        let table = self.strategy.lags_for_batch(batch).await.map_err(|e| {
            BatchEvaluationError::Strategy {
                batch_index: batch.index,
                strategy: self.strategy.name().to_string(),
                reason: e.to_string(),
            }
        })?;

        let mut records = Vec::new();
        for customer in &batch.customers {
            for module in customer.distinct_modules() {
                let lag = table.get(customer.id, module).ok_or_else(|| {
                    BatchEvaluationError::MissingLag {
                        batch_index: batch.index,
                        customer_id: customer.id,
                        module: module.to_string(),
                    }
                })?;

                if !lag.is_finite() {
                    return Err(BatchEvaluationError::NonFiniteLag {
                        batch_index: batch.index,
                        customer_id: customer.id,
                        module: module.to_string(),
                        lag,
                    });
                }

                records.push(DelayRecord::new(customer.id, &customer.name, module, lag));
            }
        }

        debug!(
            batch_index = batch.index,
            records = records.len(),
            strategy = self.strategy.name(),
            "Batch evaluated"
        );

        Ok(records)
    }
}

impl fmt::Debug for DelayEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelayEvaluator")
            .field("strategy", &self.strategy.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CustomerRecord;
    use crate::services::{FreshnessRow, WarehouseError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingStrategy {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LagStrategy for CountingStrategy {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn lags_for_batch(&self, batch: &Batch) -> Result<LagTable, LagStrategyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            FixedLagStrategy::new(1.0).lags_for_batch(batch).await
        }
    }

    struct TableStrategy(LagTable);

    #[async_trait]
    impl LagStrategy for TableStrategy {
        fn name(&self) -> &'static str {
            "table"
        }

        async fn lags_for_batch(&self, _batch: &Batch) -> Result<LagTable, LagStrategyError> {
            Ok(self.0.clone())
        }
    }

    struct StubWarehouse {
        result: Result<Vec<FreshnessRow>, WarehouseError>,
    }

    #[async_trait]
    impl WarehouseClient for StubWarehouse {
        async fn fetch_freshness(
            &self,
            _query: &FreshnessQuery,
        ) -> Result<Vec<FreshnessRow>, WarehouseError> {
            self.result.clone()
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fixed(lag: f64) -> DelayEvaluator {
        DelayEvaluator::new(Arc::new(FixedLagStrategy::new(lag)))
    }

    #[tokio::test]
    async fn test_one_record_per_customer_module_pair() {
        let batch = Batch::new(
            0,
            vec![
                CustomerRecord::new(1, "Customer A", ["example2", "example1"]),
                CustomerRecord::new(2, "Customer B", ["example5"]),
            ],
        );

        let records = fixed(1.0).evaluate(&batch).await.unwrap();

        assert_eq!(
            records,
            vec![
                DelayRecord::new(1, "Customer A", "example2", 1.0),
                DelayRecord::new(1, "Customer A", "example1", 1.0),
                DelayRecord::new(2, "Customer B", "example5", 1.0),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_batch_skips_strategy() {
        let strategy = Arc::new(CountingStrategy {
            calls: AtomicUsize::new(0),
        });
        let evaluator = DelayEvaluator::new(strategy.clone());

        let records = evaluator.evaluate(&Batch::new(0, Vec::new())).await.unwrap();

        assert!(records.is_empty());
        assert_eq!(strategy.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_customer_without_modules_yields_no_records() {
        let batch = Batch::new(
            0,
            vec![
                CustomerRecord::new(1, "Customer A", Vec::<String>::new()),
                CustomerRecord::new(2, "Customer B", ["m1", "m1"]),
            ],
        );

        let records = fixed(2.0).evaluate(&batch).await.unwrap();

        assert_eq!(records, vec![DelayRecord::new(2, "Customer B", "m1", 2.0)]);
    }

    #[test]
    fn test_lag_table_lookup_by_customer_and_module() {
        let mut table = LagTable::new();
        table.insert(1, "m1", 2.0);
        table.insert(1, "m2", 3.0);
        table.insert(2, "m1", 4.0);
        table.insert(1, "m1", 5.0);

        assert_eq!(table.get(1, "m1"), Some(5.0));
        assert_eq!(table.get(1, "m2"), Some(3.0));
        assert_eq!(table.get(2, "m1"), Some(4.0));
        assert_eq!(table.get(2, "m2"), None);
        assert_eq!(table.get(3, "m1"), None);
    }

    #[tokio::test]
    async fn test_malformed_customer_fails_batch() {
        let batch = Batch::new(
            4,
            vec![
                CustomerRecord::new(1, "Customer A", ["m1"]),
                CustomerRecord::new(2, "Customer B", ["m1", " "]),
            ],
        );

        let error = fixed(1.0).evaluate(&batch).await.unwrap_err();

        assert!(matches!(
            error,
            BatchEvaluationError::MalformedCustomer { batch_index: 4, .. }
        ));
    }

    #[tokio::test]
    async fn test_missing_and_non_finite_lags_fail_batch() {
        let batch = Batch::new(1, vec![CustomerRecord::new(1, "Customer A", ["m1", "m2"])]);

        let mut partial = LagTable::new();
        partial.insert(1, "m1", 3.0);
        let error = DelayEvaluator::new(Arc::new(TableStrategy(partial.clone())))
            .evaluate(&batch)
            .await
            .unwrap_err();
        assert_eq!(
            error,
            BatchEvaluationError::MissingLag {
                batch_index: 1,
                customer_id: 1,
                module: "m2".to_string(),
            }
        );

        partial.insert(1, "m2", f64::NAN);
        let error = DelayEvaluator::new(Arc::new(TableStrategy(partial)))
            .evaluate(&batch)
            .await
            .unwrap_err();
        assert!(matches!(error, BatchEvaluationError::NonFiniteLag { .. }));
    }

    #[tokio::test]
    async fn test_freshness_lag_counts_days_since_last_load() {
        let warehouse = StubWarehouse {
            result: Ok(vec![
                FreshnessRow {
                    customer_id: 1,
                    module: "m1".to_string(),
                    last_available: date(2024, 1, 12),
                },
                FreshnessRow {
                    customer_id: 1,
                    module: "m2".to_string(),
                    last_available: date(2024, 1, 20),
                },
            ]),
        };
        let strategy = FreshnessLagStrategy::new(Arc::new(warehouse))
            .with_reference_date(date(2024, 1, 15));
        let batch = Batch::new(0, vec![CustomerRecord::new(1, "Customer A", ["m1", "m2"])]);

        let records = DelayEvaluator::new(Arc::new(strategy))
            .evaluate(&batch)
            .await
            .unwrap();

        assert_eq!(records[0].lag, 3.0);
        // Loads dated after the reference date are not negative lag
        assert_eq!(records[1].lag, 0.0);
    }

    #[tokio::test]
    async fn test_warehouse_failure_becomes_strategy_error() {
        let warehouse = StubWarehouse {
            result: Err(WarehouseError::Connectivity("timeout".to_string())),
        };
        let evaluator = DelayEvaluator::new(Arc::new(FreshnessLagStrategy::new(Arc::new(warehouse))));
        let batch = Batch::new(2, vec![CustomerRecord::new(1, "Customer A", ["m1"])]);

        let error = evaluator.evaluate(&batch).await.unwrap_err();

        match error {
            BatchEvaluationError::Strategy {
                batch_index,
                strategy,
                reason,
            } => {
                assert_eq!(batch_index, 2);
                assert_eq!(strategy, "freshness");
                assert!(reason.contains("timeout"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
