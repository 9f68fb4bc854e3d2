//! Mock lag strategies, warehouse and destinations for pipeline tests

use async_trait::async_trait;
use delay_monitor::error::LagStrategyError;
use delay_monitor::models::{Batch, CellRange, CellValue};
use delay_monitor::pipeline::{LagStrategy, LagTable};
use delay_monitor::services::{
    DestinationError, FreshnessQuery, FreshnessRow, ReportDestination, WarehouseClient,
    WarehouseError,
};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Lag equals the customer id, so pivoted values are easy to check
#[derive(Debug, Default)]
pub struct IdLagStrategy;

#[async_trait]
impl LagStrategy for IdLagStrategy {
    fn name(&self) -> &'static str {
        "id_lag"
    }

    async fn lags_for_batch(&self, batch: &Batch) -> Result<LagTable, LagStrategyError> {
        Ok(id_lags(batch))
    }
}

fn id_lags(batch: &Batch) -> LagTable {
    let mut table = LagTable::new();
    for customer in &batch.customers {
        for module in customer.distinct_modules() {
            table.insert(customer.id, module, customer.id as f64);
        }
    }
    table
}

/// Fails any batch containing one of the given customers, otherwise behaves like [`IdLagStrategy`]
#[derive(Debug)]
pub struct FailingStrategy {
    poisoned: HashSet<i64>,
}

impl FailingStrategy {
    pub fn for_customers(ids: &[i64]) -> Self {
        Self {
            poisoned: ids.iter().copied().collect(),
        }
    }
}

#[async_trait]
impl LagStrategy for FailingStrategy {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn lags_for_batch(&self, batch: &Batch) -> Result<LagTable, LagStrategyError> {
        if batch.customers.iter().any(|c| self.poisoned.contains(&c.id)) {
            return Err(LagStrategyError::Warehouse(WarehouseError::Query(format!(
                "query failed for batch {}",
                batch.index
            ))));
        }
        Ok(id_lags(batch))
    }
}

/// Panics while evaluating the batch with the given index
#[derive(Debug)]
pub struct PanickingStrategy {
    pub batch_index: usize,
}

#[async_trait]
impl LagStrategy for PanickingStrategy {
    fn name(&self) -> &'static str {
        "panicking"
    }

    async fn lags_for_batch(&self, batch: &Batch) -> Result<LagTable, LagStrategyError> {
        if batch.index == self.batch_index {
            panic!("strategy blew up on batch {}", batch.index);
        }
        Ok(id_lags(batch))
    }
}

/// Sleeps before answering and records how many evaluations overlap
#[derive(Debug)]
pub struct SlowStrategy {
    delay: Duration,
    active: AtomicUsize,
    pub max_active: AtomicUsize,
    pub completed: AtomicUsize,
}

impl SlowStrategy {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl LagStrategy for SlowStrategy {
    fn name(&self) -> &'static str {
        "slow"
    }

    async fn lags_for_batch(&self, batch: &Batch) -> Result<LagTable, LagStrategyError> {
        let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now_active, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.active.fetch_sub(1, Ordering::SeqCst);
        self.completed.fetch_add(1, Ordering::SeqCst);
        Ok(id_lags(batch))
    }
}

/// Warehouse answering from a fixed row set and recording every query
#[derive(Debug, Default)]
pub struct MockWarehouse {
    rows: Vec<FreshnessRow>,
    pub queries: Mutex<Vec<FreshnessQuery>>,
}

impl MockWarehouse {
    pub fn new(rows: Vec<FreshnessRow>) -> Self {
        Self {
            rows,
            queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl WarehouseClient for MockWarehouse {
    async fn fetch_freshness(
        &self,
        query: &FreshnessQuery,
    ) -> Result<Vec<FreshnessRow>, WarehouseError> {
        self.queries.lock().push(query.clone());
        Ok(self
            .rows
            .iter()
            .filter(|row| {
                query.customer_ids.contains(&row.customer_id) && query.modules.contains(&row.module)
            })
            .cloned()
            .collect())
    }
}

/// Which destination operation should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Clear,
    Write,
}

/// Destination whose clear or write always fails
#[derive(Debug, Clone)]
pub struct FailingDestination {
    fail_on: FailOn,
    pub attempts: Arc<AtomicUsize>,
}

impl FailingDestination {
    pub fn new(fail_on: FailOn) -> Self {
        Self {
            fail_on,
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl ReportDestination for FailingDestination {
    fn backend_name(&self) -> &'static str {
        "failing"
    }

    async fn clear(&self, _destination_id: &str, _range: &CellRange) -> Result<(), DestinationError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        match self.fail_on {
            FailOn::Clear => Err(DestinationError::Unreachable("connection reset".to_string())),
            FailOn::Write => Ok(()),
        }
    }

    async fn write(
        &self,
        _destination_id: &str,
        _range: &CellRange,
        _rows: &[Vec<CellValue>],
    ) -> Result<(), DestinationError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        match self.fail_on {
            FailOn::Clear => Ok(()),
            FailOn::Write => Err(DestinationError::Rejected("quota exceeded".to_string())),
        }
    }
}
