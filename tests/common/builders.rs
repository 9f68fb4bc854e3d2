//! Builders for test customers and pipeline wiring

use delay_monitor::config::PipelineConfig;
use delay_monitor::models::CustomerRecord;
use delay_monitor::pipeline::{LagStrategy, PipelineCoordinator};
use delay_monitor::services::{InMemorySpreadsheet, StaticCustomerSource};
use std::num::NonZeroUsize;
use std::sync::Arc;

pub const DESTINATION_ID: &str = "delay-report-sheet";

pub fn customer(id: i64, modules: &[&str]) -> CustomerRecord {
    CustomerRecord::new(id, format!("Customer {id}"), modules.iter().copied())
}

pub fn modules(names: &[&str]) -> Vec<String> {
    names.iter().map(|m| m.to_string()).collect()
}

pub fn pipeline_config(batch_size: usize, expected: &[&str]) -> PipelineConfig {
    PipelineConfig::new(DESTINATION_ID, modules(expected))
        .expect("valid test configuration")
        .with_batch_size(NonZeroUsize::new(batch_size).expect("positive batch size"))
}

/// Coordinator over a static customer list writing into `sheet`
pub fn coordinator(
    config: PipelineConfig,
    customers: Vec<CustomerRecord>,
    strategy: Arc<dyn LagStrategy>,
    sheet: &InMemorySpreadsheet,
) -> PipelineCoordinator {
    PipelineCoordinator::new(
        config,
        Arc::new(StaticCustomerSource::new(customers)),
        strategy,
        Arc::new(sheet.clone()),
    )
}
