//! # System Constants
//!
//! Defaults and status values shared across the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default number of customers per batch
pub const DEFAULT_BATCH_SIZE: i64 = 10;

/// Default range cleared and rewritten on every publish. Row 1 holds headers owned by the report.
pub const DEFAULT_TARGET_RANGE: &str = "A2:Z1000";

/// Default upper bound on batch evaluations running at once
pub const DEFAULT_MAX_CONCURRENT_BATCHES: usize = 10;

/// Columns written before the per-module lag columns (customer id, customer name)
pub const LEADING_REPORT_COLUMNS: usize = 2;

/// Lag written for an expected module with no observed record
pub const MISSING_MODULE_LAG: f64 = 0.0;

/// Configuration sources
pub mod config_keys {
    /// Prefix for environment variable overrides, e.g. `DELAY_MONITOR_BATCH_SIZE`
    pub const ENV_PREFIX: &str = "DELAY_MONITOR";
    /// Environment variable holding an explicit configuration file path
    pub const CONFIG_PATH_ENV: &str = "DELAY_MONITOR_CONFIG_PATH";
    /// Configuration file consulted when no explicit path is set
    pub const DEFAULT_CONFIG_FILE: &str = "config/delay_monitor.toml";
}

/// Terminal state of one pipeline stage, used in structured logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Started,
    Completed,
    Skipped,
    Failed,
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => write!(f, "started"),
            Self::Completed => write!(f, "completed"),
            Self::Skipped => write!(f, "skipped"),
            Self::Failed => write!(f, "failed"),
        }
    }
}
