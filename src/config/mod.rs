//! # Run Configuration
//!
//! Configuration is loaded once per run and passed explicitly into the pipeline.
//! There is no global configuration state.
//!
//! ## Architecture
//!
//! - [`RunConfig`]: the raw shape as read from file and environment
//! - [`PipelineConfig`]: the validated, strongly typed form the pipeline runs on
//! - [`ConfigLoader`]: layers defaults, an optional TOML file and `DELAY_MONITOR_*` variables
//!
//! ## Usage
//!
//! ```rust,no_run
//! use delay_monitor::config::ConfigLoader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::load()?.validate()?;
//! println!("publishing to {} in batches of {}", config.destination_id, config.batch_size);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigLoader;

use crate::constants::{DEFAULT_BATCH_SIZE, DEFAULT_MAX_CONCURRENT_BATCHES, DEFAULT_TARGET_RANGE};
use crate::models::CellRange;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::num::NonZeroUsize;

/// Run configuration as stored by the operator
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RunConfig {
    /// Customers per batch; must be positive
    #[serde(default = "default_batch_size")]
    pub batch_size: i64,

    /// Spreadsheet receiving the report
    #[serde(default)]
    pub destination_id: Option<String>,

    /// Report columns, in order
    #[serde(default)]
    pub expected_modules: Option<Vec<String>>,

    /// Range cleared and rewritten on every publish
    #[serde(default = "default_target_range")]
    pub target_range: String,

    /// Upper bound on batch evaluations in flight
    #[serde(default = "default_max_concurrent_batches")]
    pub max_concurrent_batches: usize,
}

fn default_batch_size() -> i64 {
    DEFAULT_BATCH_SIZE
}

fn default_target_range() -> String {
    DEFAULT_TARGET_RANGE.to_string()
}

fn default_max_concurrent_batches() -> usize {
    DEFAULT_MAX_CONCURRENT_BATCHES
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            destination_id: None,
            expected_modules: None,
            target_range: default_target_range(),
            max_concurrent_batches: DEFAULT_MAX_CONCURRENT_BATCHES,
        }
    }
}

/// Validated configuration for one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineConfig {
    pub batch_size: NonZeroUsize,
    pub destination_id: String,
    pub expected_modules: Vec<String>,
    #[serde(serialize_with = "serialize_range")]
    pub target_range: CellRange,
    pub max_concurrent_batches: NonZeroUsize,
}

fn serialize_range<S: serde::Serializer>(range: &CellRange, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(range)
}

impl RunConfig {
    /// Check every field and produce the typed configuration
    pub fn validate(&self) -> ConfigResult<PipelineConfig> {
        let batch_size = usize::try_from(self.batch_size)
            .ok()
            .and_then(NonZeroUsize::new)
            .ok_or(ConfigurationError::NonPositiveBatchSize {
                batch_size: self.batch_size,
            })?;

        let destination_id = self
            .destination_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ConfigurationError::missing_required_field("destination_id", "run configuration"))?
            .to_string();

        let expected_modules = self
            .expected_modules
            .clone()
            .filter(|modules| !modules.is_empty())
            .ok_or_else(|| {
                ConfigurationError::missing_required_field("expected_modules", "run configuration")
            })?;

        let mut seen = HashSet::new();
        for module in &expected_modules {
            if module.trim().is_empty() {
                return Err(ConfigurationError::invalid_value(
                    "expected_modules",
                    module.clone(),
                    "module names must not be blank",
                ));
            }
            if !seen.insert(module.as_str()) {
                return Err(ConfigurationError::invalid_value(
                    "expected_modules",
                    module.clone(),
                    "module listed more than once",
                ));
            }
        }

        let target_range = CellRange::parse(&self.target_range)?;
        if target_range.column_capacity() <= crate::constants::LEADING_REPORT_COLUMNS {
            return Err(ConfigurationError::invalid_range(
                &self.target_range,
                "range must have room for customer columns and at least one module",
            ));
        }

        let max_concurrent_batches = NonZeroUsize::new(self.max_concurrent_batches).ok_or_else(|| {
            ConfigurationError::invalid_value(
                "max_concurrent_batches",
                self.max_concurrent_batches.to_string(),
                "must be at least 1",
            )
        })?;

        Ok(PipelineConfig {
            batch_size,
            destination_id,
            expected_modules,
            target_range,
            max_concurrent_batches,
        })
    }
}

impl PipelineConfig {
    /// Minimal configuration with defaults for everything optional
    pub fn new<D: Into<String>>(destination_id: D, expected_modules: Vec<String>) -> ConfigResult<Self> {
        RunConfig {
            destination_id: Some(destination_id.into()),
            expected_modules: Some(expected_modules),
            ..RunConfig::default()
        }
        .validate()
    }

    pub fn with_batch_size(mut self, batch_size: NonZeroUsize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_target_range(mut self, target_range: CellRange) -> Self {
        self.target_range = target_range;
        self
    }

    pub fn with_max_concurrent_batches(mut self, max_concurrent_batches: NonZeroUsize) -> Self {
        self.max_concurrent_batches = max_concurrent_batches;
        self
    }
}
