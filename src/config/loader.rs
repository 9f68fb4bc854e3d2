//! Configuration Loader
//!
//! Layers configuration sources with the `config` crate, later sources
//! overriding earlier ones:
//!
//! 1. serde defaults on [`RunConfig`]
//! 2. a TOML file (`DELAY_MONITOR_CONFIG_PATH`, else `config/delay_monitor.toml` when present)
//! 3. `DELAY_MONITOR_*` environment variables, e.g. `DELAY_MONITOR_BATCH_SIZE=25` or
//!    `DELAY_MONITOR_EXPECTED_MODULES=example1,example2`

use super::error::ConfigResult;
use super::RunConfig;
use crate::constants::config_keys::{CONFIG_PATH_ENV, DEFAULT_CONFIG_FILE, ENV_PREFIX};
use config::{Config, Environment, File, FileFormat};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
enum FileSource {
    Path { path: PathBuf, required: bool },
    Inline(String),
}

#[derive(Debug, Clone)]
pub struct ConfigLoader {
    files: Vec<FileSource>,
    use_environment: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Loader with no file sources that reads the environment
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            use_environment: true,
        }
    }

    /// Load with the standard file discovery and environment overrides
    pub fn load() -> ConfigResult<RunConfig> {
        let loader = match env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::new().with_file(path),
            _ => Self::new().with_optional_file(DEFAULT_CONFIG_FILE),
        };
        loader.build()
    }

    /// Parse a TOML document on its own, ignoring the environment
    pub fn from_toml_str(toml: &str) -> ConfigResult<RunConfig> {
        Self::new().with_toml(toml).without_environment().build()
    }

    /// Add a TOML file that must exist
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.files.push(FileSource::Path {
            path: path.as_ref().to_path_buf(),
            required: true,
        });
        self
    }

    /// Add a TOML file that is skipped when missing
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.files.push(FileSource::Path {
            path: path.as_ref().to_path_buf(),
            required: false,
        });
        self
    }

    pub fn with_toml<S: Into<String>>(mut self, toml: S) -> Self {
        self.files.push(FileSource::Inline(toml.into()));
        self
    }

    pub fn without_environment(mut self) -> Self {
        self.use_environment = false;
        self
    }

    pub fn build(self) -> ConfigResult<RunConfig> {
        let mut builder = Config::builder();

        for source in &self.files {
            builder = match source {
                FileSource::Path { path, required } => {
                    debug!(path = %path.display(), required, "Adding configuration file");
                    builder.add_source(
                        File::from(path.as_path())
                            .format(FileFormat::Toml)
                            .required(*required),
                    )
                }
                FileSource::Inline(toml) => {
                    builder.add_source(File::from_str(toml, FileFormat::Toml))
                }
            };
        }

        if self.use_environment {
            builder = builder.add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("expected_modules"),
            );
        }

        let config: RunConfig = builder.build()?.try_deserialize()?;

        debug!(
            batch_size = config.batch_size,
            destination_id = ?config.destination_id,
            target_range = %config.target_range,
            "Run configuration loaded"
        );

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigurationError;
    use std::io::Write;

    #[test]
    fn test_from_toml_str() {
        let config = ConfigLoader::from_toml_str(
            r#"
            batch_size = 25
            destination_id = "sheet-abc"
            expected_modules = ["example1", "example2", "example3", "example4"]
            "#,
        )
        .unwrap();

        assert_eq!(config.batch_size, 25);
        assert_eq!(config.destination_id.as_deref(), Some("sheet-abc"));
        assert_eq!(config.expected_modules.as_ref().map(Vec::len), Some(4));
        assert_eq!(config.target_range, "A2:Z1000");
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = ConfigLoader::from_toml_str("").unwrap();
        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn test_later_sources_override_earlier() {
        let config = ConfigLoader::new()
            .with_toml("batch_size = 5\ndestination_id = \"first\"")
            .with_toml("destination_id = \"second\"")
            .without_environment()
            .build()
            .unwrap();

        assert_eq!(config.batch_size, 5);
        assert_eq!(config.destination_id.as_deref(), Some("second"));
    }

    #[test]
    fn test_file_source() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "destination_id = \"from-file\"\nmax_concurrent_batches = 3").unwrap();

        let config = ConfigLoader::new()
            .with_file(file.path())
            .without_environment()
            .build()
            .unwrap();

        assert_eq!(config.destination_id.as_deref(), Some("from-file"));
        assert_eq!(config.max_concurrent_batches, 3);
    }

    #[test]
    fn test_missing_required_file_fails() {
        let result = ConfigLoader::new()
            .with_file("/nonexistent/delay_monitor.toml")
            .without_environment()
            .build();

        assert!(matches!(result, Err(ConfigurationError::Load { .. })));
    }

    #[test]
    fn test_missing_optional_file_is_skipped() {
        let config = ConfigLoader::new()
            .with_optional_file("/nonexistent/delay_monitor.toml")
            .without_environment()
            .build()
            .unwrap();

        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn test_wrong_type_is_load_error() {
        let result = ConfigLoader::from_toml_str("batch_size = \"many\"");
        assert!(matches!(result, Err(ConfigurationError::Load { .. })));
    }
}
