use crate::error::ExceptionLog;
use crate::logging::LoggerRegistry;
use crate::persistence::ModelStore;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main crate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Developer name used for log files and model metadata
    #[serde(default = "default_developer")]
    pub developer: String,

    /// Workspace directory layout
    #[serde(default)]
    pub workspace: WorkspaceConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/default.toml".to_string());

        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables (prefix: ML_OPS_)
            .add_source(
                config::Environment::with_prefix("ML_OPS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Logger registry rooted at the configured logs directory
    pub fn logger_registry(&self) -> std::io::Result<LoggerRegistry> {
        LoggerRegistry::new(&self.workspace.logs_dir)
    }

    /// Exception log writer rooted at the configured logs directory
    pub fn exception_log(&self) -> std::io::Result<ExceptionLog> {
        ExceptionLog::new(&self.workspace.logs_dir)
    }

    /// Model store rooted at the configured models directory
    pub fn model_store(&self) -> std::io::Result<ModelStore> {
        ModelStore::new(&self.workspace.models_dir, self.exception_log()?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Directory for channel and exception log files
    #[serde(default = "default_logs_dir")]
    pub logs_dir: PathBuf,

    /// Root directory for persisted models
    #[serde(default = "default_models_dir")]
    pub models_dir: PathBuf,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            logs_dir: default_logs_dir(),
            models_dir: default_models_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level for the crate's own tracing diagnostics
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

/// Initialize the tracing subscriber for the crate's own diagnostics.
///
/// `RUST_LOG` takes precedence over the configured level. Call once per
/// process; typically from the application entry point.
pub fn init_tracing(cfg: &ObservabilityConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cfg.log_level.clone()));

    let registry = tracing_subscriber::registry().with(filter);
    if cfg.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

// Default value functions
fn default_developer() -> String {
    "developer".to_string()
}

fn default_logs_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_models_dir() -> PathBuf {
    PathBuf::from("models")
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        assert_eq!(default_developer(), "developer");
        assert_eq!(default_logs_dir(), PathBuf::from("logs"));
        assert_eq!(default_models_dir(), PathBuf::from("models"));
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn test_embedded_defaults_deserialize() {
        let cfg: Config = config::Config::builder()
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.developer, "developer");
        assert_eq!(cfg.workspace.logs_dir, PathBuf::from("logs"));
        assert_eq!(cfg.workspace.models_dir, PathBuf::from("models"));
        assert_eq!(cfg.observability.log_level, "info");
        assert!(!cfg.observability.json_logs);
    }
}
