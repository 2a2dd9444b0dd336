use super::{Channel, ChannelName, Severity};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use strum::IntoEnumIterator;

/// The six channels belonging to one developer.
///
/// Files are `{logs_dir}/{developer}_{channel}.log`. All six channels
/// exist for the lifetime of the set, so [`DeveloperChannels::get_channel`]
/// is total.
pub struct DeveloperChannels {
    developer: String,
    channels: HashMap<ChannelName, Channel>,
}

impl DeveloperChannels {
    fn open(logs_dir: &Path, developer: &str) -> io::Result<Self> {
        let mut channels = HashMap::new();
        for name in ChannelName::iter() {
            let path = logs_dir.join(format!("{}_{}.log", developer, name));
            channels.insert(name, Channel::open(name, path)?);
        }
        Ok(Self {
            developer: developer.to_string(),
            channels,
        })
    }

    pub fn developer(&self) -> &str {
        &self.developer
    }

    /// The named channel handle
    pub fn get_channel(&self, name: ChannelName) -> &Channel {
        &self.channels[&name]
    }

    /// Look a channel up by its string name; unknown names yield `None`.
    pub fn channel_by_name(&self, name: &str) -> Option<&Channel> {
        name.parse::<ChannelName>().ok().map(|n| self.get_channel(n))
    }

    /// Write one record to `channel` at `severity`.
    #[track_caller]
    pub fn log(&self, channel: ChannelName, severity: Severity, message: &str) {
        let line = std::panic::Location::caller().line();
        self.get_channel(channel).write(severity, line, message);
    }

    /// Record the metrics of one model evaluation on the results channel.
    ///
    /// `hyperparams` is a pre-rendered description (e.g. the tuner's trial
    /// parameters plus its version); `exec_time_secs` is wall-clock seconds.
    #[track_caller]
    #[allow(clippy::too_many_arguments)]
    pub fn log_results(
        &self,
        study: &str,
        version: &str,
        model: &str,
        rmse: f64,
        mse: f64,
        mae: f64,
        r2: f64,
        hyperparams: &str,
        exec_time_secs: f64,
    ) {
        let line = std::panic::Location::caller().line();
        let message = format!(
            "Study: {} v{} | Model: {} | RMSE: {} | MSE: {} | MAE: {} | R2: {} | Hyperparams: {} | Execution time: {}",
            study, version, model, rmse, mse, mae, r2, hyperparams, exec_time_secs
        );
        self.get_channel(ChannelName::Results)
            .write(Severity::Info, line, &message);
    }

    /// Record a generated visualization on the visualizations channel.
    #[track_caller]
    pub fn log_visualization(&self, name: &str, path: &Path) {
        let line = std::panic::Location::caller().line();
        let message = format!("Visualization: {} | Location: {}", name, path.display());
        self.get_channel(ChannelName::Visualizations)
            .write(Severity::Info, line, &message);
    }

    /// Record the outcome of an optimization run on the optimization
    /// channel. `hyperparams` and `results` are rendered as compact JSON.
    #[track_caller]
    pub fn log_optimization(
        &self,
        study: &str,
        version: &str,
        final_model: &str,
        hyperparams: &serde_json::Value,
        exec_time_secs: f64,
        results: &serde_json::Value,
    ) {
        let line = std::panic::Location::caller().line();
        let message = format!(
            "Study: {} | Version: {} | Final model: {} | Hyperparams: {} | Execution time: {} | Results: {}",
            study, version, final_model, hyperparams, exec_time_secs, results
        );
        self.get_channel(ChannelName::Optimization)
            .write(Severity::Info, line, &message);
    }
}

/// Owned registry of per-developer channel sets.
///
/// Invariant: one set of open file handles per developer per process,
/// provided the process owns a single registry. Lookups after the first
/// return the same shared set; duplicate handles are impossible by
/// construction.
pub struct LoggerRegistry {
    logs_dir: PathBuf,
    inner: Mutex<HashMap<String, Arc<DeveloperChannels>>>,
}

impl LoggerRegistry {
    /// Create a registry rooted at `logs_dir`, creating it if absent.
    pub fn new<P: AsRef<Path>>(logs_dir: P) -> io::Result<Self> {
        let logs_dir = logs_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&logs_dir)?;
        Ok(Self {
            logs_dir,
            inner: Mutex::new(HashMap::new()),
        })
    }

    pub fn logs_dir(&self) -> &Path {
        &self.logs_dir
    }

    /// The channel set for `developer`, created lazily on first use.
    pub fn for_developer(&self, developer: &str) -> io::Result<Arc<DeveloperChannels>> {
        let mut inner = self.inner.lock();
        if let Some(existing) = inner.get(developer) {
            return Ok(existing.clone());
        }

        let channels = Arc::new(DeveloperChannels::open(&self.logs_dir, developer)?);
        inner.insert(developer.to_string(), channels.clone());
        tracing::info!(developer, logs_dir = %self.logs_dir.display(), "initialized log channels");
        Ok(channels)
    }
}
