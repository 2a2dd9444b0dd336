use chrono::{DateTime, Local, Utc};
use std::backtrace::Backtrace;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Shared context captured when an [`MlError`] is constructed.
///
/// Construction is pure: capturing a context performs no I/O. Durable
/// logging is a separate, explicit step via [`ExceptionLog::record`].
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Developer the error is attributed to (selects the exception log file)
    pub developer: String,

    /// Text of the underlying error
    pub message: String,

    /// Source location where the context was captured, if available
    pub location: Option<SourceLocation>,

    /// Formatted backtrace captured at construction
    pub backtrace: String,

    /// Capture timestamp
    pub occurred_at: DateTime<Utc>,
}

/// File and line of the capture site
#[derive(Debug, Clone)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
}

impl ErrorContext {
    /// Capture a context at the caller's source location, with a backtrace.
    #[track_caller]
    pub fn capture(developer: impl Into<String>, message: impl Into<String>) -> Self {
        let caller = std::panic::Location::caller();
        Self {
            developer: developer.into(),
            message: message.into(),
            location: Some(SourceLocation {
                file: caller.file().to_string(),
                line: caller.line(),
            }),
            backtrace: Backtrace::force_capture().to_string(),
            occurred_at: Utc::now(),
        }
    }

    /// Capture a context without a source location.
    ///
    /// The rendered detail degrades to just the error text.
    pub fn bare(developer: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            developer: developer.into(),
            message: message.into(),
            location: None,
            backtrace: Backtrace::force_capture().to_string(),
            occurred_at: Utc::now(),
        }
    }

    /// Human-readable detail line: location (when present) plus the error text.
    pub fn detail(&self) -> String {
        match &self.location {
            Some(loc) => format!(
                "Error in [{}] at line [{}]: {}",
                loc.file, loc.line, self.message
            ),
            None => format!("Error: {}", self.message),
        }
    }
}

/// Typed errors for the ML workflow.
///
/// Every variant carries an [`ErrorContext`] plus one domain payload.
/// Constructing a value has no side effects; code that constructs an
/// `MlError` and does not hand it to a crate API that records it must
/// call [`ExceptionLog::record`] itself so the error is durably logged.
#[derive(Error, Debug)]
pub enum MlError {
    /// Input data failed validation
    #[error("{}\nInvalid data: {invalid_data}", .context.detail())]
    DataValidation {
        context: ErrorContext,
        invalid_data: String,
    },

    /// Model training failed
    #[error("{}\nModel parameters: {model_params}", .context.detail())]
    ModelTraining {
        context: ErrorContext,
        model_params: String,
    },

    /// Prediction failed
    #[error("{}\nInput data: {input_data}", .context.detail())]
    Prediction {
        context: ErrorContext,
        input_data: String,
    },

    /// Model could not be written to disk
    #[error("{}\nFile path: {}", .context.detail(), .file_path.display())]
    ModelSaving {
        context: ErrorContext,
        file_path: PathBuf,
    },

    /// Model could not be read back from disk
    #[error("{}\nFile path: {}", .context.detail(), .file_path.display())]
    ModelLoading {
        context: ErrorContext,
        file_path: PathBuf,
    },
}

impl MlError {
    /// Shared context of any variant
    pub fn context(&self) -> &ErrorContext {
        match self {
            MlError::DataValidation { context, .. }
            | MlError::ModelTraining { context, .. }
            | MlError::Prediction { context, .. }
            | MlError::ModelSaving { context, .. }
            | MlError::ModelLoading { context, .. } => context,
        }
    }

    /// Developer the error is attributed to
    pub fn developer(&self) -> &str {
        &self.context().developer
    }

    /// Get error code string
    pub fn error_code(&self) -> &str {
        match self {
            MlError::DataValidation { .. } => "DATA_VALIDATION_ERROR",
            MlError::ModelTraining { .. } => "MODEL_TRAINING_ERROR",
            MlError::Prediction { .. } => "PREDICTION_ERROR",
            MlError::ModelSaving { .. } => "MODEL_SAVING_ERROR",
            MlError::ModelLoading { .. } => "MODEL_LOADING_ERROR",
        }
    }

    /// Target path for the persistence variants
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            MlError::ModelSaving { file_path, .. }
            | MlError::ModelLoading { file_path, .. } => Some(file_path),
            _ => None,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, MlError>;

/// Append-only writer for per-developer exception log files.
///
/// Each recorded error lands in `{dir}/{%d-%m-%Y}_{developer}_Exceptions.log`
/// as an ERROR record with the rendered message followed by the full
/// backtrace. One call, one record pair; errors are never re-logged.
#[derive(Debug, Clone)]
pub struct ExceptionLog {
    dir: PathBuf,
}

impl ExceptionLog {
    /// Create a writer rooted at `dir`, creating the directory if absent.
    pub fn new<P: AsRef<Path>>(dir: P) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Log file path for `developer` on the current date
    pub fn file_for(&self, developer: &str) -> PathBuf {
        self.dir.join(format!(
            "{}_{}_Exceptions.log",
            Local::now().format("%d-%m-%Y"),
            developer
        ))
    }

    /// Append one record pair for `err` and return the file written.
    ///
    /// A failed write is returned to the caller rather than panicking, so
    /// a full log disk cannot mask the primary error.
    pub fn record(&self, err: &MlError) -> io::Result<PathBuf> {
        let path = self.file_for(err.developer());
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string();
        writeln!(file, "{} - ERROR - {}", timestamp, err)?;
        writeln!(
            file,
            "{} - ERROR - Full traceback:\n{}",
            timestamp,
            err.context().backtrace
        )?;
        Ok(path)
    }
}
