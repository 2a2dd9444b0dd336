//! Common test utilities
//!
//! Builds an isolated workspace (logs/ and models/ under a temp dir) so
//! integration tests never touch the real filesystem layout.

use ml_ops_support::{ExceptionLog, LoggerRegistry, ModelStore};
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("create temp workspace"),
        }
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.temp_dir.path().join("logs")
    }

    pub fn models_dir(&self) -> PathBuf {
        self.temp_dir.path().join("models")
    }

    pub fn registry(&self) -> LoggerRegistry {
        LoggerRegistry::new(self.logs_dir()).expect("create logger registry")
    }

    pub fn exception_log(&self) -> ExceptionLog {
        ExceptionLog::new(self.logs_dir()).expect("create exception log")
    }

    pub fn model_store(&self) -> ModelStore {
        ModelStore::new(self.models_dir(), self.exception_log()).expect("create model store")
    }
}
