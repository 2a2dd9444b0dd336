use crate::error::{ErrorContext, ExceptionLog, MlError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Identity of a persisted model.
///
/// `model_type` is an explicit tag chosen by the caller (typically the
/// model's type name); the file name and directory are derived from it
/// deterministically, so identical metadata always resolves to the same
/// path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelMetadata {
    pub developer: String,
    pub model_type: String,
    pub version: String,
    pub study: String,
    pub problem_type: String,
}

impl ModelMetadata {
    pub fn new(
        developer: impl Into<String>,
        model_type: impl Into<String>,
        version: impl Into<String>,
        study: impl Into<String>,
        problem_type: impl Into<String>,
    ) -> Self {
        Self {
            developer: developer.into(),
            model_type: model_type.into(),
            version: version.into(),
            study: study.into(),
            problem_type: problem_type.into(),
        }
    }

    /// `{developer}_{model_type}_{version}_{study}_{problem_type}.pkl`
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}_{}_{}_{}.pkl",
            self.developer, self.model_type, self.version, self.study, self.problem_type
        )
    }

    /// Path relative to the store root: `{model_type}/{file_name}`
    pub fn relative_path(&self) -> PathBuf {
        Path::new(&self.model_type).join(self.file_name())
    }
}

/// Persistent store for trained models, rooted at a `models/` directory.
///
/// Models are serialized with bincode into per-type subdirectories. Every
/// failure is translated into [`MlError::ModelSaving`] or
/// [`MlError::ModelLoading`] and recorded in the exception log before it
/// is returned, so a durable record exists whether or not the caller
/// handles the error.
pub struct ModelStore {
    root: PathBuf,
    exceptions: ExceptionLog,
}

impl ModelStore {
    /// Create a store at `root`, creating the directory if absent.
    pub fn new<P: AsRef<Path>>(root: P, exceptions: ExceptionLog) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root, exceptions })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path the store would use for `meta`
    pub fn path_for(&self, meta: &ModelMetadata) -> PathBuf {
        self.root.join(meta.relative_path())
    }

    /// Serialize `model` to its versioned path and return that path.
    ///
    /// Saving twice with identical metadata overwrites the same file.
    pub fn save<M: Serialize>(&self, model: &M, meta: &ModelMetadata) -> Result<PathBuf> {
        let path = self.path_for(meta);

        let directory = self.root.join(&meta.model_type);
        std::fs::create_dir_all(&directory)
            .map_err(|e| self.saving_error(&meta.developer, e.to_string(), &path))?;

        let bytes = bincode::serialize(model)
            .map_err(|e| self.saving_error(&meta.developer, e.to_string(), &path))?;

        std::fs::write(&path, bytes)
            .map_err(|e| self.saving_error(&meta.developer, e.to_string(), &path))?;

        tracing::info!(path = %path.display(), "model saved");
        Ok(path)
    }

    /// Deserialize a model from `path`.
    ///
    /// A missing path, like any read or decode failure, is surfaced as
    /// [`MlError::ModelLoading`], never as a raw I/O error.
    pub fn load<M: DeserializeOwned>(&self, path: &Path, developer: &str) -> Result<M> {
        if !path.exists() {
            return Err(self.loading_error(
                developer,
                format!("file {} does not exist", path.display()),
                path,
            ));
        }

        let bytes = std::fs::read(path)
            .map_err(|e| self.loading_error(developer, e.to_string(), path))?;

        let model = bincode::deserialize(&bytes)
            .map_err(|e| self.loading_error(developer, e.to_string(), path))?;

        tracing::info!(path = %path.display(), "model loaded");
        Ok(model)
    }

    #[track_caller]
    fn saving_error(&self, developer: &str, message: String, path: &Path) -> MlError {
        let err = MlError::ModelSaving {
            context: ErrorContext::capture(developer, message),
            file_path: path.to_path_buf(),
        };
        self.record(&err);
        err
    }

    #[track_caller]
    fn loading_error(&self, developer: &str, message: String, path: &Path) -> MlError {
        let err = MlError::ModelLoading {
            context: ErrorContext::capture(developer, message),
            file_path: path.to_path_buf(),
        };
        self.record(&err);
        err
    }

    fn record(&self, err: &MlError) {
        if let Err(log_err) = self.exceptions.record(err) {
            tracing::warn!(error = %log_err, "failed to write exception log");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct FittedModel {
        weights: Vec<f64>,
        intercept: f64,
    }

    fn create_test_store() -> (ModelStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let exceptions = ExceptionLog::new(temp_dir.path().join("logs")).unwrap();
        let store = ModelStore::new(temp_dir.path().join("models"), exceptions).unwrap();
        (store, temp_dir)
    }

    fn housing_metadata() -> ModelMetadata {
        ModelMetadata::new(
            "David",
            "RandomForestRegressor",
            "1.0",
            "HousingStudy",
            "regression",
        )
    }

    #[test]
    fn test_path_layout() {
        let (store, _temp_dir) = create_test_store();
        let path = store.path_for(&housing_metadata());
        assert!(path.ends_with(
            "RandomForestRegressor/David_RandomForestRegressor_1.0_HousingStudy_regression.pkl"
        ));
    }

    #[test]
    fn test_save_load_round_trip() {
        let (store, _temp_dir) = create_test_store();
        let model = FittedModel {
            weights: vec![0.1, -0.4, 2.3],
            intercept: 0.7,
        };

        let path = store.save(&model, &housing_metadata()).unwrap();
        assert!(path.exists());

        let restored: FittedModel = store.load(&path, "David").unwrap();
        assert_eq!(restored, model);
    }

    #[test]
    fn test_save_overwrites_same_path() {
        let (store, _temp_dir) = create_test_store();
        let meta = housing_metadata();

        let first = store
            .save(&FittedModel { weights: vec![1.0], intercept: 0.0 }, &meta)
            .unwrap();
        let second = store
            .save(&FittedModel { weights: vec![2.0], intercept: 0.0 }, &meta)
            .unwrap();
        assert_eq!(first, second);

        let restored: FittedModel = store.load(&second, "David").unwrap();
        assert_eq!(restored.weights, vec![2.0]);
    }

    #[test]
    fn test_load_missing_path_is_model_loading_error() {
        let (store, temp_dir) = create_test_store();
        let missing = temp_dir.path().join("models/nope.pkl");

        let err = store.load::<FittedModel>(&missing, "David").unwrap_err();
        assert_eq!(err.error_code(), "MODEL_LOADING_ERROR");
        assert_eq!(err.file_path().unwrap(), missing.as_path());
    }

    #[test]
    fn test_load_failure_is_recorded_in_exception_log() {
        let (store, temp_dir) = create_test_store();
        let missing = temp_dir.path().join("models/nope.pkl");

        let err = store.load::<FittedModel>(&missing, "David").unwrap_err();

        let log_path = store.exceptions.file_for("David");
        let contents = std::fs::read_to_string(&log_path).unwrap();
        assert!(contents.contains("does not exist"));
        assert!(contents.contains("Full traceback:"));
        assert!(contents.contains(&err.context().message));
    }

    #[test]
    fn test_corrupt_file_is_model_loading_error() {
        let (store, _temp_dir) = create_test_store();
        let meta = housing_metadata();

        let path = store
            .save(&FittedModel { weights: vec![1.0], intercept: 0.0 }, &meta)
            .unwrap();
        std::fs::write(&path, b"not bincode").unwrap();

        // Too-short payload cannot decode the weights vector
        let err = store.load::<FittedModel>(&path, "David").unwrap_err();
        assert_eq!(err.error_code(), "MODEL_LOADING_ERROR");
    }
}
