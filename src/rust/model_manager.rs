use std::path::{Path, PathBuf};
use std::fs;
use std::io;
use std::env;
use sha2::{Sha256, Digest};
use dirs;
use log;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model data is incomplete: {0}")]
    Incomplete(String),
    #[error("Invalid vocabulary: {0}")]
    InvalidVocabulary(String),
    #[error("Model shape mismatch: {0}")]
    ShapeMismatch(String),
    #[error("Invalid model parameter: {0}")]
    InvalidParameter(String),
    #[error("Failed to parse model: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Model not installed: {0}")]
    NotInstalled(String),
    #[error("Hash mismatch: expected {expected}, got {actual} for {path}")]
    HashMismatch {
        path: String,
        expected: String,
        actual: String,
    },
    #[error("Build error: {0}")]
    BuildError(String),
    #[error("Model is already loading")]
    LoadInProgress,
    #[error("Model failed to load earlier: {0}")]
    LoadFailed(String),
}

/// Locates model bundles on disk and checks their integrity.
///
/// Installed models live at `<models_dir>/<name>/model.json`.
#[derive(Debug, Clone)]
pub struct ModelManager {
    models_dir: PathBuf,
}

impl ModelManager {
    /// Creates a new ModelManager with the default models directory
    pub fn new_default() -> Self {
        Self::new(Self::get_default_models_dir())
    }

    /// Returns the default models directory path
    pub fn get_default_models_dir() -> PathBuf {
        // 1. Check environment variable
        if let Ok(path) = env::var("PLATFORM_DETECTOR_HOME") {
            return PathBuf::from(path).join("models");
        }

        // 2. Use platform-specific data directory
        if let Some(data_dir) = dirs::data_dir() {
            return data_dir.join("platform-detector").join("models");
        }

        // 3. Fallback to user's home directory
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(".local").join("share").join("platform-detector").join("models");
        }

        // 4. If all else fails, use system temp directory (platform agnostic)
        env::temp_dir().join("platform-detector").join("models")
    }

    /// Points a manager at `models_dir`. Nothing is read or created on disk.
    pub fn new<P: AsRef<Path>>(models_dir: P) -> Self {
        Self { models_dir: models_dir.as_ref().to_path_buf() }
    }

    /// Creates the directory an installed model `name` lives in.
    ///
    /// Only install tooling needs this; loading never writes to disk.
    pub fn ensure_model_dir(&self, name: &str) -> io::Result<PathBuf> {
        let dir = self.models_dir.join(name);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    pub fn get_model_path(&self, name: &str) -> PathBuf {
        self.models_dir.join(name).join("model.json")
    }

    pub fn is_model_installed(&self, name: &str) -> bool {
        let model_path = self.get_model_path(name);
        log::debug!("Model path: {:?} (exists: {})", model_path, model_path.exists());
        model_path.exists()
    }

    /// Reads an installed model bundle by name
    pub fn read_installed(&self, name: &str) -> Result<Vec<u8>, ModelError> {
        if !self.is_model_installed(name) {
            return Err(ModelError::NotInstalled(format!(
                "'{}' not found under {:?}", name, self.models_dir
            )));
        }
        Self::read_model_file(&self.get_model_path(name), None)
    }

    /// Async counterpart of [`ModelManager::read_installed`]
    pub async fn read_installed_async(&self, name: &str) -> Result<Vec<u8>, ModelError> {
        if !self.is_model_installed(name) {
            return Err(ModelError::NotInstalled(format!(
                "'{}' not found under {:?}", name, self.models_dir
            )));
        }
        Self::read_model_file_async(&self.get_model_path(name), None).await
    }

    /// Reads a model file, checking its SHA-256 when `expected_hash` is given.
    pub fn read_model_file(path: &Path, expected_hash: Option<&str>) -> Result<Vec<u8>, ModelError> {
        log::info!("Reading model file {:?}", path);
        let bytes = fs::read(path)?;
        log::debug!("Read {} bytes", bytes.len());
        if let Some(expected) = expected_hash {
            Self::check_hash(path, &bytes, expected)?;
        }
        Ok(bytes)
    }

    pub async fn read_model_file_async(path: &Path, expected_hash: Option<&str>) -> Result<Vec<u8>, ModelError> {
        log::info!("Reading model file {:?}", path);
        let bytes = tokio::fs::read(path).await?;
        log::debug!("Read {} bytes", bytes.len());
        if let Some(expected) = expected_hash {
            Self::check_hash(path, &bytes, expected)?;
        }
        Ok(bytes)
    }

    /// Returns whether the file at `path` has the given SHA-256 digest
    pub fn verify_file(path: &Path, expected_hash: &str) -> Result<bool, ModelError> {
        log::info!("Verifying file: {:?}", path);
        let bytes = fs::read(path)?;
        Ok(sha256_hex(&bytes) == expected_hash.to_ascii_lowercase())
    }

    fn check_hash(path: &Path, bytes: &[u8], expected: &str) -> Result<(), ModelError> {
        let actual = sha256_hex(bytes);
        let expected = expected.to_ascii_lowercase();
        log::debug!("Calculated hash: {}", actual);
        log::debug!("Expected hash:   {}", expected);
        if actual != expected {
            log::error!("Hash mismatch for {:?}: expected {}, got {}", path, expected, actual);
            return Err(ModelError::HashMismatch {
                path: path.display().to_string(),
                expected,
                actual,
            });
        }
        Ok(())
    }
}

/// Lowercase hex SHA-256 of `bytes`
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
