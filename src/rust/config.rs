use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::models::BuiltinModel;

pub const MODEL_PATH_ENV: &str = "PLATFORM_DETECTOR_MODEL";
pub const MODEL_SHA256_ENV: &str = "PLATFORM_DETECTOR_MODEL_SHA256";
pub const INSTALLED_MODEL_ENV: &str = "PLATFORM_DETECTOR_INSTALLED_MODEL";

/// Where the model bundle is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// A bundle compiled into the library
    Builtin(BuiltinModel),
    /// A JSON bundle on disk, optionally pinned to a SHA-256 digest
    File { path: PathBuf, sha256: Option<String> },
    /// A bundle installed under the `ModelManager` models directory
    Installed(String),
    /// A JSON document already in memory
    Json(String),
}

impl Default for ModelSource {
    fn default() -> Self {
        ModelSource::Builtin(BuiltinModel::SocialMedia)
    }
}

impl fmt::Display for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(model) => write!(f, "builtin:{}", model),
            Self::File { path, .. } => write!(f, "file:{}", path.display()),
            Self::Installed(name) => write!(f, "installed:{}", name),
            Self::Json(_) => write!(f, "inline-json"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectorConfig {
    pub model_source: ModelSource,
}

impl DetectorConfig {
    pub fn new(model_source: ModelSource) -> Self {
        Self { model_source }
    }

    /// Reads the model source from the environment, falling back to the
    /// built-in model.
    ///
    /// `PLATFORM_DETECTOR_MODEL` (a file path, with optional
    /// `PLATFORM_DETECTOR_MODEL_SHA256`) takes precedence over
    /// `PLATFORM_DETECTOR_INSTALLED_MODEL`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let model_source = if let Some(path) = non_empty(MODEL_PATH_ENV) {
            ModelSource::File {
                path: PathBuf::from(path),
                sha256: non_empty(MODEL_SHA256_ENV),
            }
        } else if let Some(name) = non_empty(INSTALLED_MODEL_ENV) {
            ModelSource::Installed(name)
        } else {
            ModelSource::default()
        };

        Self { model_source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_default_is_builtin() {
        let config = DetectorConfig::from_lookup(lookup(&[]));
        assert_eq!(config.model_source, ModelSource::Builtin(BuiltinModel::SocialMedia));
    }

    #[test]
    fn test_file_source_with_hash() {
        let config = DetectorConfig::from_lookup(lookup(&[
            (MODEL_PATH_ENV, "/models/social.json"),
            (MODEL_SHA256_ENV, "abc123"),
            (INSTALLED_MODEL_ENV, "ignored"),
        ]));
        assert_eq!(config.model_source, ModelSource::File {
            path: PathBuf::from("/models/social.json"),
            sha256: Some("abc123".to_string()),
        });
    }

    #[test]
    fn test_installed_source() {
        let config = DetectorConfig::from_lookup(lookup(&[
            (MODEL_PATH_ENV, "  "),
            (INSTALLED_MODEL_ENV, "socialmedia-v2"),
        ]));
        assert_eq!(config.model_source, ModelSource::Installed("socialmedia-v2".to_string()));
    }

    #[test]
    fn test_display() {
        assert_eq!(ModelSource::default().to_string(), "builtin:socialmedia");
        assert_eq!(ModelSource::Json("{}".into()).to_string(), "inline-json");
    }
}
