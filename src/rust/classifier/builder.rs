use std::path::Path;
use std::sync::Arc;
use log::{info, error};

use super::classifier::Classifier;
use super::model::{ModelBundle, NaiveBayesModel};
use crate::{BuiltinModel, ModelManager, ModelError, ModelSource};

/// A builder for constructing a Classifier with a fluent interface.
///
/// Exactly one model must be set before calling [`ClassifierBuilder::build`].
#[derive(Default, Debug)]
pub struct ClassifierBuilder {
    source: Option<String>,
    model: Option<NaiveBayesModel>,
}

impl ClassifierBuilder {
    /// Creates a new empty ClassifierBuilder
    ///
    /// # Example
    /// ```
    /// use platform_detector::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new();
    /// ```
    pub fn new() -> Self {
        Self {
            source: None,
            model: None,
        }
    }

    /// Uses one of the models compiled into the library
    ///
    /// # Example
    /// ```
    /// use platform_detector::{ClassifierBuilder, BuiltinModel};
    ///
    /// let builder = ClassifierBuilder::new()
    ///     .with_model(BuiltinModel::SocialMedia);
    /// assert!(builder.is_ok());
    /// ```
    pub fn with_model(self, model: BuiltinModel) -> Result<Self, ModelError> {
        self.ensure_unset()?;
        let parsed = NaiveBayesModel::from_json_str(model.bundle_json());
        self.set_model(ModelSource::Builtin(model).to_string(), parsed)
    }

    /// Reads a JSON bundle from disk
    ///
    /// # Arguments
    /// * `path` - Path to the JSON model bundle
    /// * `expected_sha256` - Optional lowercase hex SHA-256 the file must match
    ///
    /// # Returns
    /// * `Result<Self, ModelError>` - The builder instance if successful, or an error if:
    ///   - A model is already set
    ///   - The file cannot be read or fails the checksum
    ///   - The bundle is incomplete or inconsistent
    pub fn with_model_file<P: AsRef<Path>>(
        self,
        path: P,
        expected_sha256: Option<&str>,
    ) -> Result<Self, ModelError> {
        self.ensure_unset()?;
        let path = path.as_ref();
        let parsed = ModelManager::read_model_file(path, expected_sha256)
            .and_then(|bytes| NaiveBayesModel::from_json_slice(&bytes));
        self.set_model(format!("file:{}", path.display()), parsed)
    }

    /// Reads a bundle installed under the manager's models directory
    pub fn with_installed_model(self, manager: &ModelManager, name: &str) -> Result<Self, ModelError> {
        self.ensure_unset()?;
        let parsed = manager.read_installed(name)
            .and_then(|bytes| NaiveBayesModel::from_json_slice(&bytes));
        self.set_model(ModelSource::Installed(name.to_string()).to_string(), parsed)
    }

    /// Parses a JSON bundle held in memory
    pub fn with_model_json(self, json: &str) -> Result<Self, ModelError> {
        self.ensure_unset()?;
        let parsed = NaiveBayesModel::from_json_str(json);
        self.set_model(ModelSource::Json(String::new()).to_string(), parsed)
    }

    /// Uses an already deserialized bundle
    pub fn with_bundle(self, bundle: ModelBundle) -> Result<Self, ModelError> {
        self.ensure_unset()?;
        let parsed = NaiveBayesModel::from_bundle(bundle);
        self.set_model("bundle".to_string(), parsed)
    }

    /// Dispatches on a [`ModelSource`], e.g. one read from configuration
    pub fn with_source(self, source: &ModelSource) -> Result<Self, ModelError> {
        match source {
            ModelSource::Builtin(model) => self.with_model(*model),
            ModelSource::File { path, sha256 } => self.with_model_file(path, sha256.as_deref()),
            ModelSource::Installed(name) => {
                let manager = ModelManager::new_default();
                self.with_installed_model(&manager, name)
            }
            ModelSource::Json(json) => self.with_model_json(json),
        }
    }

    /// Builds and returns the final Classifier instance
    ///
    /// # Example
    /// ```
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use platform_detector::{ClassifierBuilder, BuiltinModel};
    ///
    /// let classifier = ClassifierBuilder::new()
    ///     .with_model(BuiltinModel::SocialMedia)?
    ///     .build()?;
    /// assert_eq!(classifier.info().num_classes, 5);
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self) -> Result<Classifier, ModelError> {
        match (self.source, self.model) {
            (Some(source), Some(model)) => Ok(Classifier {
                source,
                model: Arc::new(model),
            }),
            _ => Err(ModelError::BuildError("A model must be set before building".to_string())),
        }
    }

    fn ensure_unset(&self) -> Result<(), ModelError> {
        if self.model.is_some() {
            return Err(ModelError::BuildError("Model already set".to_string()));
        }
        Ok(())
    }

    pub(crate) fn set_model(
        mut self,
        source: String,
        parsed: Result<NaiveBayesModel, ModelError>,
    ) -> Result<Self, ModelError> {
        let model = parsed.map_err(|e| {
            error!("Failed to load model from {}: {}", source, e);
            e
        })?;
        info!(
            "Model loaded from {} ({} classes, {} vocabulary tokens)",
            source, model.num_classes(), model.vocabulary().len()
        );
        self.source = Some(source);
        self.model = Some(model);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_model() {
        let result = ClassifierBuilder::new().build();
        assert!(matches!(result, Err(ModelError::BuildError(_))));
    }

    #[test]
    fn test_model_set_twice() {
        let result = ClassifierBuilder::new()
            .with_model(BuiltinModel::SocialMedia)
            .and_then(|builder| builder.with_model(BuiltinModel::SocialMedia));
        assert!(matches!(result, Err(ModelError::BuildError(_))));
    }

    #[test]
    fn test_incomplete_json() {
        let result = ClassifierBuilder::new()
            .with_model_json(r#"{"vocab": {"a": 0}, "classes": [], "class_log_prior": [0.0], "feature_log_prob": [[0.0]]}"#);
        assert!(matches!(result, Err(ModelError::Incomplete(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = ClassifierBuilder::new()
            .with_model_file("/definitely/not/here/model.json", None);
        assert!(matches!(result, Err(ModelError::IoError(_))));
    }
}
