//! The inference facade callers talk to.
//!
//! A [`PlatformDetector`] owns the model for the whole session. It starts out
//! `NotLoaded`, moves to `Loading` while the bundle is read, and ends in either
//! `Ready` or `Failed`. Both end states are final: a ready detector never
//! reloads and a failed one never retries.

use std::sync::{Arc, PoisonError, RwLock};
use log::{error, info, warn};

use crate::classifier::{Classifier, ClassifierBuilder, ClassifierError, ClassifierInfo, NaiveBayesModel};
use crate::classifier::validate_text;
use crate::{DetectorConfig, ModelError, ModelManager, ModelSource};

/// Observable lifecycle of a [`PlatformDetector`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    NotLoaded,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug)]
enum Slot {
    NotLoaded,
    Loading,
    Ready(Arc<Classifier>),
    Failed(String),
}

impl Slot {
    fn state(&self) -> DetectorState {
        match self {
            Slot::NotLoaded => DetectorState::NotLoaded,
            Slot::Loading => DetectorState::Loading,
            Slot::Ready(_) => DetectorState::Ready,
            Slot::Failed(_) => DetectorState::Failed,
        }
    }
}

/// Loads a model once and answers predictions against it.
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use platform_detector::{PlatformDetector, DetectorConfig, DetectorState};
///
/// let detector = PlatformDetector::new(DetectorConfig::default());
/// assert_eq!(detector.state(), DetectorState::NotLoaded);
///
/// detector.load()?;
/// assert_eq!(detector.predict("Excited to announce my new role!")?, "LinkedIn");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PlatformDetector {
    config: DetectorConfig,
    slot: RwLock<Slot>,
}

impl Default for PlatformDetector {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}

impl PlatformDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            slot: RwLock::new(Slot::NotLoaded),
        }
    }

    /// Builds a detector configured from `PLATFORM_DETECTOR_*` environment variables
    pub fn from_env() -> Self {
        Self::new(DetectorConfig::from_env())
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn state(&self) -> DetectorState {
        self.slot.read().unwrap_or_else(PoisonError::into_inner).state()
    }

    pub fn is_ready(&self) -> bool {
        self.state() == DetectorState::Ready
    }

    /// Loads the configured model, blocking the calling thread.
    ///
    /// # Errors
    /// - `LoadInProgress` if another load has not finished yet
    /// - `LoadFailed` if an earlier load already failed
    /// - any validation or I/O error from reading the bundle; the detector
    ///   then stays `Failed`
    pub fn load(&self) -> Result<(), ModelError> {
        let Some(guard) = self.begin_load()? else {
            return Ok(());
        };
        let result = Classifier::builder()
            .with_source(&self.config.model_source)
            .and_then(ClassifierBuilder::build);
        guard.finish(result)
    }

    /// Async counterpart of [`PlatformDetector::load`]; file reads go through `tokio::fs`.
    ///
    /// Dropping the future before it completes puts the detector back to `NotLoaded`.
    pub async fn load_async(&self) -> Result<(), ModelError> {
        let Some(guard) = self.begin_load()? else {
            return Ok(());
        };
        let result = build_classifier_async(&self.config.model_source).await;
        guard.finish(result)
    }

    /// Predicts the platform label for `text`.
    ///
    /// # Errors
    /// - `ValidationError` if `text` is empty or whitespace, whatever the state
    /// - `NotReadyError` if the model is not `Ready`
    pub fn predict(&self, text: &str) -> Result<String, ClassifierError> {
        validate_text(text)?;
        self.ready_classifier()?.predict(text)
    }

    /// The loaded classifier, once the detector is `Ready`
    pub fn classifier(&self) -> Option<Arc<Classifier>> {
        self.ready_classifier().ok()
    }

    pub fn info(&self) -> Option<ClassifierInfo> {
        self.classifier().map(|classifier| classifier.info())
    }

    fn ready_classifier(&self) -> Result<Arc<Classifier>, ClassifierError> {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        match &*slot {
            Slot::Ready(classifier) => Ok(Arc::clone(classifier)),
            Slot::NotLoaded => Err(ClassifierError::NotReadyError("Model not loaded yet".into())),
            Slot::Loading => Err(ClassifierError::NotReadyError("Model is still loading".into())),
            Slot::Failed(reason) => Err(ClassifierError::NotReadyError(
                format!("Model failed to load: {}", reason)
            )),
        }
    }

    /// Moves `NotLoaded` to `Loading`. Returns `None` when already `Ready`.
    fn begin_load(&self) -> Result<Option<LoadingGuard<'_>>, ModelError> {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        match &*slot {
            Slot::Loading => return Err(ModelError::LoadInProgress),
            Slot::Ready(_) => return Ok(None),
            Slot::Failed(reason) => return Err(ModelError::LoadFailed(reason.clone())),
            Slot::NotLoaded => {}
        }
        *slot = Slot::Loading;
        info!("Loading model from {}", self.config.model_source);
        Ok(Some(LoadingGuard { slot: &self.slot, armed: true }))
    }
}

/// Resets an abandoned `Loading` state back to `NotLoaded`.
struct LoadingGuard<'a> {
    slot: &'a RwLock<Slot>,
    armed: bool,
}

impl LoadingGuard<'_> {
    fn finish(mut self, result: Result<Classifier, ModelError>) -> Result<(), ModelError> {
        self.armed = false;
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        match result {
            Ok(classifier) => {
                info!("Model ready ({} classes)", classifier.model().num_classes());
                *slot = Slot::Ready(Arc::new(classifier));
                Ok(())
            }
            Err(e) => {
                error!("Model load failed: {}", e);
                *slot = Slot::Failed(e.to_string());
                Err(e)
            }
        }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if matches!(*slot, Slot::Loading) {
            warn!("Model load abandoned before completing");
            *slot = Slot::NotLoaded;
        }
    }
}

async fn build_classifier_async(source: &ModelSource) -> Result<Classifier, ModelError> {
    match source {
        ModelSource::File { path, sha256 } => {
            let parsed = ModelManager::read_model_file_async(path, sha256.as_deref())
                .await
                .and_then(|bytes| NaiveBayesModel::from_json_slice(&bytes));
            ClassifierBuilder::new().set_model(source.to_string(), parsed)?.build()
        }
        ModelSource::Installed(name) => {
            let manager = ModelManager::new_default();
            let parsed = manager.read_installed_async(name)
                .await
                .and_then(|bytes| NaiveBayesModel::from_json_slice(&bytes));
            ClassifierBuilder::new().set_model(source.to_string(), parsed)?.build()
        }
        ModelSource::Builtin(_) | ModelSource::Json(_) => {
            ClassifierBuilder::new().with_source(source)?.build()
        }
    }
}
