use std::fmt;

/// Errors returned by a single prediction call.
///
/// These never change the state of the detector: a failed call can simply be
/// retried with different input, or after the model has finished loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifierError {
    /// `predict` was called before a model finished loading successfully
    NotReadyError(String),
    /// The caller passed input that cannot be classified (empty or blank text)
    ValidationError(String),
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotReadyError(msg) => write!(f, "Not ready: {}", msg),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ClassifierError {}
