use std::sync::Arc;
use log::debug;

use super::error::ClassifierError;
use super::model::NaiveBayesModel;
use super::scoring::{first_argmax, joint_log_likelihood};
use super::tokenizer::{CountVector, TextVectorizer};
use super::vocabulary::Vocabulary;

/// A thread-safe multinomial Naive Bayes text classifier.
///
/// # Thread Safety
///
/// The model is immutable once built and shared through an `Arc`, so a
/// `Classifier` is `Send + Sync` and can be read from any number of threads
/// without locking.
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use platform_detector::{Classifier, BuiltinModel};
///
/// let classifier = Classifier::builder()
///     .with_model(BuiltinModel::SocialMedia)?
///     .build()?;
///
/// let label = classifier.predict("Retweet this thread, it's trending!")?;
/// assert_eq!(label, "Twitter");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Classifier {
    pub(crate) source: String,
    pub(crate) model: Arc<NaiveBayesModel>,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Classifier>();
    }
};

impl TextVectorizer for Classifier {
    fn vocabulary(&self) -> &Vocabulary {
        self.model.vocabulary()
    }
}

impl Classifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Returns information about the loaded model
    pub fn info(&self) -> super::ClassifierInfo {
        super::ClassifierInfo {
            model_source: self.source.clone(),
            num_classes: self.model.num_classes(),
            class_labels: self.model.classes().to_vec(),
            vocabulary_size: self.model.vocabulary().len(),
        }
    }

    pub fn model(&self) -> &NaiveBayesModel {
        &self.model
    }

    /// Predicts the label of `text`.
    ///
    /// # Errors
    /// - `ValidationError` if the text is empty or only whitespace
    pub fn predict(&self, text: &str) -> Result<String, ClassifierError> {
        validate_text(text)?;
        let counts = self.tokenize(text);
        self.classify(&counts).map(str::to_owned)
    }

    /// Picks the class with the highest joint log-likelihood for `counts`.
    ///
    /// When several classes share the maximum score, the one listed first in
    /// the model wins.
    ///
    /// # Errors
    /// - `ValidationError` if `counts` was built for a different vocabulary size
    pub fn classify(&self, counts: &CountVector) -> Result<&str, ClassifierError> {
        let expected = self.model.vocabulary().len();
        if counts.len() != expected {
            return Err(ClassifierError::ValidationError(format!(
                "Count vector has {} entries but the vocabulary has {}",
                counts.len(), expected
            )));
        }

        let scores = joint_log_likelihood(&self.model, counts);
        // A validated model always has at least one class.
        let best = first_argmax(scores.view()).unwrap_or(0);
        let label = self.model.classes()[best].as_str();
        debug!("Scored {} known tokens, best class '{}' ({:.4})", counts.total(), label, scores[best]);
        Ok(label)
    }
}

/// Rejects empty or whitespace-only input before it reaches the tokenizer
pub(crate) fn validate_text(text: &str) -> Result<(), ClassifierError> {
    if text.trim().is_empty() {
        return Err(ClassifierError::ValidationError("Input text cannot be empty".into()));
    }
    Ok(())
}
