use std::collections::{HashMap, HashSet};
use std::path::Path;

use log::warn;
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Deserializer, Serialize};

use super::vocabulary::Vocabulary;
use crate::model_manager::ModelError;

/// The serialized form of a trained model, as written by the training side.
///
/// Every field defaults to empty, whether its key is missing or set to `null`,
/// so absent and empty fields are reported the same way by
/// [`NaiveBayesModel::from_bundle`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelBundle {
    #[serde(default, deserialize_with = "null_as_default")]
    pub vocab: HashMap<String, usize>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub classes: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub class_log_prior: Vec<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub feature_log_prob: Vec<Vec<f64>>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ModelBundle {
    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ModelError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// A validated multinomial Naive Bayes model.
///
/// Invariants, checked once in [`NaiveBayesModel::from_bundle`]:
/// - there is at least one class and one vocabulary token
/// - `class_log_prior` has one entry per class
/// - `feature_log_prob` is `classes x vocabulary` (one row per class)
/// - every parameter is a log-probability: `<= 0.0`, possibly `-inf`, never NaN
#[derive(Debug, Clone)]
pub struct NaiveBayesModel {
    vocabulary: Vocabulary,
    classes: Vec<String>,
    class_log_prior: Array1<f64>,
    feature_log_prob: Array2<f64>,
}

impl NaiveBayesModel {
    /// Validates a bundle and converts it into the typed model.
    pub fn from_bundle(bundle: ModelBundle) -> Result<Self, ModelError> {
        let ModelBundle { vocab, classes, class_log_prior, feature_log_prob } = bundle;

        if vocab.is_empty() {
            return Err(ModelError::Incomplete("vocab is empty or missing".into()));
        }
        if classes.is_empty() {
            return Err(ModelError::Incomplete("classes is empty or missing".into()));
        }
        if class_log_prior.is_empty() {
            return Err(ModelError::Incomplete("class_log_prior is empty or missing".into()));
        }
        if feature_log_prob.is_empty() {
            return Err(ModelError::Incomplete("feature_log_prob is empty or missing".into()));
        }

        let vocabulary = Vocabulary::new(vocab)?;
        let num_classes = classes.len();
        let vocab_size = vocabulary.len();

        if class_log_prior.len() != num_classes {
            return Err(ModelError::ShapeMismatch(format!(
                "class_log_prior has {} entries but there are {} classes",
                class_log_prior.len(), num_classes
            )));
        }
        if feature_log_prob.len() != num_classes {
            return Err(ModelError::ShapeMismatch(format!(
                "feature_log_prob has {} rows but there are {} classes",
                feature_log_prob.len(), num_classes
            )));
        }
        if let Some((row, values)) = feature_log_prob.iter()
            .enumerate()
            .find(|(_, values)| values.len() != vocab_size)
        {
            return Err(ModelError::ShapeMismatch(format!(
                "feature_log_prob row {} has {} columns but the vocabulary has {} tokens",
                row, values.len(), vocab_size
            )));
        }

        if let Some(position) = class_log_prior.iter().position(|&p| !is_log_probability(p)) {
            return Err(ModelError::InvalidParameter(format!(
                "class_log_prior[{}] = {} is not a log-probability",
                position, class_log_prior[position]
            )));
        }
        for (row, values) in feature_log_prob.iter().enumerate() {
            if let Some(column) = values.iter().position(|&p| !is_log_probability(p)) {
                return Err(ModelError::InvalidParameter(format!(
                    "feature_log_prob[{}][{}] = {} is not a log-probability",
                    row, column, values[column]
                )));
            }
        }

        let mut seen = HashSet::new();
        for label in &classes {
            if !seen.insert(label.as_str()) {
                warn!("Class label '{}' appears more than once; the first occurrence wins ties", label);
            }
        }

        let flat: Vec<f64> = feature_log_prob.into_iter().flatten().collect();
        let feature_log_prob = Array2::from_shape_vec((num_classes, vocab_size), flat)
            .map_err(|e| ModelError::ShapeMismatch(e.to_string()))?;

        Ok(Self {
            vocabulary,
            classes,
            class_log_prior: Array1::from(class_log_prior),
            feature_log_prob,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        Self::from_bundle(ModelBundle::from_json_str(json)?)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ModelError> {
        Self::from_bundle(ModelBundle::from_json_slice(bytes)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let bytes = std::fs::read(path)?;
        Self::from_json_slice(&bytes)
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn class_log_prior(&self) -> ArrayView1<'_, f64> {
        self.class_log_prior.view()
    }

    /// `classes x vocabulary` matrix of `log P(token | class)`.
    pub fn feature_log_prob(&self) -> &Array2<f64> {
        &self.feature_log_prob
    }
}

// Negative infinity is a legitimate unsmoothed zero probability.
fn is_log_probability(value: f64) -> bool {
    !value.is_nan() && value <= 0.0
}
