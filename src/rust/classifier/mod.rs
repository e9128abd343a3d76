mod error;
mod scoring;
mod classifier;
pub mod builder;
pub mod model;
pub mod tokenizer;
pub mod vocabulary;

pub use error::ClassifierError;
pub use classifier::Classifier;
pub(crate) use classifier::validate_text;
pub use builder::ClassifierBuilder;
pub use model::{ModelBundle, NaiveBayesModel};
pub use tokenizer::{split_tokens, CountVector, TextVectorizer};
pub use vocabulary::Vocabulary;

/// Information about the model a classifier was built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierInfo {
    /// Where the model bundle came from, e.g. `builtin:socialmedia`
    pub model_source: String,
    /// Number of classes the model can predict
    pub num_classes: usize,
    /// Class labels in model order
    pub class_labels: Vec<String>,
    /// Number of tokens in the vocabulary
    pub vocabulary_size: usize,
}
