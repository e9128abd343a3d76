use std::collections::HashMap;

use crate::model_manager::ModelError;

/// Fixed mapping from lowercased token to its column in the model.
///
/// Indices always form the dense range `[0, len)`, so every index is a valid
/// column of the feature log-probability matrix and of a `CountVector`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Builds a vocabulary, rejecting indices that are out of range or shared
    /// by two tokens.
    pub fn new(index: HashMap<String, usize>) -> Result<Self, ModelError> {
        if index.is_empty() {
            return Err(ModelError::Incomplete("vocab is empty or missing".into()));
        }

        let size = index.len();
        let mut owners: Vec<Option<&str>> = vec![None; size];
        for (token, &position) in &index {
            if position >= size {
                return Err(ModelError::InvalidVocabulary(format!(
                    "token '{}' has index {} but the vocabulary only has {} entries",
                    token, position, size
                )));
            }
            if let Some(other) = owners[position] {
                return Err(ModelError::InvalidVocabulary(format!(
                    "tokens '{}' and '{}' both map to index {}",
                    other, token, position
                )));
            }
            owners[position] = Some(token);
        }

        Ok(Self { index })
    }

    /// Column of `token`, or `None` when it is out of vocabulary.
    pub fn get(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.index.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Tokens ordered by their column index.
    pub fn tokens(&self) -> Vec<&str> {
        let mut tokens: Vec<(&str, usize)> = self.index.iter()
            .map(|(token, &position)| (token.as_str(), position))
            .collect();
        tokens.sort_unstable_by_key(|&(_, position)| position);
        tokens.into_iter().map(|(token, _)| token).collect()
    }
}
