use lazy_static::lazy_static;
use ndarray::Array1;
use regex::Regex;

use super::model::NaiveBayesModel;
use super::vocabulary::Vocabulary;

lazy_static! {
    // ASCII-only on purpose: letters outside A-Z/a-z act as delimiters.
    static ref NON_WORD: Regex = Regex::new(r"[^A-Za-z0-9_]+")
        .expect("Non-word delimiter pattern should be valid");
}

/// Lowercases `text` and splits it on runs of non-word characters.
///
/// Empty pieces produced by leading or trailing delimiters are dropped.
pub fn split_tokens(text: &str) -> Vec<String> {
    let lowered = text.to_ascii_lowercase();
    NON_WORD.split(&lowered)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Bag-of-words counts aligned to a vocabulary's column space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountVector {
    counts: Array1<usize>,
}

impl CountVector {
    pub fn zeros(len: usize) -> Self {
        Self { counts: Array1::zeros(len) }
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<usize> {
        self.counts.get(index).copied()
    }

    /// Total number of in-vocabulary tokens that were counted.
    pub fn total(&self) -> usize {
        self.counts.sum()
    }

    /// `(column, count)` pairs for every column with a non-zero count, in column order.
    pub fn nonzero(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.counts.iter()
            .copied()
            .enumerate()
            .filter(|&(_, count)| count > 0)
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.counts.to_vec()
    }

    fn increment(&mut self, index: usize) {
        self.counts[index] += 1;
    }
}

/// Turns free text into count vectors over a fixed vocabulary.
///
/// Anything that can hand out a [`Vocabulary`] gets tokenization for free:
/// 1. ASCII-lowercase the input
/// 2. Split on runs of `[^A-Za-z0-9_]`
/// 3. Count every token that is in the vocabulary; ignore the rest
pub trait TextVectorizer {
    fn vocabulary(&self) -> &Vocabulary;

    /// Counts tokens in `text` that the vocabulary knows about.
    fn count_known_tokens(&self, text: &str) -> usize {
        let vocabulary = self.vocabulary();
        split_tokens(text).iter()
            .filter(|token| vocabulary.contains(token))
            .count()
    }

    /// Builds the count vector for `text`. Out-of-vocabulary tokens are ignored.
    fn tokenize(&self, text: &str) -> CountVector {
        let vocabulary = self.vocabulary();
        let mut vector = CountVector::zeros(vocabulary.len());
        for token in split_tokens(text) {
            if let Some(index) = vocabulary.get(&token) {
                vector.increment(index);
            }
        }
        vector
    }
}

impl TextVectorizer for Vocabulary {
    fn vocabulary(&self) -> &Vocabulary {
        self
    }
}

impl TextVectorizer for NaiveBayesModel {
    fn vocabulary(&self) -> &Vocabulary {
        NaiveBayesModel::vocabulary(self)
    }
}
