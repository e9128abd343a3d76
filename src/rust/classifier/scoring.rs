use ndarray::{Array1, ArrayView1};

use super::model::NaiveBayesModel;
use super::tokenizer::CountVector;

/// Joint log-likelihood of every class:
/// `score[c] = class_log_prior[c] + sum_i counts[i] * feature_log_prob[c][i]`.
///
/// Columns with a zero count are skipped rather than multiplied, so a
/// `-inf` parameter only matters for tokens that actually occur.
pub(crate) fn joint_log_likelihood(model: &NaiveBayesModel, counts: &CountVector) -> Array1<f64> {
    let mut scores = model.class_log_prior().to_owned();
    let feature_log_prob = model.feature_log_prob();
    for (column, count) in counts.nonzero() {
        scores.scaled_add(count as f64, &feature_log_prob.column(column));
    }
    scores
}

/// Index of the highest score. Ties go to the lowest index.
pub(crate) fn first_argmax(scores: ArrayView1<'_, f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, &score) in scores.iter().enumerate() {
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((index, score));
        }
    }
    best.map(|(index, _)| index)
}
