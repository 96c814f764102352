//! Ranking & Scoring System
//!
//! Folds the per-value match scores of a record into one record score.
//! Lower is better: 0 is a perfect match.

use super::query::SearchField;

/// Stand-in for a perfect (zero) value score so it still weighs into the product
const PERFECT_SCORE: f64 = f64::EPSILON;

/// One value of one field that satisfied a clause
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueMatch {
    pub field: SearchField,
    /// Position of the value within the field (tags hold several values)
    pub value_index: usize,
    /// Token score in [0, 1]
    pub score: f64,
    /// Field-length norm of the value
    pub norm: f64,
}

/// Scoring weights for the searchable fields
#[derive(Debug, Clone)]
pub struct ScoringWeights {
    /// Weight applied to each field; uniform across fields
    pub key_weight: f64,
    /// Treat every value as if it had a norm of 1
    pub ignore_field_norm: bool,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::uniform(SearchField::ALL.len(), false)
    }
}

impl ScoringWeights {
    /// Equal weights summing to 1 over `field_count` fields
    pub fn uniform(field_count: usize, ignore_field_norm: bool) -> Self {
        Self {
            key_weight: 1.0 / field_count.max(1) as f64,
            ignore_field_norm,
        }
    }
}

/// Field-length norm: shorter values weigh more
///
/// `1 / sqrt(word count)`, rounded to three decimals.
pub fn field_norm(value: &str) -> f64 {
    let words = value.split_whitespace().count().max(1);
    let norm = 1.0 / (words as f64).sqrt();
    (norm * 1000.0).round() / 1000.0
}

/// Combine value matches into a record score in [0, 1]
///
/// Product of `score ^ (key_weight * norm)` over every match. An empty
/// slice scores 1 (worst); callers only score records that matched.
pub fn compute_score(matches: &[ValueMatch], weights: &ScoringWeights) -> f64 {
    matches.iter().fold(1.0, |total, m| {
        let score = if m.score == 0.0 { PERFECT_SCORE } else { m.score };
        let norm = if weights.ignore_field_norm { 1.0 } else { m.norm };
        total * score.powf(weights.key_weight * norm)
    })
}
