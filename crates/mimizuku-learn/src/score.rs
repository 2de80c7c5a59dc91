//! F1 scoring and candidate comparison

use crate::LearnError;
use mimizuku_core::{Concept, Individual};
use std::collections::BTreeSet;

/// Score of a concept that separates the examples perfectly
pub const GOAL_SCORE: f64 = 1.0;

/// F1 score of `concept` on the labeled examples, rounded to 3 decimals
/// with ties to even.
///
/// Fails with [`LearnError::UndefinedScore`] when there are no true
/// positives, false positives or false negatives, which can only happen
/// with an empty positive set.
pub fn f1(concept: &Concept, pos: &BTreeSet<Individual>, neg: &BTreeSet<Individual>) -> Result<f64, LearnError> {
    let instances = concept.instances();
    let tp = instances.intersection(pos).count();
    let fp = instances.intersection(neg).count();
    let fn_ = pos.difference(instances).count();

    // tp / (tp + 0.5 (fp + fn)) == 2tp / (2tp + fp + fn)
    let denominator = 2 * tp + fp + fn_;
    if denominator == 0 {
        return Err(LearnError::UndefinedScore);
    }

    Ok(round_score(2 * tp, denominator))
}

/// `numerator / denominator` to 3 decimals, exact halves rounded to even
fn round_score(numerator: usize, denominator: usize) -> f64 {
    let scaled = numerator * 1000;
    let mut thousandths = scaled / denominator;
    let twice_remainder = 2 * (scaled % denominator);
    if twice_remainder > denominator || (twice_remainder == denominator && thousandths % 2 == 1) {
        thousandths += 1;
    }
    thousandths as f64 / 1000.0
}

/// A concept with its F1 score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredConcept {
    pub concept: Concept,
    pub score: f64,
}

impl ScoredConcept {
    pub fn new(concept: Concept, score: f64) -> Self {
        Self { concept, score }
    }

    /// Higher score wins; on equal scores the shorter concept wins, and on
    /// equal length as well `self` (the challenger) wins.
    pub fn is_better_than(&self, incumbent: &ScoredConcept) -> bool {
        self.score > incumbent.score
            || (self.score == incumbent.score && self.concept.length() <= incumbent.concept.length())
    }
}

/// Highest score, then shortest concept, then first in iteration order
pub fn select_best(candidates: impl IntoIterator<Item = ScoredConcept>) -> Option<ScoredConcept> {
    candidates.into_iter().fold(None, |best, candidate| match best {
        None => Some(candidate),
        Some(best) => {
            let wins = candidate.score > best.score
                || (candidate.score == best.score && candidate.concept.length() < best.concept.length());
            Some(if wins { candidate } else { best })
        }
    })
}
