//! Greedy level-wise concept search

use crate::config::LearnerConfig;
use crate::refinement::ElRefinementOperator;
use crate::score::{f1, select_best, ScoredConcept, GOAL_SCORE};
use crate::LearnError;
use mimizuku_core::{Concept, Individual, KnowledgeBase};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Result of one search run
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best: ScoredConcept,
    /// Refinement rounds completed after the seed round
    pub rounds: usize,
    /// Number of concepts scored, ⊤ included
    pub evaluated: usize,
    /// Whether the search stopped early on a perfect score
    pub reached_goal: bool,
}

/// Hill-climbing learner: every concept of the frontier is replaced by its
/// single best refinement each round, so the frontier never grows beyond the
/// concepts kept from the seed round.
pub struct ConceptLearner<'kb, K: ?Sized> {
    kb: &'kb K,
    operator: ElRefinementOperator<'kb, K>,
    config: LearnerConfig,
}

impl<'kb, K: KnowledgeBase + ?Sized> ConceptLearner<'kb, K> {
    pub fn new(kb: &'kb K, config: LearnerConfig) -> Self {
        Self {
            kb,
            operator: ElRefinementOperator::new(kb),
            config,
        }
    }

    pub fn config(&self) -> &LearnerConfig {
        &self.config
    }

    pub fn knowledge_base(&self) -> &'kb K {
        self.kb
    }

    pub fn refine(&self, concept: &Concept) -> Result<BTreeSet<Concept>, LearnError> {
        self.operator.refine(concept)
    }

    /// Best concept and its F1 score on the examples
    pub fn run_algorithm(&self, pos: &BTreeSet<Individual>, neg: &BTreeSet<Individual>) -> Result<ScoredConcept, LearnError> {
        Ok(self.search(pos, neg)?.best)
    }

    pub fn search(&self, pos: &BTreeSet<Individual>, neg: &BTreeSet<Individual>) -> Result<SearchOutcome, LearnError> {
        if pos.is_empty() {
            return Err(LearnError::UndefinedScore);
        }

        let terminate_on_goal = self.config.terminate_on_goal;
        let thing = self.kb.thing();
        let mut current_best = ScoredConcept::new(thing.clone(), f1(&thing, pos, neg)?);
        let mut evaluated = 1;

        // Seed round: every refinement of ⊤ with a positive score survives
        let mut frontier = BTreeSet::new();
        for concept in self.operator.refine_thing()? {
            let score = f1(&concept, pos, neg)?;
            let candidate = ScoredConcept::new(concept, score);
            evaluated += 1;

            if candidate.score > 0.0 {
                frontier.insert(candidate.concept.clone());
            }
            if terminate_on_goal && candidate.score == GOAL_SCORE {
                return Ok(self.finish(candidate, 0, evaluated, true));
            }
            if candidate.is_better_than(&current_best) {
                current_best = candidate;
            }
        }
        debug!(
            "Seed round: {} concepts kept, best {} ({})",
            frontier.len(),
            current_best.concept,
            current_best.score
        );

        let mut rounds = 0;
        for round in 1..=self.config.steps {
            if frontier.is_empty() {
                debug!("Frontier exhausted before round {}", round);
                break;
            }

            let mut next = BTreeSet::new();
            for concept in &frontier {
                let scored = self
                    .operator
                    .refine(concept)?
                    .into_iter()
                    .map(|refined| f1(&refined, pos, neg).map(|score| ScoredConcept::new(refined, score)))
                    .collect::<Result<Vec<_>, _>>()?;
                evaluated += scored.len();

                let best = match select_best(scored) {
                    Some(best) => best,
                    None => continue,
                };
                if terminate_on_goal && best.score == GOAL_SCORE {
                    return Ok(self.finish(best, round, evaluated, true));
                }
                if best.score > 0.0 {
                    next.insert(best.concept.clone());
                }
                if best.is_better_than(&current_best) {
                    current_best = best;
                }
            }

            frontier = next;
            rounds = round;
            debug!(
                "Round {}: {} concepts kept, best {} ({})",
                round,
                frontier.len(),
                current_best.concept,
                current_best.score
            );
        }

        Ok(self.finish(current_best, rounds, evaluated, false))
    }

    fn finish(&self, best: ScoredConcept, rounds: usize, evaluated: usize, reached_goal: bool) -> SearchOutcome {
        info!(
            "Search finished after {} rounds ({} concepts scored): {} with F1 {}",
            rounds, evaluated, best.concept, best.score
        );
        SearchOutcome {
            best,
            rounds,
            evaluated,
            reached_goal,
        }
    }
}
