//! Learning problems and classification of unlabeled individuals

use crate::search::ConceptLearner;
use crate::LearnError;
use mimizuku_core::{Individual, KnowledgeBase, OwlIri};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::info;

/// Named set of positive and negative example IRIs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningProblem {
    pub name: String,
    pub positives: Vec<String>,
    pub negatives: Vec<String>,
}

impl LearningProblem {
    pub fn new(name: impl Into<String>, positives: Vec<String>, negatives: Vec<String>) -> Self {
        Self {
            name: name.into(),
            positives,
            negatives,
        }
    }

    /// Parse a JSON array of learning problems
    pub fn load_all(json: &str) -> Result<Vec<Self>, LearnError> {
        serde_json::from_str(json).map_err(|e| LearnError::InvalidProblem(e.to_string()))
    }

    pub fn load_all_from_file(path: impl AsRef<Path>) -> Result<Vec<Self>, LearnError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| LearnError::InvalidProblem(format!("{}: {}", path.display(), e)))?;
        Self::load_all(&json)
    }

    /// Map the example IRIs to individuals of the knowledge base
    pub fn resolve<K: KnowledgeBase + ?Sized>(&self, kb: &K) -> Result<(BTreeSet<Individual>, BTreeSet<Individual>), LearnError> {
        let thing = kb.thing();
        let known = thing.instances();
        let lookup = |iris: &[String]| -> Result<BTreeSet<Individual>, LearnError> {
            iris.iter()
                .map(|iri| {
                    let individual = Individual(OwlIri::new(iri.clone()));
                    if known.contains(&individual) {
                        Ok(individual)
                    } else {
                        Err(LearnError::UnknownIndividual(individual.0))
                    }
                })
                .collect()
        };

        let pos = lookup(&self.positives)?;
        let neg = lookup(&self.negatives)?;
        if let Some(both) = pos.intersection(&neg).next() {
            return Err(LearnError::InvalidProblem(format!(
                "{} is both a positive and a negative example of {}",
                both, self.name
            )));
        }

        Ok((pos, neg))
    }
}

/// Learned concept and the classification of every unlabeled individual
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub problem: String,
    /// Learned concept in DL syntax
    pub solution: String,
    pub solution_length: usize,
    pub train_score: f64,
    pub positives: Vec<Individual>,
    pub negatives: Vec<Individual>,
}

impl<'kb, K: KnowledgeBase + ?Sized> ConceptLearner<'kb, K> {
    /// Learn on the problem's examples, then classify the remaining
    /// individuals by membership in the learned concept
    pub fn fit_and_predict(&self, problem: &LearningProblem) -> Result<Prediction, LearnError> {
        info!("Running learning problem {}", problem.name);
        let kb = self.knowledge_base();
        let (pos, neg) = problem.resolve(kb)?;

        let solution = self.run_algorithm(&pos, &neg)?;
        info!("Found solution {} - train score {}", solution.concept, solution.score);

        let thing = kb.thing();
        let (positives, negatives): (Vec<Individual>, Vec<Individual>) = thing
            .instances()
            .iter()
            .filter(|individual| !pos.contains(*individual) && !neg.contains(*individual))
            .cloned()
            .partition(|individual| solution.concept.instances().contains(individual));
        info!("Classified - positives: {}, negatives: {}", positives.len(), negatives.len());

        Ok(Prediction {
            problem: problem.name.clone(),
            solution: solution.concept.to_string(),
            solution_length: solution.concept.length(),
            train_score: solution.score,
            positives,
            negatives,
        })
    }
}
