//! Mimizuku concept learning
//!
//! Supervised learning of EL class expressions:
//! - Refinement operator over ⊤, atomic, ∃R.C and C ⊓ D concepts
//! - F1 scoring with a length tie-break
//! - Greedy level-wise search under a fixed step budget
//! - Learning problems and classification of the remaining individuals

pub mod refinement;
pub mod score;
pub mod config;
pub mod search;
pub mod problem;

pub use refinement::ElRefinementOperator;
pub use score::{f1, select_best, ScoredConcept, GOAL_SCORE};
pub use config::LearnerConfig;
pub use search::{ConceptLearner, SearchOutcome};
pub use problem::{LearningProblem, Prediction};

use mimizuku_core::{KnowledgeBaseError, OwlIri};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LearnError {
    #[error("Unsupported concept kind for refinement: {0}")]
    UnsupportedConceptKind(String),

    #[error("F1 score is undefined: no positive examples and nothing covered")]
    UndefinedScore,

    #[error("Unknown individual: {0}")]
    UnknownIndividual(OwlIri),

    #[error("Invalid learning problem: {0}")]
    InvalidProblem(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Knowledge base error: {0}")]
    KnowledgeBase(#[from] KnowledgeBaseError),
}
