//! Learner configuration

use crate::LearnError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Search budget and stopping behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnerConfig {
    /// Refinement rounds after the seed round
    pub steps: usize,

    /// Stop as soon as a concept reaches an F1 score of 1.0
    pub terminate_on_goal: bool,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            steps: 3,
            terminate_on_goal: false,
        }
    }
}

impl LearnerConfig {
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_terminate_on_goal(mut self, terminate_on_goal: bool) -> Self {
        self.terminate_on_goal = terminate_on_goal;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, LearnError> {
        serde_json::from_str(json).map_err(|e| LearnError::Config(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LearnError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| LearnError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }
}
