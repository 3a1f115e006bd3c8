use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Everything a new match is configured from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchSettings {
    #[serde(deserialize_with = "Difficulty::deserialize_lenient")]
    pub difficulty: Difficulty,
    pub questions: QuestionSettings,
    pub payouts: PayoutTable,
}

impl MatchSettings {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Default::default()
        }
    }

    pub fn config(&self) -> DifficultyConfig {
        self.difficulty.config()
    }

    /// Points paid up front for activating a Question or Surprise cell.
    pub fn activation_cost(&self) -> u16 {
        self.questions
            .activation_cost_override
            .unwrap_or(self.config().activation_cost)
    }
}

/// Knobs for the special-cell activation step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuestionSettings {
    /// When off, Question cells can still be revealed but never activated.
    pub enabled: bool,
    /// Question difficulties drawn from when a Question cell is activated.
    pub allowed: Vec<QuestionDifficulty>,
    pub activation_cost_override: Option<u16>,
    /// Cap on successful activations per match, both special kinds together.
    pub max_activations: Option<u32>,
}

impl Default for QuestionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed: QuestionDifficulty::ALL.to_vec(),
            activation_cost_override: None,
            max_activations: None,
        }
    }
}

impl QuestionSettings {
    /// Uniform pick among the allowed question difficulties, `Easy` when none are allowed.
    pub fn pick_difficulty<R: Rng + ?Sized>(&self, rng: &mut R) -> QuestionDifficulty {
        if self.allowed.is_empty() {
            return QuestionDifficulty::Easy;
        }
        self.allowed[rng.random_range(0..self.allowed.len())]
    }

    pub fn permits(&self, kind: SpecialKind, activations_so_far: u32) -> bool {
        if kind == SpecialKind::Question && !self.enabled {
            return false;
        }
        self.max_activations
            .is_none_or(|max| activations_so_far < max)
    }
}
