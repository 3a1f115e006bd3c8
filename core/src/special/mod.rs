use serde::{Deserialize, Serialize};

use crate::*;
pub use surprise::*;
pub use trivia::*;

mod surprise;
mod trivia;

/// Score and lives change produced by activating a special cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SpecialOutcome {
    Question {
        correct: bool,
        points_right: i32,
        points_wrong: i32,
        life_delta: i32,
    },
    Surprise {
        points_delta: i32,
        life_delta: i32,
    },
}

/// Context handed to an [`OutcomeProvider`] when a player confirms an activation.
#[derive(Copy, Clone, Debug)]
pub struct ActivationRequest<'a> {
    pub player: Player,
    pub cell: Cell,
    pub kind: SpecialKind,
    pub difficulty: Difficulty,
    pub cost: u16,
    pub settings: &'a MatchSettings,
}

impl ActivationRequest<'_> {
    pub fn config(&self) -> DifficultyConfig {
        self.difficulty.config()
    }
}

/// External resolution of a special cell: a trivia question or a surprise roll.
///
/// Returning `None` declines the activation; the cell stays re-offerable and nothing is paid.
pub trait OutcomeProvider {
    fn resolve(&mut self, request: &ActivationRequest) -> Option<SpecialOutcome>;
}

impl<F> OutcomeProvider for F
where
    F: FnMut(&ActivationRequest) -> Option<SpecialOutcome>,
{
    fn resolve(&mut self, request: &ActivationRequest) -> Option<SpecialOutcome> {
        self(request)
    }
}
