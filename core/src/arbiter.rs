use serde::{Deserialize, Serialize};

use crate::*;

/// Kind of action a player attempts on a cell of their own board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Reveal,
    ToggleFlag,
    Activate,
}

/// What an admitted action actually did, as far as turn-taking cares.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActionEffect {
    /// Reveal that uncovered at least one cell (including a special's first click).
    Revealed,
    /// Reveal that uncovered nothing.
    NothingRevealed,
    FlagPlaced,
    FlagRemoved,
    /// Second interaction with a special cell, confirmed or declined.
    Activation,
}

/// Decides whose move is legal and which moves hand the turn over.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnArbiter {
    current: Player,
}

impl TurnArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_player(&self) -> Player {
        self.current
    }

    /// Rule violations are reported as `false` and never as errors; callers drop the action.
    pub fn is_legal(&self, player: Player, action: Action, cell: &Cell, game_over: bool) -> bool {
        if game_over || player != self.current {
            return false;
        }

        match action {
            Action::Reveal => {
                !cell.is_flagged() && (!cell.is_revealed() || cell.is_activatable())
            }
            Action::ToggleFlag => !cell.is_revealed(),
            Action::Activate => cell.is_activatable(),
        }
    }

    pub const fn consumes_turn(effect: ActionEffect) -> bool {
        use ActionEffect::*;
        match effect {
            Revealed => true,
            FlagPlaced => true,
            NothingRevealed => false,
            FlagRemoved => false,
            Activation => false,
        }
    }

    /// Flips the active player when `effect` consumes the turn; returns the new player if so.
    pub fn settle(&mut self, effect: ActionEffect) -> Option<Player> {
        if !Self::consumes_turn(effect) {
            return None;
        }
        self.current = self.current.other();
        log::debug!("Turn passes to {:?}", self.current);
        Some(self.current)
    }
}
