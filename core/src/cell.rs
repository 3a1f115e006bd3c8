use serde::{Deserialize, Serialize};

use crate::*;

/// What a cell holds, fixed once the board is generated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "adjacentMines", rename_all = "camelCase")]
pub enum CellKind {
    Empty,
    Number(u8),
    Mine,
    Question,
    Surprise,
}

impl CellKind {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    /// Question and Surprise cells take a second, activating interaction.
    pub const fn is_special(self) -> bool {
        matches!(self, Self::Question | Self::Surprise)
    }

    pub const fn special(self) -> Option<SpecialKind> {
        match self {
            Self::Question => Some(SpecialKind::Question),
            Self::Surprise => Some(SpecialKind::Surprise),
            _ => None,
        }
    }
}

impl Default for CellKind {
    fn default() -> Self {
        Self::Empty
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpecialKind {
    Question,
    Surprise,
}

/// One grid position and its player-driven state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    row: Coord,
    col: Coord,
    kind: CellKind,
    revealed: bool,
    flagged: bool,
    special_used: bool,
    flag_scored: bool,
    reveal_scored: bool,
}

impl Cell {
    pub const fn new((row, col): Coord2, kind: CellKind) -> Self {
        Self {
            row,
            col,
            kind,
            revealed: false,
            flagged: false,
            special_used: false,
            flag_scored: false,
            reveal_scored: false,
        }
    }

    pub const fn row(&self) -> Coord {
        self.row
    }

    pub const fn col(&self) -> Coord {
        self.col
    }

    pub const fn coords(&self) -> Coord2 {
        (self.row, self.col)
    }

    pub const fn kind(&self) -> CellKind {
        self.kind
    }

    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub const fn is_flagged(&self) -> bool {
        self.flagged
    }

    pub const fn is_special_used(&self) -> bool {
        self.special_used
    }

    pub const fn is_flag_scored(&self) -> bool {
        self.flag_scored
    }

    pub const fn is_reveal_scored(&self) -> bool {
        self.reveal_scored
    }

    /// Revealed special cell that still offers its activation.
    pub const fn is_activatable(&self) -> bool {
        self.kind.is_special() && self.revealed && !self.special_used
    }

    pub(crate) fn set_kind(&mut self, kind: CellKind) {
        self.kind = kind;
    }

    /// Returns whether the cell transitioned to revealed. Flagged cells stay hidden.
    pub(crate) fn reveal(&mut self) -> bool {
        if self.revealed || self.flagged {
            return false;
        }
        self.revealed = true;
        true
    }

    /// Returns the new flag state, or `None` when the cell is already revealed.
    pub(crate) fn toggle_flag(&mut self) -> Option<bool> {
        if self.revealed {
            return None;
        }
        self.flagged = !self.flagged;
        Some(self.flagged)
    }

    pub(crate) fn mark_special_used(&mut self) {
        if self.kind.is_special() {
            self.special_used = true;
        }
    }

    pub(crate) fn mark_flag_scored(&mut self) {
        self.flag_scored = true;
    }

    pub(crate) fn mark_reveal_scored(&mut self) {
        if self.revealed {
            self.reveal_scored = true;
        }
    }
}
