use duosweeper_core::*;
use serde::{Deserialize, Serialize};

/// What a player may see of one cell: kinds stay masked until revealed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CellView {
    Hidden,
    Flagged,
    Revealed { kind: CellKind, special_used: bool },
}

impl From<&Cell> for CellView {
    fn from(cell: &Cell) -> Self {
        if cell.is_revealed() {
            Self::Revealed {
                kind: cell.kind(),
                special_used: cell.is_special_used(),
            }
        } else if cell.is_flagged() {
            Self::Flagged
        } else {
            Self::Hidden
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    pub rows: Coord,
    pub cols: Coord,
    pub mines: CellCount,
    /// Row-major.
    pub cells: Vec<CellView>,
}

impl BoardView {
    pub fn cell(&self, (row, col): Coord2) -> Option<&CellView> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells
            .get(usize::from(row) * usize::from(self.cols) + usize::from(col))
    }
}

impl From<&Board> for BoardView {
    fn from(board: &Board) -> Self {
        Self {
            rows: board.rows(),
            cols: board.cols(),
            mines: board.mine_count(),
            cells: board.iter_cells().map(CellView::from).collect(),
        }
    }
}

/// Everything needed to redraw a match from scratch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSnapshot {
    pub difficulty: Difficulty,
    pub current_player: Player,
    pub score: i32,
    pub lives: u8,
    pub max_lives: u8,
    pub activation_cost: u16,
    pub boards: [BoardView; 2],
    pub revealed_by: [CellCount; 2],
    pub summary: Option<MatchSummary>,
}

impl MatchSnapshot {
    pub fn capture<R>(game: &MatchController<R>) -> Self {
        Self {
            difficulty: game.difficulty(),
            current_player: game.current_player(),
            score: game.ledger().score(),
            lives: game.ledger().lives(),
            max_lives: game.ledger().max_lives(),
            activation_cost: game.settings().activation_cost(),
            boards: Player::BOTH.map(|player| BoardView::from(game.board(player))),
            revealed_by: Player::BOTH.map(|player| game.revealed_by(player)),
            summary: game.summary().copied(),
        }
    }
}
