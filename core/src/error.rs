use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Cell out of board: {row},{col}")]
    OutOfBounds { row: usize, col: usize },
    #[error("Layout places two kinds on the same cell or outside the board")]
    InvalidLayout,
    #[error("Too many mines and special cells for a {rows}x{cols} board")]
    TooManyCells { rows: u8, cols: u8 },
}

pub type Result<T> = core::result::Result<T, GameError>;
