use std::collections::{HashSet, VecDeque};

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// One player's grid: cell kinds fixed at generation, reveal/flag state mutated by play.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: CellCount,
    question_count: CellCount,
    surprise_count: CellCount,
    revealed_safe: CellCount,
}

impl Board {
    /// All-`Empty` grid, the starting point of every generation.
    pub(crate) fn blank((rows, cols): Coord2) -> Self {
        let cells = Array2::from_shape_fn((usize::from(rows), usize::from(cols)), |(row, col)| {
            Cell::new((row as Coord, col as Coord), CellKind::Empty)
        });
        Self {
            cells,
            mine_count: 0,
            question_count: 0,
            surprise_count: 0,
            revealed_safe: 0,
        }
    }

    /// Builds a board from explicit coordinates, following the same ordering as random
    /// generation: mines, then adjacency numbers, then specials on still-empty cells.
    pub fn from_layout(
        size: Coord2,
        mines: &[Coord2],
        questions: &[Coord2],
        surprises: &[Coord2],
    ) -> Result<Self> {
        let mut board = Self::blank(size);

        for &coords in mines {
            board.place(coords, CellKind::Mine)?;
        }
        board.compute_numbers();
        for &coords in questions {
            board.place(coords, CellKind::Question)?;
        }
        for &coords in surprises {
            board.place(coords, CellKind::Surprise)?;
        }

        Ok(board)
    }

    /// Puts `kind` on a cell that is still `Empty`.
    pub(crate) fn place(&mut self, coords: Coord2, kind: CellKind) -> Result<()> {
        let cell = self
            .cell_mut(coords)
            .map_err(|_| GameError::InvalidLayout)?;
        if cell.kind() != CellKind::Empty {
            return Err(GameError::InvalidLayout);
        }
        cell.set_kind(kind);

        match kind {
            CellKind::Mine => self.mine_count += 1,
            CellKind::Question => self.question_count += 1,
            CellKind::Surprise => self.surprise_count += 1,
            CellKind::Empty | CellKind::Number(_) => {}
        }
        Ok(())
    }

    /// Promotes every non-mine cell touching at least one mine to `Number`.
    pub(crate) fn compute_numbers(&mut self) {
        let (rows, cols) = self.size();
        for row in 0..rows {
            for col in 0..cols {
                let coords = (row, col);
                if self.cells[nd_index(coords)].kind().is_mine() {
                    continue;
                }
                let count = self.adjacent_mine_count(coords);
                if count > 0 {
                    self.cells[nd_index(coords)].set_kind(CellKind::Number(count));
                }
            }
        }
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn rows(&self) -> Coord {
        self.size().0
    }

    pub fn cols(&self) -> Coord {
        self.size().1
    }

    pub fn total_cells(&self) -> CellCount {
        area(self.rows(), self.cols())
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn question_count(&self) -> CellCount {
        self.question_count
    }

    pub fn surprise_count(&self) -> CellCount {
        self.surprise_count
    }

    pub fn count_kind(&self, predicate: impl Fn(CellKind) -> bool) -> CellCount {
        self.cells
            .iter()
            .filter(|cell| predicate(cell.kind()))
            .count() as CellCount
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (rows, cols) = self.size();
        if coords.0 < rows && coords.1 < cols {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds {
                row: coords.0.into(),
                col: coords.1.into(),
            })
        }
    }

    /// Index-based accessor for callers holding unchecked integers.
    pub fn get_cell(&self, row: usize, col: usize) -> Result<&Cell> {
        self.cells
            .get((row, col))
            .ok_or(GameError::OutOfBounds { row, col })
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<&Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(&self.cells[nd_index(coords)])
    }

    pub(crate) fn cell_mut(&mut self, coords: Coord2) -> Result<&mut Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(&mut self.cells[nd_index(coords)])
    }

    pub fn iter_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        neighbors(coords, self.size())
            .filter(|&pos| self.cells[nd_index(pos)].kind().is_mine())
            .count() as u8
    }

    /// Reveals `coords`, cascading through connected `Empty` cells. Returns every cell that
    /// transitioned to revealed, in breadth-first visiting order.
    pub fn reveal(&mut self, coords: Coord2) -> Result<Vec<Cell>> {
        let coords = self.validate_coords(coords)?;
        let start = self.cells[nd_index(coords)];
        if start.is_revealed() || start.is_flagged() {
            return Ok(Vec::new());
        }

        if start.kind() != CellKind::Empty {
            self.reveal_single(coords);
            log::debug!("Revealed {:?} at {:?}", start.kind(), coords);
            return Ok(vec![self.cells[nd_index(coords)]]);
        }

        let mut revealed = Vec::new();
        let mut visited = HashSet::from([coords]);
        let mut to_visit = VecDeque::from([coords]);

        while let Some(visit_coords) = to_visit.pop_front() {
            if !self.reveal_single(visit_coords) {
                log::trace!("Skipping cell at {:?}", visit_coords);
                continue;
            }
            let cell = self.cells[nd_index(visit_coords)];
            revealed.push(cell);
            log::trace!("Flood revealed {:?} at {:?}", cell.kind(), visit_coords);

            // only empty cells propagate, everything else is boundary
            if cell.kind() == CellKind::Empty {
                let next: Vec<_> = neighbors(visit_coords, self.size())
                    .filter(|&pos| {
                        let neighbor = &self.cells[nd_index(pos)];
                        !neighbor.is_revealed() && !neighbor.is_flagged()
                    })
                    .filter(|&pos| visited.insert(pos))
                    .collect();
                to_visit.extend(next);
            }
        }

        log::debug!("Cascade from {:?} revealed {} cells", coords, revealed.len());
        Ok(revealed)
    }

    fn reveal_single(&mut self, coords: Coord2) -> bool {
        let cell = &mut self.cells[nd_index(coords)];
        let changed = cell.reveal();
        if changed && !cell.kind().is_mine() {
            self.revealed_safe += 1;
        }
        changed
    }

    /// Every non-mine cell is revealed. Flags and hidden mines do not matter.
    pub fn is_cleared(&self) -> bool {
        self.revealed_safe == self.safe_cell_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(size: Coord2, mines: &[Coord2]) -> Board {
        Board::from_layout(size, mines, &[], &[]).unwrap()
    }

    #[test]
    fn numbers_count_adjacent_mines() {
        let board = layout((3, 3), &[(0, 0), (2, 2)]);

        assert_eq!(board.cell_at((1, 1)).unwrap().kind(), CellKind::Number(2));
        assert_eq!(board.cell_at((0, 1)).unwrap().kind(), CellKind::Number(1));
        assert_eq!(board.cell_at((0, 2)).unwrap().kind(), CellKind::Empty);
        assert_eq!(board.cell_at((2, 0)).unwrap().kind(), CellKind::Empty);
    }

    #[test]
    fn out_of_range_access_is_an_error() {
        let board = layout((2, 3), &[]);

        assert_eq!(
            board.get_cell(2, 0).unwrap_err(),
            GameError::OutOfBounds { row: 2, col: 0 }
        );
        assert!(board.cell_at((0, 3)).is_err());
        assert!(board.get_cell(1, 2).is_ok());
    }

    #[test]
    fn specials_cannot_land_on_numbers_or_mines() {
        assert_eq!(
            Board::from_layout((3, 3), &[(0, 0)], &[(0, 1)], &[]),
            Err(GameError::InvalidLayout)
        );
        assert_eq!(
            Board::from_layout((3, 3), &[(0, 0)], &[], &[(0, 0)]),
            Err(GameError::InvalidLayout)
        );
        assert_eq!(
            Board::from_layout((3, 3), &[(0, 0)], &[(2, 2)], &[(2, 2)]),
            Err(GameError::InvalidLayout)
        );
    }

    #[test]
    fn cascade_stops_at_number_boundary() {
        // mine in the top-right corner of a 3x4 board
        let mut board = layout((3, 4), &[(0, 3)]);

        let revealed = board.reveal((2, 0)).unwrap();

        assert_eq!(revealed.len(), 11);
        assert_eq!(revealed[0].coords(), (2, 0));
        assert!(revealed.iter().all(|cell| !cell.kind().is_mine()));
        assert!(!board.cell_at((0, 3)).unwrap().is_revealed());
        assert!(board.is_cleared());
    }

    #[test]
    fn cascade_reveals_specials_without_propagating() {
        // column 2 is a wall of mines; the surprise sits in the empty pocket
        let mut board = Board::from_layout(
            (3, 5),
            &[(0, 2), (1, 2), (2, 2)],
            &[],
            &[(1, 0)],
        )
        .unwrap();

        let revealed = board.reveal((0, 0)).unwrap();
        let coords: Vec<_> = revealed.iter().map(Cell::coords).collect();

        assert_eq!(coords, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
        assert_eq!(revealed[2].kind(), CellKind::Surprise);
        assert!(!board.cell_at((2, 0)).unwrap().is_revealed());
    }

    #[test]
    fn cascade_skips_flagged_cells() {
        let mut board = layout((1, 4), &[]);
        board.cell_mut((0, 2)).unwrap().toggle_flag();

        let revealed = board.reveal((0, 0)).unwrap();

        assert_eq!(revealed.len(), 2);
        assert!(!board.cell_at((0, 3)).unwrap().is_revealed());
        assert!(!board.is_cleared());
    }

    #[test]
    fn second_reveal_of_region_is_empty() {
        let mut board = layout((3, 3), &[(2, 2)]);

        assert!(!board.reveal((0, 0)).unwrap().is_empty());
        assert!(board.reveal((0, 0)).unwrap().is_empty());
        assert!(board.reveal((0, 1)).unwrap().is_empty());
    }

    #[test]
    fn non_empty_target_reveals_single_cell() {
        let mut board = layout((3, 3), &[(0, 0)]);

        let revealed = board.reveal((1, 1)).unwrap();

        assert_eq!(revealed.len(), 1);
        assert_eq!(revealed[0].kind(), CellKind::Number(1));
    }

    #[test]
    fn cleared_ignores_hidden_mines_and_flags() {
        let mut board = layout((1, 3), &[(0, 0)]);
        board.cell_mut((0, 0)).unwrap().toggle_flag();
        assert!(!board.is_cleared());

        board.reveal((0, 1)).unwrap();
        board.reveal((0, 2)).unwrap();

        assert!(board.is_cleared());
    }

    #[test]
    fn revealed_mine_does_not_count_toward_clearing() {
        let mut board = layout((1, 2), &[(0, 0)]);

        board.reveal((0, 0)).unwrap();
        assert!(!board.is_cleared());

        board.reveal((0, 1)).unwrap();
        assert!(board.is_cleared());
    }
}
