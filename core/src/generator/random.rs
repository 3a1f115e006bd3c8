use rand::Rng;

use super::*;

/// Rejection-sampling generator: mines first, then adjacency numbers, then question and
/// surprise cells, each only onto cells that are still `Empty`.
///
/// The random source is borrowed so the same seeded generator reproduces the same board.
#[derive(Debug)]
pub struct RandomBoardGenerator<'a, R: Rng + ?Sized> {
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> RandomBoardGenerator<'a, R> {
    pub fn new(rng: &'a mut R) -> Self {
        Self { rng }
    }

    fn place_random(&mut self, board: &mut Board, kind: CellKind, requested: CellCount) {
        let (rows, cols) = board.size();

        // number cells can eat every empty slot on a crowded board
        let available = board.count_kind(|kind| kind == CellKind::Empty);
        let count = if requested > available {
            log::warn!(
                "Only {} empty cells left for {} {:?} cells, placing fewer",
                available,
                requested,
                kind
            );
            available
        } else {
            requested
        };

        let mut placed = 0;
        while placed < count {
            let coords = (self.rng.random_range(0..rows), self.rng.random_range(0..cols));
            if board.place(coords, kind).is_ok() {
                placed += 1;
            }
        }
    }
}

impl<R: Rng + ?Sized> BoardGenerator for RandomBoardGenerator<'_, R> {
    fn generate(mut self, config: &DifficultyConfig) -> Result<Board> {
        config.validate()?;

        let mut board = Board::blank(config.size());
        self.place_random(&mut board, CellKind::Mine, config.mines);
        board.compute_numbers();
        self.place_random(&mut board, CellKind::Question, config.question_cells);
        self.place_random(&mut board, CellKind::Surprise, config.surprise_cells);

        log::debug!(
            "Generated {}x{} board: {} mines, {} questions, {} surprises",
            config.rows,
            config.cols,
            board.mine_count(),
            board.question_count(),
            board.surprise_count()
        );
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn generate(difficulty: Difficulty, seed: u64) -> Board {
        let mut rng = SmallRng::seed_from_u64(seed);
        RandomBoardGenerator::new(&mut rng)
            .generate(&difficulty.config())
            .unwrap()
    }

    #[test]
    fn places_exact_counts_for_every_preset() {
        for difficulty in Difficulty::ALL {
            let config = difficulty.config();
            for seed in 0..20 {
                let board = generate(difficulty, seed);

                assert_eq!(board.size(), config.size());
                assert_eq!(board.count_kind(CellKind::is_mine), config.mines);
                assert_eq!(
                    board.count_kind(|kind| kind == CellKind::Question),
                    config.question_cells
                );
                assert_eq!(
                    board.count_kind(|kind| kind == CellKind::Surprise),
                    config.surprise_cells
                );
            }
        }
    }

    #[test]
    fn adjacency_matches_true_neighbor_mines() {
        let board = generate(Difficulty::Medium, 7);
        let (rows, cols) = board.size();

        for row in 0..rows as i16 {
            for col in 0..cols as i16 {
                let cell = board.get_cell(row as usize, col as usize).unwrap();
                let mut expected = 0;
                for dr in -1..=1 {
                    for dc in -1..=1 {
                        if (dr, dc) == (0, 0) {
                            continue;
                        }
                        let (r, c) = (row + dr, col + dc);
                        if r < 0 || c < 0 || r >= rows as i16 || c >= cols as i16 {
                            continue;
                        }
                        if board.get_cell(r as usize, c as usize).unwrap().kind().is_mine() {
                            expected += 1;
                        }
                    }
                }

                match cell.kind() {
                    CellKind::Mine => {}
                    CellKind::Number(count) => assert_eq!(count, expected),
                    // specials only ever land on cells with no adjacent mines
                    CellKind::Empty | CellKind::Question | CellKind::Surprise => {
                        assert_eq!(expected, 0)
                    }
                }
            }
        }
    }

    #[test]
    fn same_seed_reproduces_board() {
        assert_eq!(generate(Difficulty::Hard, 42), generate(Difficulty::Hard, 42));
        assert_ne!(generate(Difficulty::Hard, 42), generate(Difficulty::Hard, 43));
    }

    #[test]
    fn overfull_config_is_rejected() {
        let mut config = Difficulty::Easy.config();
        config.mines = 80;
        config.question_cells = 2;

        let mut rng = SmallRng::seed_from_u64(0);
        let result = RandomBoardGenerator::new(&mut rng).generate(&config);

        assert_eq!(result, Err(GameError::TooManyCells { rows: 9, cols: 9 }));
    }

    #[test]
    fn crowded_board_places_fewer_specials() {
        let config = DifficultyConfig {
            rows: 3,
            cols: 3,
            mines: 1,
            question_cells: 4,
            surprise_cells: 0,
            ..Difficulty::Easy.config()
        };

        let mut rng = SmallRng::seed_from_u64(3);
        let board = RandomBoardGenerator::new(&mut rng).generate(&config).unwrap();

        assert_eq!(board.mine_count(), 1);
        assert!(board.question_count() <= 4);
        assert_eq!(
            board.question_count(),
            board.count_kind(|kind| kind == CellKind::Question)
        );
    }
}
