use serde::{Deserialize, Serialize};

use crate::*;

/// Shared score and lives pool for both players of a match.
///
/// The score never drops below zero: every mutation clamps the running total.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreLedger {
    score: i32,
    lives: u8,
    max_lives: u8,
    overflow_points_per_life: u16,
}

impl ScoreLedger {
    pub fn new(config: &DifficultyConfig) -> Self {
        Self {
            score: 0,
            lives: config.start_lives.min(config.max_lives),
            max_lives: config.max_lives,
            overflow_points_per_life: config.overflow_points_per_life,
        }
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn max_lives(&self) -> u8 {
        self.max_lives
    }

    pub fn is_game_over(&self) -> bool {
        self.lives == 0
    }

    /// A revealed mine costs a life; anything else earns one point, once per cell.
    pub fn on_reveal(&mut self, cell: &mut Cell) {
        if cell.kind().is_mine() {
            self.lose_life(1);
        } else if !cell.is_reveal_scored() {
            self.add_points(1);
            cell.mark_reveal_scored();
        }
    }

    /// Called after the flag bit flipped. Only the first placement of a flag scores.
    pub fn on_toggle_flag(&mut self, cell: &mut Cell) {
        if !cell.is_flagged() || cell.is_flag_scored() {
            return;
        }
        if cell.kind().is_mine() {
            self.add_points(1);
        } else {
            self.add_points(-3);
        }
        cell.mark_flag_scored();
    }

    /// Only a positive `life_delta` moves lives: gained on a right answer, lost on a wrong one.
    pub fn apply_question_outcome(
        &mut self,
        points_right: i32,
        points_wrong: i32,
        life_delta: i32,
        correct: bool,
    ) {
        let lives = u8::try_from(life_delta.max(0)).unwrap_or(u8::MAX);
        if correct {
            self.add_points(points_right);
            self.gain_life(lives);
        } else {
            self.add_points(points_wrong);
            self.lose_life(lives);
        }
    }

    pub fn apply_surprise_outcome(&mut self, points_delta: i32, life_delta: i32) {
        self.add_points(points_delta);
        let lives = u8::try_from(life_delta.unsigned_abs()).unwrap_or(u8::MAX);
        if life_delta > 0 {
            self.gain_life(lives);
        } else if life_delta < 0 {
            self.lose_life(lives);
        }
    }

    pub fn apply_outcome(&mut self, outcome: &SpecialOutcome) {
        match *outcome {
            SpecialOutcome::Question {
                correct,
                points_right,
                points_wrong,
                life_delta,
            } => self.apply_question_outcome(points_right, points_wrong, life_delta, correct),
            SpecialOutcome::Surprise {
                points_delta,
                life_delta,
            } => self.apply_surprise_outcome(points_delta, life_delta),
        }
    }

    /// Lives past the cap turn into points at the difficulty's overflow rate.
    pub fn gain_life(&mut self, n: u8) {
        if n == 0 {
            return;
        }
        let total = u16::from(self.lives) + u16::from(n);
        let max = u16::from(self.max_lives);
        if total > max {
            let overflow = total - max;
            self.lives = self.max_lives;
            log::debug!("Life overflow of {} converted to points", overflow);
            self.add_points(i32::from(overflow) * i32::from(self.overflow_points_per_life));
        } else {
            self.lives = total as u8;
        }
    }

    pub fn lose_life(&mut self, n: u8) {
        self.lives = self.lives.saturating_sub(n);
        if self.lives == 0 {
            log::debug!("Shared lives exhausted");
        }
    }

    pub fn add_points(&mut self, delta: i32) {
        self.score = self.score.saturating_add(delta).max(0);
    }
}
