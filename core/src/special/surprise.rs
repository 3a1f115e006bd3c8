use rand::Rng;

use super::*;

/// Coin flip between a good surprise (+points, +1 life) and a bad one (-points, -1 life).
pub fn roll_surprise<R: Rng + ?Sized>(rng: &mut R, config: &DifficultyConfig) -> SpecialOutcome {
    let points = i32::from(config.surprise_points);
    let outcome = if rng.random_bool(0.5) {
        SpecialOutcome::Surprise {
            points_delta: points,
            life_delta: 1,
        }
    } else {
        SpecialOutcome::Surprise {
            points_delta: -points,
            life_delta: -1,
        }
    };
    log::debug!("Surprise rolled {:?}", outcome);
    outcome
}
