use core::fmt;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::*;

/// Game difficulty presets. Anything unrecognized falls back to `Easy`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub const fn config(self) -> DifficultyConfig {
        use Difficulty::*;
        match self {
            Easy => DifficultyConfig {
                rows: 9,
                cols: 9,
                mines: 10,
                question_cells: 6,
                surprise_cells: 2,
                start_lives: 6,
                max_lives: 10,
                activation_cost: 5,
                overflow_points_per_life: 1,
                surprise_points: 8,
            },
            Medium => DifficultyConfig {
                rows: 13,
                cols: 13,
                mines: 26,
                question_cells: 10,
                surprise_cells: 3,
                start_lives: 8,
                max_lives: 10,
                activation_cost: 3,
                overflow_points_per_life: 2,
                surprise_points: 12,
            },
            Hard => DifficultyConfig {
                rows: 16,
                cols: 16,
                mines: 44,
                question_cells: 14,
                surprise_cells: 4,
                start_lives: 10,
                max_lives: 10,
                activation_cost: 2,
                overflow_points_per_life: 3,
                surprise_points: 16,
            },
        }
    }

    pub const fn tag(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Resolves a difficulty tag, substituting `Easy` for missing or unknown tags so a
    /// match can always start.
    pub fn from_tag(tag: Option<&str>) -> Self {
        let Some(tag) = tag else {
            log::warn!("No difficulty given, defaulting to easy");
            return Self::Easy;
        };
        match tag.trim().to_ascii_lowercase().as_str() {
            "easy" => Self::Easy,
            "medium" => Self::Medium,
            "hard" => Self::Hard,
            other => {
                log::warn!("Unknown difficulty {:?}, defaulting to easy", other);
                Self::Easy
            }
        }
    }

    /// Serde helper accepting any value at all; strings go through [`Difficulty::from_tag`],
    /// everything else falls back to `Easy`.
    pub fn deserialize_lenient<'de, D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<LenientTag>::deserialize(deserializer)? {
            Some(LenientTag::Text(tag)) => Ok(Self::from_tag(Some(&tag))),
            Some(LenientTag::Other(_)) | None => Ok(Self::from_tag(None)),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientTag {
    Text(String),
    Other(IgnoredAny),
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Easy
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Board dimensions, placement counts and payout knobs for one difficulty.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyConfig {
    pub rows: Coord,
    pub cols: Coord,
    pub mines: CellCount,
    pub question_cells: CellCount,
    pub surprise_cells: CellCount,
    pub start_lives: u8,
    pub max_lives: u8,
    pub activation_cost: u16,
    pub overflow_points_per_life: u16,
    pub surprise_points: u16,
}

impl DifficultyConfig {
    pub const fn size(&self) -> Coord2 {
        (self.rows, self.cols)
    }

    pub const fn total_cells(&self) -> CellCount {
        area(self.rows, self.cols)
    }

    /// Cells that must be distinct for generation to terminate.
    pub const fn placed_cells(&self) -> CellCount {
        self.mines
            .saturating_add(self.question_cells)
            .saturating_add(self.surprise_cells)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 || self.placed_cells() > self.total_cells() {
            return Err(GameError::TooManyCells {
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }
}
