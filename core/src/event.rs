use chrono::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Ordered record of what one action changed, consumed by presentation layers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum MatchEvent {
    Revealed {
        player: Player,
        cells: Vec<Cell>,
    },
    Flagged {
        player: Player,
        cell: Cell,
        flagged: bool,
    },
    /// A revealed special cell was clicked again; the presentation layer should confirm.
    ActivationOffered {
        player: Player,
        cell: Cell,
        cost: u16,
    },
    SpecialActivated {
        player: Player,
        cell: Cell,
        outcome: SpecialOutcome,
    },
    ScoreChanged {
        new_score: i32,
    },
    LivesChanged {
        new_lives: u8,
    },
    TurnChanged {
        player: Player,
    },
    BoardCleared {
        player: Player,
        summary: MatchSummary,
    },
    GameOver {
        summary: MatchSummary,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum MatchOutcome {
    BoardCleared { winner: Player },
    OutOfLives,
}

/// Final record of a match, for an external history log.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub outcome: MatchOutcome,
    pub final_score: i32,
    pub difficulty: Difficulty,
    pub started_at: DateTime<Utc>,
    pub timestamp: DateTime<Utc>,
}

impl MatchSummary {
    /// Whole seconds between match start and end.
    pub fn elapsed_secs(&self) -> u32 {
        (self.timestamp - self.started_at).num_seconds().max(0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let json = serde_json::to_value(MatchEvent::ScoreChanged { new_score: 4 }).unwrap();
        assert_eq!(json, serde_json::json!({"type": "scoreChanged", "newScore": 4}));

        let json = serde_json::to_value(MatchEvent::TurnChanged {
            player: Player::Second,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"type": "turnChanged", "player": "second"}));
    }

    #[test]
    fn revealed_event_carries_cells() {
        let cell = Cell::new((2, 3), CellKind::Number(2));
        let json = serde_json::to_value(MatchEvent::Revealed {
            player: Player::First,
            cells: vec![cell],
        })
        .unwrap();

        assert_eq!(json["type"], "revealed");
        assert_eq!(json["cells"][0]["row"], 2);
        assert_eq!(json["cells"][0]["kind"]["kind"], "number");
        assert_eq!(json["cells"][0]["kind"]["adjacentMines"], 2);
    }
}
