//! Messages exchanged between a presentation layer and a running match.

use duosweeper_core::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use view::*;

mod view;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed message: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, ProtocolError>;

/// Player actions and session control sent to the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    NewMatch {
        #[serde(default)]
        settings: MatchSettings,
    },
    Reveal {
        player: Player,
        row: Coord,
        col: Coord,
    },
    ToggleFlag {
        player: Player,
        row: Coord,
        col: Coord,
    },
    /// Confirms an offered activation. Surprises resolve at once; Question cells reply with
    /// the question to answer.
    Activate {
        player: Player,
        row: Coord,
        col: Coord,
    },
    Answer {
        player: Player,
        option: usize,
    },
    Decline {
        player: Player,
        row: Coord,
        col: Coord,
    },
    Snapshot,
}

/// Engine replies: the ordered events of one action, a full snapshot, or a rejection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    Events { events: Vec<MatchEvent> },
    Question { player: Player, question: TriviaQuestion },
    Snapshot { snapshot: MatchSnapshot },
    Rejected { reason: String },
}

pub fn encode<T: Serialize>(message: &T) -> Result<String> {
    Ok(serde_json::to_string(message)?)
}

pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T> {
    Ok(serde_json::from_str(text)?)
}
