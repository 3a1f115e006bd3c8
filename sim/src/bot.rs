use duosweeper_core::*;
use duosweeper_protocol::*;
use rand::Rng;

use crate::session::Session;

/// Plays both seats by picking uniformly among legal-looking moves.
pub struct RandomBot<R> {
    rng: R,
    flag_chance: f64,
    activate_chance: f64,
}

impl<R: Rng> RandomBot<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            flag_chance: 0.1,
            activate_chance: 0.5,
        }
    }

    /// Chooses an action for whoever holds the turn in `snapshot`.
    pub fn next_move(&mut self, snapshot: &MatchSnapshot) -> Option<ClientMessage> {
        let player = snapshot.current_player;
        let board = &snapshot.boards[player.index()];
        let mut hidden = Vec::new();
        let mut flagged = Vec::new();
        let mut offers = Vec::new();
        for row in 0..board.rows {
            for col in 0..board.cols {
                match board.cell((row, col))? {
                    CellView::Hidden => hidden.push((row, col)),
                    CellView::Flagged => flagged.push((row, col)),
                    CellView::Revealed { kind, special_used } => {
                        if kind.is_special() && !special_used {
                            offers.push((row, col));
                        }
                    }
                }
            }
        }

        let (row, col) = if !offers.is_empty() && self.rng.random_bool(self.activate_chance) {
            self.pick(&offers)
        } else if !flagged.is_empty() && (hidden.is_empty() || self.rng.random_bool(0.2)) {
            let (row, col) = self.pick(&flagged);
            return Some(ClientMessage::ToggleFlag { player, row, col });
        } else if !hidden.is_empty() && self.rng.random_bool(self.flag_chance) {
            let (row, col) = self.pick(&hidden);
            return Some(ClientMessage::ToggleFlag { player, row, col });
        } else if !hidden.is_empty() {
            self.pick(&hidden)
        } else {
            return None;
        };
        Some(ClientMessage::Reveal { player, row, col })
    }

    /// Follow-up to a reply: confirm or decline an offer, or answer a question.
    pub fn respond(&mut self, reply: &ServerMessage) -> Option<ClientMessage> {
        match reply {
            ServerMessage::Events { events } => events.iter().find_map(|event| match *event {
                MatchEvent::ActivationOffered { player, cell, .. } => {
                    let (row, col) = cell.coords();
                    Some(if self.rng.random_bool(self.activate_chance) {
                        ClientMessage::Activate { player, row, col }
                    } else {
                        ClientMessage::Decline { player, row, col }
                    })
                }
                _ => None,
            }),
            ServerMessage::Question { player, question } => Some(ClientMessage::Answer {
                player: *player,
                option: self.rng.random_range(0..question.options.len()),
            }),
            ServerMessage::Snapshot { .. } | ServerMessage::Rejected { .. } => None,
        }
    }

    fn pick(&mut self, coords: &[Coord2]) -> Coord2 {
        coords[self.rng.random_range(0..coords.len())]
    }
}

/// Drives `session` until the match finishes or `max_moves` messages were sent.
///
/// Every exchange is handed to `sink`. Returns the number of messages sent.
pub fn play_out<R: Rng>(
    session: &mut Session,
    bot: &mut RandomBot<R>,
    max_moves: usize,
    mut sink: impl FnMut(&ClientMessage, &ServerMessage),
) -> usize {
    let mut follow_up = None;
    let mut moves = 0;
    while moves < max_moves && !session.game().is_finished() {
        let message = match follow_up.take() {
            Some(message) => message,
            None => match bot.next_move(&session.snapshot()) {
                Some(message) => message,
                None => break,
            },
        };
        let reply = session.handle(message.clone());
        if let ServerMessage::Rejected { reason } = &reply {
            log::warn!("{:?} rejected: {}", message, reason);
        }
        follow_up = bot.respond(&reply);
        sink(&message, &reply);
        moves += 1;
    }
    moves
}
