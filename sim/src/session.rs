use duosweeper_core::{Result, *};
use duosweeper_protocol::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Question drawn for an activation, waiting for the player's answer.
#[derive(Clone, Debug)]
struct PendingQuestion {
    player: Player,
    coords: Coord2,
    question: TriviaQuestion,
}

/// Applies protocol messages to one match, the way a presentation backend would.
pub struct Session {
    game: MatchController<SmallRng>,
    deck: QuestionDeck<SmallRng>,
    rng: SmallRng,
    pending: Option<PendingQuestion>,
}

impl Session {
    pub fn new(settings: MatchSettings, seed: u64, questions: Vec<TriviaQuestion>) -> Result<Self> {
        let game = MatchController::new(settings, SmallRng::seed_from_u64(seed))?;
        Ok(Self {
            game,
            deck: QuestionDeck::new(questions, SmallRng::seed_from_u64(seed.wrapping_add(1))),
            rng: SmallRng::seed_from_u64(seed.wrapping_add(2)),
            pending: None,
        })
    }

    pub fn game(&self) -> &MatchController<SmallRng> {
        &self.game
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot::capture(&self.game)
    }

    /// Out-of-range coordinates and out-of-order answers come back as `Rejected`.
    pub fn handle(&mut self, message: ClientMessage) -> ServerMessage {
        log::trace!("Handling {:?}", message);
        let reply = match message {
            ClientMessage::NewMatch { settings } => {
                self.pending = None;
                self.game
                    .reset(settings)
                    .map(|()| ServerMessage::Snapshot {
                        snapshot: self.snapshot(),
                    })
            }
            ClientMessage::Reveal { player, row, col } => {
                let events = self.game.reveal(player, (row, col));
                self.played(player, events)
            }
            ClientMessage::ToggleFlag { player, row, col } => {
                let events = self.game.toggle_flag(player, (row, col));
                self.played(player, events)
            }
            ClientMessage::Activate { player, row, col } => self.activate(player, (row, col)),
            ClientMessage::Answer { player, option } => return self.answer(player, option),
            ClientMessage::Decline { player, row, col } => {
                self.pending
                    .take_if(|pending| pending.player == player && pending.coords == (row, col));
                self.game
                    .decline_special(player, (row, col))
                    .map(|events| ServerMessage::Events { events })
            }
            ClientMessage::Snapshot => Ok(ServerMessage::Snapshot {
                snapshot: self.snapshot(),
            }),
        };
        reply.unwrap_or_else(|err| ServerMessage::Rejected {
            reason: err.to_string(),
        })
    }

    /// A player who moves on after being asked forfeits the question.
    fn played(&mut self, player: Player, events: Result<Vec<MatchEvent>>) -> Result<ServerMessage> {
        let events = events?;
        if !events.is_empty() {
            self.pending.take_if(|pending| pending.player == player);
        }
        Ok(ServerMessage::Events { events })
    }

    /// Surprises resolve immediately. Question cells only draw a question here; the
    /// activation itself runs once the answer arrives.
    fn activate(&mut self, player: Player, coords: Coord2) -> Result<ServerMessage> {
        let Self {
            game, deck, rng, ..
        } = self;
        let mut drawn = None;
        let mut provider = |request: &ActivationRequest| match request.kind {
            SpecialKind::Surprise => Some(roll_surprise(&mut *rng, &request.config())),
            SpecialKind::Question => {
                let tag = request.settings.questions.pick_difficulty(&mut *rng);
                drawn = Some(
                    deck.next_question(tag)
                        .unwrap_or_else(TriviaQuestion::fallback),
                );
                None
            }
        };
        let events = game.activate_special(player, coords, &mut provider)?;

        match drawn {
            Some(question) => {
                log::debug!("Asking {:?}: {}", player, question.text);
                self.pending = Some(PendingQuestion {
                    player,
                    coords,
                    question: question.clone(),
                });
                Ok(ServerMessage::Question { player, question })
            }
            None => Ok(ServerMessage::Events { events }),
        }
    }

    fn answer(&mut self, player: Player, option: usize) -> ServerMessage {
        let Some(pending) = self.pending.take_if(|pending| pending.player == player) else {
            return ServerMessage::Rejected {
                reason: format!("No question pending for {:?}", player),
            };
        };

        let mut provider = |request: &ActivationRequest| {
            let payout = request
                .settings
                .payouts
                .get(request.difficulty, pending.question.difficulty);
            Some(payout.resolve(&pending.question, option))
        };
        match self
            .game
            .activate_special(player, pending.coords, &mut provider)
        {
            Ok(events) => ServerMessage::Events { events },
            Err(err) => ServerMessage::Rejected {
                reason: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Finds the first special of `kind` on `player`'s board.
    fn find(session: &Session, player: Player, kind: CellKind) -> Coord2 {
        session
            .game()
            .board(player)
            .iter_cells()
            .find(|cell| cell.kind() == kind)
            .map(Cell::coords)
            .unwrap()
    }

    /// Reveals `coords` for `player`, then spends the other player's turn on a plain cell.
    fn reveal_and_pass(session: &mut Session, player: Player, coords: Coord2) {
        session.handle(ClientMessage::Reveal {
            player,
            row: coords.0,
            col: coords.1,
        });
        let other = player.other();
        let (row, col) = find(session, other, CellKind::Question);
        session.handle(ClientMessage::Reveal {
            player: other,
            row,
            col,
        });
        assert_eq!(session.game().current_player(), player);
    }

    #[test]
    fn question_flow_asks_then_applies_answer() {
        let mut session = Session::new(MatchSettings::default(), 4, Vec::new()).unwrap();
        let coords = find(&session, Player::First, CellKind::Question);
        reveal_and_pass(&mut session, Player::First, coords);
        let score = session.game().ledger().score();

        let reply = session.handle(ClientMessage::Activate {
            player: Player::First,
            row: coords.0,
            col: coords.1,
        });
        let ServerMessage::Question { question, .. } = reply else {
            panic!("expected a question, got {:?}", reply);
        };
        assert_eq!(question, TriviaQuestion::fallback());
        assert_eq!(session.game().ledger().score(), score);

        let reply = session.handle(ClientMessage::Answer {
            player: Player::First,
            option: question.correct_option,
        });
        assert!(matches!(reply, ServerMessage::Events { .. }));
        // 2 - 5 clamps to zero, then +3
        assert_eq!(session.game().ledger().score(), 3);
        assert_eq!(session.game().activations(), 1);
    }

    /// Reveals a Question cell for First and activates it, returning its coordinates.
    fn ask_first(session: &mut Session) -> Coord2 {
        let coords = find(session, Player::First, CellKind::Question);
        reveal_and_pass(session, Player::First, coords);
        let reply = session.handle(ClientMessage::Activate {
            player: Player::First,
            row: coords.0,
            col: coords.1,
        });
        assert!(matches!(reply, ServerMessage::Question { .. }));
        coords
    }

    #[test]
    fn opponent_decline_keeps_pending_question() {
        let mut session = Session::new(MatchSettings::default(), 4, Vec::new()).unwrap();
        ask_first(&mut session);

        session.handle(ClientMessage::Decline {
            player: Player::Second,
            row: 0,
            col: 0,
        });
        let reply = session.handle(ClientMessage::Answer {
            player: Player::First,
            option: 2,
        });

        assert!(matches!(reply, ServerMessage::Events { .. }));
        assert_eq!(session.game().activations(), 1);
    }

    #[test]
    fn decline_of_asked_cell_drops_question() {
        let mut session = Session::new(MatchSettings::default(), 4, Vec::new()).unwrap();
        let (row, col) = ask_first(&mut session);

        session.handle(ClientMessage::Decline {
            player: Player::First,
            row,
            col,
        });
        let reply = session.handle(ClientMessage::Answer {
            player: Player::First,
            option: 2,
        });

        assert!(matches!(reply, ServerMessage::Rejected { .. }));
        assert_eq!(session.game().activations(), 0);
    }

    #[test]
    fn moving_on_forfeits_the_question() {
        let mut session = Session::new(MatchSettings::default(), 4, Vec::new()).unwrap();
        ask_first(&mut session);
        let (row, col) = session
            .game()
            .board(Player::First)
            .iter_cells()
            .find(|cell| !cell.is_revealed())
            .map(Cell::coords)
            .unwrap();

        let reply = session.handle(ClientMessage::ToggleFlag {
            player: Player::First,
            row,
            col,
        });
        assert!(matches!(reply, ServerMessage::Events { ref events } if !events.is_empty()));
        let reply = session.handle(ClientMessage::Answer {
            player: Player::First,
            option: 2,
        });

        assert!(matches!(reply, ServerMessage::Rejected { .. }));
        assert_eq!(session.game().activations(), 0);
    }

    #[test]
    fn answer_without_question_is_rejected() {
        let mut session = Session::new(MatchSettings::default(), 4, Vec::new()).unwrap();

        let reply = session.handle(ClientMessage::Answer {
            player: Player::First,
            option: 0,
        });

        assert!(matches!(reply, ServerMessage::Rejected { .. }));
    }

    #[test]
    fn surprise_resolves_on_activation() {
        let mut session = Session::new(MatchSettings::default(), 8, Vec::new()).unwrap();
        let coords = find(&session, Player::First, CellKind::Surprise);
        reveal_and_pass(&mut session, Player::First, coords);

        let reply = session.handle(ClientMessage::Activate {
            player: Player::First,
            row: coords.0,
            col: coords.1,
        });

        let ServerMessage::Events { events } = reply else {
            panic!("expected events, got {:?}", reply);
        };
        assert!(matches!(events[0], MatchEvent::SpecialActivated { .. }));
        assert!(
            session
                .game()
                .board(Player::First)
                .cell_at(coords)
                .unwrap()
                .is_special_used()
        );
    }

    #[test]
    fn out_of_range_is_rejected() {
        let mut session = Session::new(MatchSettings::default(), 1, Vec::new()).unwrap();

        let reply = session.handle(ClientMessage::Reveal {
            player: Player::First,
            row: 40,
            col: 0,
        });

        assert!(matches!(reply, ServerMessage::Rejected { .. }));
    }

    #[test]
    fn new_match_resets_the_game() {
        let mut session = Session::new(MatchSettings::default(), 1, Vec::new()).unwrap();

        let reply = session.handle(ClientMessage::NewMatch {
            settings: MatchSettings::new(Difficulty::Medium),
        });

        let ServerMessage::Snapshot { snapshot } = reply else {
            panic!("expected snapshot, got {:?}", reply);
        };
        assert_eq!(snapshot.difficulty, Difficulty::Medium);
        assert_eq!(snapshot.boards[0].rows, 13);
        assert_eq!(snapshot.lives, 8);
    }
}
