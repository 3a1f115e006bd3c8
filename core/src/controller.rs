use chrono::prelude::*;
use rand::Rng;
use rand::rngs::SmallRng;

use crate::*;

/// One two-player match: a board per player, a shared ledger and the turn arbiter.
///
/// Every action returns the ordered events it produced. Rule violations produce no events
/// and change nothing; only out-of-range coordinates surface as errors.
#[derive(Clone, Debug)]
pub struct MatchController<R = SmallRng> {
    settings: MatchSettings,
    boards: [Board; 2],
    ledger: ScoreLedger,
    arbiter: TurnArbiter,
    activations: u32,
    revealed_by: [CellCount; 2],
    started_at: DateTime<Utc>,
    summary: Option<MatchSummary>,
    rng: R,
}

impl<R: Rng> MatchController<R> {
    /// Generates both boards from `rng`, which the controller keeps for later resets.
    pub fn new(settings: MatchSettings, mut rng: R) -> Result<Self> {
        let boards = Self::generate_boards(&settings, &mut rng)?;
        Ok(Self::from_boards(settings, boards, rng))
    }

    /// Replaces the whole match state with freshly generated boards.
    pub fn reset(&mut self, settings: MatchSettings) -> Result<()> {
        let boards = Self::generate_boards(&settings, &mut self.rng)?;
        log::debug!("Match reset to {} difficulty", settings.difficulty);
        self.ledger = ScoreLedger::new(&settings.config());
        self.settings = settings;
        self.boards = boards;
        self.arbiter = TurnArbiter::new();
        self.activations = 0;
        self.revealed_by = [0, 0];
        self.started_at = Utc::now();
        self.summary = None;
        Ok(())
    }

    fn generate_boards(settings: &MatchSettings, rng: &mut R) -> Result<[Board; 2]> {
        let config = settings.config();
        let first = RandomBoardGenerator::new(&mut *rng).generate(&config)?;
        let second = RandomBoardGenerator::new(&mut *rng).generate(&config)?;
        Ok([first, second])
    }
}

impl<R> MatchController<R> {
    /// Starts a match on prepared boards; ledger and turn start from `settings`.
    pub fn from_boards(settings: MatchSettings, boards: [Board; 2], rng: R) -> Self {
        let ledger = ScoreLedger::new(&settings.config());
        log::debug!("Match started on {} difficulty", settings.difficulty);
        Self {
            settings,
            boards,
            ledger,
            arbiter: TurnArbiter::new(),
            activations: 0,
            revealed_by: [0, 0],
            started_at: Utc::now(),
            summary: None,
            rng,
        }
    }

    pub fn settings(&self) -> &MatchSettings {
        &self.settings
    }

    pub fn difficulty(&self) -> Difficulty {
        self.settings.difficulty
    }

    pub fn board(&self, player: Player) -> &Board {
        &self.boards[player.index()]
    }

    pub fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    pub fn current_player(&self) -> Player {
        self.arbiter.current_player()
    }

    pub fn is_game_over(&self) -> bool {
        self.ledger.is_game_over()
    }

    /// Ended either by running out of lives or by a cleared board.
    pub fn is_finished(&self) -> bool {
        self.summary.is_some() || self.ledger.is_game_over()
    }

    pub fn winner(&self) -> Option<Player> {
        match self.summary?.outcome {
            MatchOutcome::BoardCleared { winner } => Some(winner),
            MatchOutcome::OutOfLives => None,
        }
    }

    pub fn summary(&self) -> Option<&MatchSummary> {
        self.summary.as_ref()
    }

    pub fn activations(&self) -> u32 {
        self.activations
    }

    /// Cells uncovered on `player`'s board so far, cascades included.
    pub fn revealed_by(&self, player: Player) -> CellCount {
        self.revealed_by[player.index()]
    }

    fn admits(&self, player: Player, action: Action, cell: &Cell) -> bool {
        let legal = self
            .arbiter
            .is_legal(player, action, cell, self.is_finished());
        if !legal {
            log::debug!(
                "Ignoring {:?} by {:?} at {:?}",
                action,
                player,
                cell.coords()
            );
        }
        legal
    }

    pub fn reveal(&mut self, player: Player, coords: Coord2) -> Result<Vec<MatchEvent>> {
        let cell = *self.boards[player.index()].cell_at(coords)?;
        if !self.admits(player, Action::Reveal, &cell) {
            return Ok(Vec::new());
        }

        // second click on a special cell asks for confirmation instead of revealing
        if let Some(kind) = cell.kind().special().filter(|_| cell.is_revealed()) {
            if !self.settings.questions.permits(kind, self.activations) {
                return Ok(Vec::new());
            }
            return Ok(vec![MatchEvent::ActivationOffered {
                player,
                cell,
                cost: self.settings.activation_cost(),
            }]);
        }

        let before = self.tally();
        let board = &mut self.boards[player.index()];
        let revealed = board.reveal(coords)?;
        let mut cells = Vec::with_capacity(revealed.len());
        for revealed_cell in &revealed {
            let cell = board.cell_mut(revealed_cell.coords())?;
            self.ledger.on_reveal(cell);
            cells.push(*cell);
        }
        self.revealed_by[player.index()] += cells.len() as CellCount;

        let mut events = Vec::new();
        let effect = if cells.is_empty() {
            ActionEffect::NothingRevealed
        } else {
            events.push(MatchEvent::Revealed { player, cells });
            ActionEffect::Revealed
        };
        self.settle(player, effect, before, &mut events);

        if self.boards[player.index()].is_cleared() && self.summary.is_none() {
            log::info!("{:?} cleared their board", player);
            let summary = self.conclude(MatchOutcome::BoardCleared { winner: player });
            events.push(MatchEvent::BoardCleared { player, summary });
        }
        self.check_game_over(&mut events);

        Ok(events)
    }

    pub fn toggle_flag(&mut self, player: Player, coords: Coord2) -> Result<Vec<MatchEvent>> {
        let cell = *self.boards[player.index()].cell_at(coords)?;
        if !self.admits(player, Action::ToggleFlag, &cell) {
            return Ok(Vec::new());
        }

        let before = self.tally();
        let cell = self.boards[player.index()].cell_mut(coords)?;
        let Some(flagged) = cell.toggle_flag() else {
            return Ok(Vec::new());
        };
        self.ledger.on_toggle_flag(cell);

        let mut events = vec![MatchEvent::Flagged {
            player,
            cell: *cell,
            flagged,
        }];
        let effect = if flagged {
            ActionEffect::FlagPlaced
        } else {
            ActionEffect::FlagRemoved
        };
        self.settle(player, effect, before, &mut events);
        self.check_game_over(&mut events);

        Ok(events)
    }

    /// Confirmed second interaction with a revealed Question or Surprise cell.
    ///
    /// The activation cost is charged before the outcome is applied. A provider returning
    /// `None` declines: nothing is paid and the cell stays on offer.
    pub fn activate_special(
        &mut self,
        player: Player,
        coords: Coord2,
        provider: &mut impl OutcomeProvider,
    ) -> Result<Vec<MatchEvent>> {
        let cell = *self.boards[player.index()].cell_at(coords)?;
        if !self.admits(player, Action::Activate, &cell) {
            return Ok(Vec::new());
        }
        let Some(kind) = cell.kind().special() else {
            return Ok(Vec::new());
        };
        if !self.settings.questions.permits(kind, self.activations) {
            log::debug!("{:?} activation not permitted by settings", kind);
            return Ok(Vec::new());
        }

        let cost = self.settings.activation_cost();
        let request = ActivationRequest {
            player,
            cell,
            kind,
            difficulty: self.settings.difficulty,
            cost,
            settings: &self.settings,
        };
        let Some(outcome) = provider.resolve(&request) else {
            log::debug!("{:?} declined {:?} at {:?}", player, kind, coords);
            return Ok(Vec::new());
        };

        let before = self.tally();
        self.ledger.add_points(-i32::from(cost));
        self.ledger.apply_outcome(&outcome);
        let cell = self.boards[player.index()].cell_mut(coords)?;
        cell.mark_special_used();
        let cell = *cell;
        self.activations += 1;
        log::debug!("{:?} activated {:?}: {:?}", player, kind, outcome);

        let mut events = vec![MatchEvent::SpecialActivated {
            player,
            cell,
            outcome,
        }];
        self.settle(player, ActionEffect::Activation, before, &mut events);
        self.check_game_over(&mut events);

        Ok(events)
    }

    /// Declining the confirmation changes nothing; the cell can be offered again later.
    pub fn decline_special(&mut self, player: Player, coords: Coord2) -> Result<Vec<MatchEvent>> {
        self.boards[player.index()].validate_coords(coords)?;
        log::debug!("{:?} declined activation at {:?}", player, coords);
        Ok(Vec::new())
    }

    fn tally(&self) -> (i32, u8) {
        (self.ledger.score(), self.ledger.lives())
    }

    /// Emits ledger changes, then hands over the turn if `effect` consumes it.
    fn settle(
        &mut self,
        player: Player,
        effect: ActionEffect,
        (score, lives): (i32, u8),
        events: &mut Vec<MatchEvent>,
    ) {
        if self.ledger.score() != score {
            events.push(MatchEvent::ScoreChanged {
                new_score: self.ledger.score(),
            });
        }
        if self.ledger.lives() != lives {
            events.push(MatchEvent::LivesChanged {
                new_lives: self.ledger.lives(),
            });
        }
        debug_assert_eq!(player, self.arbiter.current_player());
        if let Some(next) = self.arbiter.settle(effect) {
            events.push(MatchEvent::TurnChanged { player: next });
        }
    }

    fn check_game_over(&mut self, events: &mut Vec<MatchEvent>) {
        if self.summary.is_none() && self.ledger.is_game_over() {
            log::info!("Game over with score {}", self.ledger.score());
            let summary = self.conclude(MatchOutcome::OutOfLives);
            events.push(MatchEvent::GameOver { summary });
        }
    }

    fn conclude(&mut self, outcome: MatchOutcome) -> MatchSummary {
        let summary = MatchSummary {
            outcome,
            final_score: self.ledger.score(),
            difficulty: self.settings.difficulty,
            started_at: self.started_at,
            timestamp: Utc::now(),
        };
        self.summary = Some(summary);
        summary
    }

    #[cfg(test)]
    pub(crate) fn ledger_mut(&mut self) -> &mut ScoreLedger {
        &mut self.ledger
    }
}
