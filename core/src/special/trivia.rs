use core::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::*;

/// Difficulty tag carried by trivia questions, independent of the game difficulty.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestionDifficulty {
    Easy,
    Medium,
    Hard,
    Pro,
}

impl QuestionDifficulty {
    pub const ALL: [QuestionDifficulty; 4] = [
        QuestionDifficulty::Easy,
        QuestionDifficulty::Medium,
        QuestionDifficulty::Hard,
        QuestionDifficulty::Pro,
    ];

    pub const fn tag(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Pro => "pro",
        }
    }
}

impl fmt::Display for QuestionDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A multiple-choice question with optional per-question payout overrides.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriviaQuestion {
    pub text: String,
    pub options: [String; 4],
    pub correct_option: usize,
    pub difficulty: QuestionDifficulty,
    #[serde(default)]
    pub points_right: Option<i32>,
    #[serde(default)]
    pub points_wrong: Option<i32>,
    #[serde(default)]
    pub life_delta: Option<i32>,
}

impl TriviaQuestion {
    /// Asked when no question source has anything to offer.
    pub fn fallback() -> Self {
        Self {
            text: "What is the capital of France?".to_owned(),
            options: [
                "London".to_owned(),
                "Berlin".to_owned(),
                "Paris".to_owned(),
                "Madrid".to_owned(),
            ],
            correct_option: 2,
            difficulty: QuestionDifficulty::Easy,
            points_right: None,
            points_wrong: None,
            life_delta: None,
        }
    }

    pub fn is_correct(&self, picked: usize) -> bool {
        picked == self.correct_option
    }
}

/// Source of trivia questions, e.g. a deck loaded by the presentation layer.
pub trait QuestionProvider {
    fn next_question(&mut self, difficulty: QuestionDifficulty) -> Option<TriviaQuestion>;
}

impl<Q: QuestionProvider + ?Sized> QuestionProvider for &mut Q {
    fn next_question(&mut self, difficulty: QuestionDifficulty) -> Option<TriviaQuestion> {
        (**self).next_question(difficulty)
    }
}

/// In-memory question pool drawing uniformly with an injected random source.
#[derive(Clone, Debug)]
pub struct QuestionDeck<R> {
    questions: Vec<TriviaQuestion>,
    rng: R,
}

impl<R: Rng> QuestionDeck<R> {
    pub fn new(questions: Vec<TriviaQuestion>, rng: R) -> Self {
        Self { questions, rng }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl<R: Rng> QuestionProvider for QuestionDeck<R> {
    /// Prefers questions of the requested difficulty, then any question at all.
    fn next_question(&mut self, difficulty: QuestionDifficulty) -> Option<TriviaQuestion> {
        let matching: Vec<_> = self
            .questions
            .iter()
            .filter(|question| question.difficulty == difficulty)
            .collect();
        let pool = if matching.is_empty() {
            log::debug!("No {} questions, drawing from the whole deck", difficulty);
            self.questions.iter().collect()
        } else {
            matching
        };
        if pool.is_empty() {
            return None;
        }
        let picked = self.rng.random_range(0..pool.len());
        Some(pool[picked].clone())
    }
}

/// Points and lives awarded for one game difficulty x question difficulty pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuestionPayout {
    pub points_right: i32,
    pub points_wrong: i32,
    pub life_delta: i32,
}

impl Default for QuestionPayout {
    fn default() -> Self {
        Self {
            points_right: 3,
            points_wrong: -1,
            life_delta: 1,
        }
    }
}

impl QuestionPayout {
    /// Per-question values take precedence over the table entry.
    pub fn resolve(&self, question: &TriviaQuestion, picked: usize) -> SpecialOutcome {
        SpecialOutcome::Question {
            correct: question.is_correct(picked),
            points_right: question.points_right.unwrap_or(self.points_right),
            points_wrong: question.points_wrong.unwrap_or(self.points_wrong),
            life_delta: question.life_delta.unwrap_or(self.life_delta),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PayoutRow {
    pub easy: QuestionPayout,
    pub medium: QuestionPayout,
    pub hard: QuestionPayout,
    pub pro: QuestionPayout,
}

impl PayoutRow {
    pub fn get(&self, question: QuestionDifficulty) -> &QuestionPayout {
        match question {
            QuestionDifficulty::Easy => &self.easy,
            QuestionDifficulty::Medium => &self.medium,
            QuestionDifficulty::Hard => &self.hard,
            QuestionDifficulty::Pro => &self.pro,
        }
    }
}

/// Trivia payouts indexed by game difficulty, then question difficulty.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PayoutTable {
    pub easy: PayoutRow,
    pub medium: PayoutRow,
    pub hard: PayoutRow,
}

impl PayoutTable {
    pub fn get(&self, game: Difficulty, question: QuestionDifficulty) -> &QuestionPayout {
        let row = match game {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        };
        row.get(question)
    }
}

/// Ready-made provider: trivia questions from `questions` answered through `answer`, and
/// coin-flip surprises from `rng`.
///
/// `answer` receives the question and returns the picked option index, or `None` to decline.
pub struct StandardOutcomes<Q, R, A> {
    questions: Q,
    rng: R,
    answer: A,
}

impl<Q, R, A> StandardOutcomes<Q, R, A>
where
    Q: QuestionProvider,
    R: Rng,
    A: FnMut(&TriviaQuestion) -> Option<usize>,
{
    pub fn new(questions: Q, rng: R, answer: A) -> Self {
        Self {
            questions,
            rng,
            answer,
        }
    }

    fn ask(&mut self, request: &ActivationRequest) -> Option<SpecialOutcome> {
        let tag = request.settings.questions.pick_difficulty(&mut self.rng);
        let question = self
            .questions
            .next_question(tag)
            .unwrap_or_else(TriviaQuestion::fallback);
        let picked = (self.answer)(&question)?;
        let payout = request.settings.payouts.get(request.difficulty, question.difficulty);
        Some(payout.resolve(&question, picked))
    }
}

impl<Q, R, A> OutcomeProvider for StandardOutcomes<Q, R, A>
where
    Q: QuestionProvider,
    R: Rng,
    A: FnMut(&TriviaQuestion) -> Option<usize>,
{
    fn resolve(&mut self, request: &ActivationRequest) -> Option<SpecialOutcome> {
        match request.kind {
            SpecialKind::Question => self.ask(request),
            SpecialKind::Surprise => Some(roll_surprise(&mut self.rng, &request.config())),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn question(text: &str, difficulty: QuestionDifficulty) -> TriviaQuestion {
        TriviaQuestion {
            text: text.to_owned(),
            difficulty,
            ..TriviaQuestion::fallback()
        }
    }

    #[test]
    fn deck_prefers_requested_difficulty() {
        let mut deck = QuestionDeck::new(
            vec![
                question("a", QuestionDifficulty::Easy),
                question("b", QuestionDifficulty::Pro),
            ],
            SmallRng::seed_from_u64(1),
        );

        for _ in 0..10 {
            let drawn = deck.next_question(QuestionDifficulty::Pro).unwrap();
            assert_eq!(drawn.text, "b");
        }
        assert!(deck.next_question(QuestionDifficulty::Hard).is_some());
    }

    #[test]
    fn empty_deck_has_nothing() {
        let mut deck = QuestionDeck::new(Vec::new(), SmallRng::seed_from_u64(1));
        assert!(deck.is_empty());
        assert_eq!(deck.next_question(QuestionDifficulty::Easy), None);
    }

    #[test]
    fn question_overrides_beat_table() {
        let payout = QuestionPayout::default();
        let mut q = TriviaQuestion::fallback();
        q.points_wrong = Some(-6);

        assert_eq!(
            payout.resolve(&q, 2),
            SpecialOutcome::Question {
                correct: true,
                points_right: 3,
                points_wrong: -6,
                life_delta: 1,
            }
        );
        assert!(matches!(
            payout.resolve(&q, 0),
            SpecialOutcome::Question { correct: false, .. }
        ));
    }

    #[test]
    fn table_lookup_is_two_dimensional() {
        let mut table = PayoutTable::default();
        table.hard.pro.points_right = 20;

        assert_eq!(
            table.get(Difficulty::Hard, QuestionDifficulty::Pro).points_right,
            20
        );
        assert_eq!(
            table.get(Difficulty::Easy, QuestionDifficulty::Pro).points_right,
            3
        );
    }

    #[test]
    fn standard_outcomes_ask_and_roll() {
        let settings = MatchSettings::default();
        let deck = QuestionDeck::new(Vec::new(), SmallRng::seed_from_u64(5));
        let mut provider =
            StandardOutcomes::new(deck, SmallRng::seed_from_u64(5), |q: &TriviaQuestion| {
                Some(q.correct_option)
            });
        let mut cell = Cell::new((0, 0), CellKind::Question);
        cell.reveal();
        let mut request = ActivationRequest {
            player: Player::First,
            cell,
            kind: SpecialKind::Question,
            difficulty: Difficulty::Easy,
            cost: 5,
            settings: &settings,
        };

        assert!(matches!(
            provider.resolve(&request),
            Some(SpecialOutcome::Question { correct: true, .. })
        ));

        request.kind = SpecialKind::Surprise;
        assert!(matches!(
            provider.resolve(&request),
            Some(SpecialOutcome::Surprise { .. })
        ));
    }

    #[test]
    fn declined_answer_declines_activation() {
        let settings = MatchSettings::default();
        let deck = QuestionDeck::new(Vec::new(), SmallRng::seed_from_u64(5));
        let mut provider =
            StandardOutcomes::new(deck, SmallRng::seed_from_u64(5), |_: &TriviaQuestion| None);
        let request = ActivationRequest {
            player: Player::Second,
            cell: Cell::new((1, 1), CellKind::Question),
            kind: SpecialKind::Question,
            difficulty: Difficulty::Medium,
            cost: 3,
            settings: &settings,
        };

        assert_eq!(provider.resolve(&request), None);
    }
}
