use anyhow::Context;
use duosweeper_core::TriviaQuestion;
use serde::Deserialize;
use std::path::Path;

const BUILTIN: &str = include_str!("../questions.toml");

#[derive(Deserialize)]
struct QuestionFile {
    questions: Vec<TriviaQuestion>,
}

fn parse(text: &str) -> anyhow::Result<Vec<TriviaQuestion>> {
    let file: QuestionFile = toml::from_str(text)?;
    Ok(file.questions)
}

/// Small deck shipped with the simulator.
pub fn builtin() -> Vec<TriviaQuestion> {
    parse(BUILTIN).unwrap_or_else(|err| {
        log::warn!("Bundled questions unreadable: {}", err);
        Vec::new()
    })
}

pub fn load(path: &Path) -> anyhow::Result<Vec<TriviaQuestion>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading questions from {}", path.display()))?;
    parse(&text).with_context(|| format!("parsing questions from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use duosweeper_core::QuestionDifficulty;

    #[test]
    fn builtin_deck_parses() {
        let questions = parse(BUILTIN).unwrap();

        assert_eq!(questions.len(), 6);
        assert!(questions.iter().all(|q| q.correct_option < q.options.len()));
        assert_eq!(questions[5].difficulty, QuestionDifficulty::Pro);
        assert_eq!(questions[5].life_delta, Some(2));
        assert_eq!(questions[0].points_right, None);
    }

    #[test]
    fn bad_deck_is_an_error() {
        assert!(parse("questions = 3").is_err());
    }
}
