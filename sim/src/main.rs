use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use duosweeper_core::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;

mod bot;
mod questions;
mod session;

use bot::{RandomBot, play_out};
use session::Session;

/// Plays a full two-player match with random bots and prints the message log.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Difficulty tag: easy, medium or hard
    #[arg(short, long)]
    difficulty: Option<String>,

    /// TOML file with match settings; the difficulty flag overrides its difficulty
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// TOML file with a question deck instead of the bundled one
    #[arg(short, long)]
    questions: Option<PathBuf>,

    /// Stop after this many messages even if the match is still running
    #[arg(long, default_value_t = 2000)]
    max_moves: usize,

    /// Print every exchange as JSON lines
    #[arg(long)]
    json: bool,
}

fn load_settings(args: &Args) -> anyhow::Result<MatchSettings> {
    let mut settings = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading settings from {}", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("parsing settings from {}", path.display()))?
        }
        None => MatchSettings::default(),
    };
    if args.difficulty.is_some() {
        settings.difficulty = Difficulty::from_tag(args.difficulty.as_deref());
    }
    Ok(settings)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    simplelog::TermLogger::init(
        args.verbose.log_level_filter(),
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("seed: {}", seed);

    let settings = load_settings(&args)?;
    let questions = match &args.questions {
        Some(path) => questions::load(path)?,
        None => questions::builtin(),
    };
    log::debug!("{} questions, settings: {:?}", questions.len(), settings);

    let mut session = Session::new(settings, seed, questions)?;
    let mut bot = RandomBot::new(SmallRng::seed_from_u64(seed.rotate_left(32)));
    let mut failure = None;
    let moves = play_out(&mut session, &mut bot, args.max_moves, |message, reply| {
        if !args.json || failure.is_some() {
            return;
        }
        let line = duosweeper_protocol::encode(message)
            .and_then(|out| Ok((out, duosweeper_protocol::encode(reply)?)));
        match line {
            Ok((out, back)) => println!("{}\n{}", out, back),
            Err(err) => failure = Some(err),
        }
    });
    if let Some(err) = failure {
        return Err(err.into());
    }

    let game = session.game();
    match game.summary() {
        Some(summary) => {
            log::info!(
                "{:?} after {} messages in {}s, score {}",
                summary.outcome,
                moves,
                summary.elapsed_secs(),
                summary.final_score
            );
            println!("{}", duosweeper_protocol::encode(summary)?);
        }
        None => log::warn!("Match still running after {} messages", moves),
    }
    for player in Player::BOTH {
        log::info!("{:?} revealed {} cells", player, game.revealed_by(player));
    }
    Ok(())
}
