pub use arbiter::*;
pub use board::*;
pub use cell::*;
pub use controller::*;
pub use difficulty::*;
pub use error::*;
pub use event::*;
pub use generator::*;
pub use ledger::*;
pub use settings::*;
pub use special::*;
pub use types::*;

mod arbiter;
mod board;
mod cell;
mod controller;
mod difficulty;
mod error;
mod event;
mod generator;
mod ledger;
mod settings;
mod special;
mod types;
