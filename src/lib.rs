#![warn(clippy::all)]
#![deny(rust_2018_idioms)]

pub mod cli;
pub mod game;
pub mod observation;
pub mod players;
pub mod types;

pub use game::{Action, Card, CardId, Game, GameConfig, GameError, GameState, RuleViolation};
pub use observation::{Observation, PlayerObservation};
pub use types::{ActionType, CardType, PaymentSource, PropertyColor};
