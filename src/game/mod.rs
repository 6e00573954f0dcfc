pub mod action;
pub mod card;
pub mod deck;
pub mod game;
pub mod history;
pub mod players;
pub mod property_set;
pub mod resolution;
pub mod rules;
pub mod state;

pub use action::{Action, PropertyRef};
pub use card::{Card, CardId, CardKind};
pub use deck::{Deck, DeckError};
pub use game::{Game, GameOutcome, GameRecord, TurnPhase};
pub use history::{GameEvent, History, HistoryEntry};
pub use players::{PlayerState, SETS_TO_WIN};
pub use property_set::{PropertyError, PropertySet};
pub use resolution::{ChargeReason, ContestKind, Negotiation, PaymentItem, PaymentRequest, PendingAction};
pub use rules::{RuleViolation, TurnBudget};
pub use state::{GameConfig, GameError, GameState, RefusedRentPolicy};
