use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{BuildingKind, PropertyColor};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    PlayOrder {
        players: Vec<String>,
    },
    TurnStarted {
        player: String,
    },
    CardsDrawn {
        player: String,
        count: usize,
        hand_size: usize,
    },
    Banked {
        player: String,
        card: String,
        value: u32,
    },
    PropertyPlaced {
        player: String,
        card: String,
        color: PropertyColor,
    },
    PropertyMoved {
        player: String,
        card: String,
        from: PropertyColor,
        to: PropertyColor,
    },
    BuildingAdded {
        player: String,
        building: BuildingKind,
        color: PropertyColor,
    },
    RentCharged {
        player: String,
        color: PropertyColor,
        amount: u32,
        doubled: u8,
    },
    PassGo {
        player: String,
        drawn: usize,
        hand_size: usize,
    },
    ChargeRequested {
        collector: String,
        payer: String,
        amount: u32,
        reason: String,
    },
    JustSayNo {
        player: String,
        against: String,
    },
    NegationSkipped {
        player: String,
        reason: String,
    },
    ChargeCancelled {
        collector: String,
        payer: String,
        reason: String,
    },
    ActionCancelled {
        player: String,
        victim: String,
        action: String,
    },
    Paid {
        payer: String,
        collector: String,
        paid: u32,
        owed: u32,
        cards: Vec<String>,
    },
    PaymentSkipped {
        payer: String,
        reason: String,
    },
    PropertyStolen {
        thief: String,
        victim: String,
        card: String,
    },
    SetStolen {
        thief: String,
        victim: String,
        color: PropertyColor,
    },
    PropertiesSwapped {
        player: String,
        target: String,
        given: String,
        received: String,
    },
    ActionRejected {
        player: String,
        attempt: u32,
        reason: String,
    },
    ActionSkipped {
        player: String,
        reason: String,
    },
    ActionResolved {
        player: String,
        action: String,
        success: bool,
    },
    ActionPhaseEnded {
        player: String,
        actions_played: u8,
    },
    DiscardRequired {
        player: String,
        count: usize,
    },
    Discarded {
        player: String,
        cards: Vec<String>,
        forced: bool,
    },
    TurnEnded {
        player: String,
    },
    GameWon {
        player: String,
        turn: u32,
    },
    TurnLimitReached {
        turns: u32,
    },
    DeckExhausted,
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::PlayOrder { players } => write!(f, "Play order: {}", players.join(", ")),
            GameEvent::TurnStarted { player } => write!(f, "--- {player}'s turn ---"),
            GameEvent::CardsDrawn {
                player,
                count,
                hand_size,
            } => write!(f, "{player} drew {count} cards ({hand_size} in hand)"),
            GameEvent::Banked {
                player,
                card,
                value,
            } => write!(f, "{player} banked {card} (${value}M)"),
            GameEvent::PropertyPlaced {
                player,
                card,
                color,
            } => write!(f, "{player} added property {card} to {color}"),
            GameEvent::PropertyMoved {
                player,
                card,
                from,
                to,
            } => write!(f, "{player} moved {card} from {from} to {to}"),
            GameEvent::BuildingAdded {
                player,
                building,
                color,
            } => write!(f, "{player} built a {building} on {color}"),
            GameEvent::RentCharged {
                player,
                color,
                amount,
                doubled,
            } => {
                write!(f, "{player} charges ${amount}M rent for {color}")?;
                if *doubled > 0 {
                    write!(f, " (doubled {doubled}x)")?;
                }
                Ok(())
            }
            GameEvent::PassGo {
                player,
                drawn,
                hand_size,
            } => write!(
                f,
                "{player} passed go and drew {drawn} cards ({hand_size} in hand)"
            ),
            GameEvent::ChargeRequested {
                collector,
                payer,
                amount,
                reason,
            } => write!(f, "{collector} asks {payer} for ${amount}M ({reason})"),
            GameEvent::JustSayNo { player, against } => {
                write!(f, "{player} played Just Say No! against {against}")
            }
            GameEvent::NegationSkipped { player, reason } => {
                write!(f, "Skipping {player}'s Just Say No: {reason}")
            }
            GameEvent::ChargeCancelled {
                collector,
                payer,
                reason,
            } => write!(
                f,
                "{payer}'s Just Say No cancelled the {reason} request from {collector}"
            ),
            GameEvent::ActionCancelled {
                player,
                victim,
                action,
            } => write!(f, "{victim} cancelled the {action} from {player}"),
            GameEvent::Paid {
                payer,
                collector,
                paid,
                owed,
                cards,
            } => write!(
                f,
                "{payer} paid ${paid}M (${owed}M requested) to {collector} with [{}]",
                cards.join(", ")
            ),
            GameEvent::PaymentSkipped { payer, reason } => {
                write!(f, "Skipping {payer}'s payment: {reason}")
            }
            GameEvent::PropertyStolen {
                thief,
                victim,
                card,
            } => write!(f, "{thief} took {card} from {victim}"),
            GameEvent::SetStolen {
                thief,
                victim,
                color,
            } => write!(f, "{thief} took the full {color} set from {victim}"),
            GameEvent::PropertiesSwapped {
                player,
                target,
                given,
                received,
            } => write!(f, "{player} gave {given} to {target} and received {received}"),
            GameEvent::ActionRejected {
                player,
                attempt,
                reason,
            } => write!(f, "{player}'s action rejected (attempt {attempt}): {reason}"),
            GameEvent::ActionSkipped { player, reason } => {
                write!(f, "Skipping {player}'s action: {reason}")
            }
            GameEvent::ActionResolved {
                player,
                action,
                success,
            } => {
                let outcome = if *success { "succeeded" } else { "had no effect" };
                write!(f, "{player}'s {action} {outcome}")
            }
            GameEvent::ActionPhaseEnded {
                player,
                actions_played,
            } => write!(
                f,
                "{player} ended their action phase after {actions_played} actions"
            ),
            GameEvent::DiscardRequired { player, count } => {
                write!(f, "{player} has too many cards and must discard {count}")
            }
            GameEvent::Discarded {
                player,
                cards,
                forced,
            } => {
                write!(f, "{player} discarded [{}]", cards.join(", "))?;
                if *forced {
                    write!(f, " (chosen by the engine)")?;
                }
                Ok(())
            }
            GameEvent::TurnEnded { player } => write!(f, "{player} ends turn"),
            GameEvent::GameWon { player, turn } => {
                write!(f, "GAME OVER: {player} wins on turn {turn}")
            }
            GameEvent::TurnLimitReached { turns } => {
                write!(f, "GAME OVER: no winner after {turns} turns")
            }
            GameEvent::DeckExhausted => f.write_str("GAME OVER: the deck ran out of cards"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub turn: u32,
    #[serde(flatten)]
    pub event: GameEvent,
}

/// Append-only record of everything that happened in a game. This is what
/// decision providers read and what replay tooling consumes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, turn: u32, event: GameEvent) {
        tracing::debug!(turn, "{event}");
        self.entries.push(HistoryEntry { turn, event });
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn events(&self) -> impl Iterator<Item = &GameEvent> {
        self.entries.iter().map(|entry| &entry.event)
    }

    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.entries.iter().map(|entry| entry.event.to_string())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&GameEvent> {
        self.entries.last().map(|entry| &entry.event)
    }
}
