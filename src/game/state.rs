use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::game::action::Action;
use crate::game::card::{CardId, CardKind};
use crate::game::deck::{Deck, DeckError};
use crate::game::history::{GameEvent, History};
use crate::game::players::PlayerState;
use crate::game::property_set::{PropertyError, PropertySet};
use crate::game::resolution::{ChargeReason, ContestKind};
use crate::game::rules::{self, RuleViolation, TurnBudget};
use crate::observation::{Observation, observation_for};
use crate::players::{DecisionProvider, RetryPolicy};
use crate::types::{ActionType, CardType, PropertyColor};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 5;

/// Whether a charge that collected nothing from anyone still uses up an
/// action slot. The card is consumed either way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefusedRentPolicy {
    #[default]
    ConsumeSlot,
    RefundSlot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub seed: u64,
    pub initial_hand_size: usize,
    pub max_hand_size: usize,
    pub actions_per_turn: u8,
    pub draws_per_turn: usize,
    pub pass_go_draw_count: usize,
    pub birthday_amount: u32,
    pub debt_collector_amount: u32,
    pub max_turns: u32,
    pub max_decisions_per_turn: u32,
    pub recycle_discards: bool,
    pub end_on_empty_deck: bool,
    pub shuffle_seating: bool,
    pub refused_rent: RefusedRentPolicy,
    pub retry: RetryPolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            initial_hand_size: 5,
            max_hand_size: 7,
            actions_per_turn: 3,
            draws_per_turn: 2,
            pass_go_draw_count: 2,
            birthday_amount: 2,
            debt_collector_amount: 5,
            max_turns: 1000,
            max_decisions_per_turn: 32,
            recycle_discards: false,
            end_on_empty_deck: false,
            shuffle_seating: true,
            refused_rent: RefusedRentPolicy::ConsumeSlot,
            retry: RetryPolicy::default(),
        }
    }
}

impl GameConfig {
    /// Defaults for batch runs: discards are reshuffled into the draw pile
    /// and a deck that still runs dry ends the game without a winner.
    pub fn simulation() -> Self {
        Self {
            recycle_discards: true,
            end_on_empty_deck: true,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Fatal errors. Ordinary illegality is a [`RuleViolation`] and never ends
/// the game; these mean the engine itself is in a state it cannot continue
/// from.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("game already completed")]
    GameFinished,
    #[error("a game needs 2 to 5 players, got {0}")]
    InvalidPlayerCount(usize),
    #[error("player names must be unique, {0} appears more than once")]
    DuplicateName(String),
    #[error("invalid player index {0}")]
    InvalidPlayer(usize),
    #[error("no player named {0}")]
    UnknownPlayer(String),
    #[error("referenced property {0} could not be found")]
    PropertyNotFound(String),
    #[error("{player} holds {hand} cards after discarding, expected {max}")]
    HandLimit {
        player: String,
        hand: usize,
        max: usize,
    },
    #[error("invariant violated: {0}")]
    Invariant(String),
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error(transparent)]
    Property(#[from] PropertyError),
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub players: Vec<PlayerState>,
    pub deck: Deck,
    pub current_player: usize,
    pub turn: u32,
    pub actions_played: u8,
    pub history: History,
}

impl GameState {
    /// Seats players in the given order and deals opening hands.
    pub fn new(config: GameConfig, names: Vec<String>, deck: Deck) -> Result<Self, GameError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&names.len()) {
            return Err(GameError::InvalidPlayerCount(names.len()));
        }
        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(GameError::DuplicateName(name.clone()));
            }
        }

        let deck = deck.with_recycling(config.recycle_discards);
        let mut state = Self {
            players: names.iter().map(PlayerState::new).collect(),
            config,
            deck,
            current_player: 0,
            turn: 0,
            actions_played: 0,
            history: History::new(),
        };
        state.record(GameEvent::PlayOrder { players: names });
        for player in 0..state.players.len() {
            for _ in 0..state.config.initial_hand_size {
                let card = state.deck.draw_card()?;
                state.players[player].hand.push(card);
            }
        }
        Ok(state)
    }

    pub fn record(&mut self, event: GameEvent) {
        self.history.record(self.turn, event);
    }

    pub fn player_index(&self, name: &str) -> Option<usize> {
        self.players.iter().position(|player| player.name == name)
    }

    pub fn player_name(&self, index: usize) -> String {
        self.players
            .get(index)
            .map(|player| player.name.clone())
            .unwrap_or_default()
    }

    pub fn observation(&self, viewer: usize) -> Observation {
        observation_for(self, viewer)
    }

    pub fn budget(&self) -> TurnBudget {
        TurnBudget {
            played: self.actions_played,
            limit: self.config.actions_per_turn,
        }
    }

    /// Overwrites the provider-supplied card type with the real one so cost
    /// and field rules follow the card actually referenced.
    pub fn canonicalize(&self, mut action: Action) -> Action {
        if let (Some(card_id), Some(player)) = (action.card, self.players.get(action.player_index)) {
            if let Some(card) = player.owned_card(card_id) {
                action.card_type = Some(card.card_type());
            }
        }
        action
    }

    /// Looks up named targets, then runs the validator for the current
    /// player.
    pub fn validate_action(&self, action: &Action) -> Result<(), RuleViolation> {
        if action.player_index != self.current_player {
            return Err(RuleViolation::WrongPlayer {
                expected: self.current_player,
                actual: action.player_index,
            });
        }
        let targets = action
            .targets
            .iter()
            .map(|name| {
                self.player_index(name)
                    .map(|idx| &self.players[idx])
                    .ok_or_else(|| RuleViolation::UnknownTarget(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        rules::validate(
            action,
            &self.players[self.current_player],
            &targets,
            self.budget(),
        )
    }

    pub fn draw_cards(&mut self, player: usize, count: usize) -> Result<usize, GameError> {
        for _ in 0..count {
            let card = self.deck.draw_card()?;
            self.players[player].hand.push(card);
        }
        Ok(self.players[player].hand.len())
    }

    /// Applies an already validated action. Returns whether the action had
    /// its intended effect; a cancelled or unpaid charge is `Ok(false)`.
    pub fn execute<P: DecisionProvider>(
        &mut self,
        providers: &mut [P],
        action: &Action,
    ) -> Result<bool, GameError> {
        let player = action.player_index;
        if player >= self.players.len() {
            return Err(GameError::InvalidPlayer(player));
        }
        let card_id = action
            .card
            .ok_or_else(|| GameError::Invariant(format!("{} has no card to execute", action.action_type)))?;

        if action.action_type == ActionType::MoveProperty {
            return self.move_property(player, card_id, action.target_color);
        }

        let card = self.players[player]
            .take_from_hand(card_id)
            .ok_or_else(|| GameError::Invariant(format!("validated card {card_id} left the hand")))?;
        let player_name = self.player_name(player);
        match action.action_type {
            ActionType::AddToBank => {
                self.record(GameEvent::Banked {
                    player: player_name,
                    card: card.name.clone(),
                    value: card.value,
                });
                self.players[player].bank.push(card);
                Ok(true)
            }
            ActionType::AddToProperties => {
                let color = required_color(action.target_color, "ADD_TO_PROPERTIES")?;
                self.record(GameEvent::PropertyPlaced {
                    player: player_name,
                    card: card.name.clone(),
                    color,
                });
                self.players[player].place_property(card, color)?;
                Ok(true)
            }
            ActionType::PlayAction => {
                let kind = card.kind.clone();
                self.deck.discard_card(card);
                self.play_action_card(providers, action, &kind)
            }
            ActionType::Pass | ActionType::MoveProperty => Err(GameError::Invariant(format!(
                "{} reached card execution",
                action.action_type
            ))),
        }
    }

    fn move_property(
        &mut self,
        player: usize,
        card_id: CardId,
        target: Option<PropertyColor>,
    ) -> Result<bool, GameError> {
        let to = required_color(target, "MOVE_PROPERTY")?;
        let (from, card) = self.players[player]
            .take_property(card_id)
            .ok_or_else(|| GameError::PropertyNotFound(card_id.to_string()))?;
        let event = GameEvent::PropertyMoved {
            player: self.player_name(player),
            card: card.name.clone(),
            from,
            to,
        };
        self.players[player].place_property(card, to)?;
        self.record(event);
        Ok(true)
    }

    fn play_action_card<P: DecisionProvider>(
        &mut self,
        providers: &mut [P],
        action: &Action,
        kind: &CardKind,
    ) -> Result<bool, GameError> {
        let player = action.player_index;
        match kind {
            CardKind::Rent { wild, .. } => self.play_rent(providers, action, *wild),
            CardKind::Building { building } => {
                let color = required_color(action.target_color, "BUILDING")?;
                self.players[player]
                    .property_sets
                    .get_mut(&color)
                    .ok_or_else(|| GameError::PropertyNotFound(format!("{color} set")))?
                    .add_building(*building)?;
                self.record(GameEvent::BuildingAdded {
                    player: self.player_name(player),
                    building: *building,
                    color,
                });
                Ok(true)
            }
            CardKind::PassGo => {
                let drawn = self.config.pass_go_draw_count;
                let hand_size = self.draw_cards(player, drawn)?;
                self.record(GameEvent::PassGo {
                    player: self.player_name(player),
                    drawn,
                    hand_size,
                });
                Ok(true)
            }
            CardKind::Birthday => {
                let amount = self.config.birthday_amount;
                self.charge_everyone(providers, player, amount, &ChargeReason::Birthday)
            }
            CardKind::DebtCollector => {
                let target = self.target_index(action)?;
                let amount = self.config.debt_collector_amount;
                self.charge(providers, player, target, amount, &ChargeReason::DebtCollector)
            }
            CardKind::DealBreaker => self.play_deal_breaker(providers, action),
            CardKind::SlyDeal => self.play_sly_deal(providers, action),
            CardKind::ForcedDeal => self.play_forced_deal(providers, action),
            CardKind::Money
            | CardKind::Property { .. }
            | CardKind::PropertyWild { .. }
            | CardKind::DoubleTheRent
            | CardKind::JustSayNo => Err(GameError::Invariant(format!(
                "{} cannot be executed as an action",
                kind.card_type()
            ))),
        }
    }

    fn play_rent<P: DecisionProvider>(
        &mut self,
        providers: &mut [P],
        action: &Action,
        wild: bool,
    ) -> Result<bool, GameError> {
        let player = action.player_index;
        let color = action
            .rent_color
            .ok_or_else(|| GameError::Invariant("rent without a rent color".into()))?;
        let base = self.players[player]
            .property_sets
            .get(&color)
            .map(PropertySet::rent)
            .ok_or_else(|| GameError::PropertyNotFound(format!("{color} set")))?;

        let doubled = action.double_rent_count;
        for _ in 0..doubled {
            let card = self.players[player]
                .take_first_of(CardType::DoubleTheRent)
                .ok_or_else(|| GameError::Invariant("Double The Rent card missing".into()))?;
            self.deck.discard_card(card);
        }
        let amount = base.saturating_mul(2u32.saturating_pow(doubled as u32));
        self.record(GameEvent::RentCharged {
            player: self.player_name(player),
            color,
            amount,
            doubled,
        });

        let reason = ChargeReason::Rent(color);
        if wild {
            let target = self.target_index(action)?;
            self.charge(providers, player, target, amount, &reason)
        } else {
            self.charge_everyone(providers, player, amount, &reason)
        }
    }

    /// Charges every other player independently; succeeds if anyone paid.
    fn charge_everyone<P: DecisionProvider>(
        &mut self,
        providers: &mut [P],
        collector: usize,
        amount: u32,
        reason: &ChargeReason,
    ) -> Result<bool, GameError> {
        let payers: Vec<usize> = (0..self.players.len())
            .filter(|idx| *idx != collector)
            .collect();
        let mut any_paid = false;
        for payer in payers {
            if self.charge(providers, collector, payer, amount, reason)? {
                any_paid = true;
            }
        }
        Ok(any_paid)
    }

    fn play_deal_breaker<P: DecisionProvider>(
        &mut self,
        providers: &mut [P],
        action: &Action,
    ) -> Result<bool, GameError> {
        let player = action.player_index;
        let target = self.target_index(action)?;
        let color = required_color(action.target_color, "DEAL_BREAKER")?;
        let description = format!("Deal Breaker: take the full {color} set");
        if self
            .negotiate(providers, player, target, ContestKind::DealBreaker, None, description)?
            .cancelled()
        {
            self.record_cancelled(player, target, "Deal Breaker");
            return Ok(false);
        }
        let set = self.players[target].take_set(color).ok_or_else(|| {
            GameError::PropertyNotFound(format!("{color} set of {}", self.players[target].name))
        })?;
        self.players[player].absorb_set(set);
        self.record(GameEvent::SetStolen {
            thief: self.player_name(player),
            victim: self.player_name(target),
            color,
        });
        Ok(true)
    }

    fn play_sly_deal<P: DecisionProvider>(
        &mut self,
        providers: &mut [P],
        action: &Action,
    ) -> Result<bool, GameError> {
        let player = action.player_index;
        let target = self.target_index(action)?;
        let reference = action
            .target_property
            .as_ref()
            .ok_or_else(|| GameError::Invariant("Sly Deal without a target property".into()))?;
        let description = format!("Sly Deal: take {reference}");
        if self
            .negotiate(providers, player, target, ContestKind::SlyDeal, None, description)?
            .cancelled()
        {
            self.record_cancelled(player, target, "Sly Deal");
            return Ok(false);
        }
        let resolved = self.players[target]
            .resolve_property(reference)
            .ok_or_else(|| GameError::PropertyNotFound(reference.to_string()))?;
        let (color, card) = self.players[target]
            .take_property(resolved.card)
            .ok_or_else(|| GameError::PropertyNotFound(reference.to_string()))?;
        let event = GameEvent::PropertyStolen {
            thief: self.player_name(player),
            victim: self.player_name(target),
            card: card.name.clone(),
        };
        self.players[player].place_property(card, color)?;
        self.record(event);
        Ok(true)
    }

    fn play_forced_deal<P: DecisionProvider>(
        &mut self,
        providers: &mut [P],
        action: &Action,
    ) -> Result<bool, GameError> {
        let player = action.player_index;
        let target = self.target_index(action)?;
        let (wanted, offered) = match (&action.target_property, &action.source_property) {
            (Some(wanted), Some(offered)) => (wanted, offered),
            _ => {
                return Err(GameError::Invariant(
                    "Forced Deal without both property references".into(),
                ));
            }
        };
        let description = format!("Forced Deal: swap {offered} for {wanted}");
        if self
            .negotiate(providers, player, target, ContestKind::ForcedDeal, None, description)?
            .cancelled()
        {
            self.record_cancelled(player, target, "Forced Deal");
            return Ok(false);
        }

        let given_ref = self.players[player]
            .resolve_property(offered)
            .ok_or_else(|| GameError::PropertyNotFound(offered.to_string()))?;
        let received_ref = self.players[target]
            .resolve_property(wanted)
            .ok_or_else(|| GameError::PropertyNotFound(wanted.to_string()))?;
        let (given_color, given) = self.players[player]
            .take_property(given_ref.card)
            .ok_or_else(|| GameError::PropertyNotFound(offered.to_string()))?;
        let (received_color, received) = self.players[target]
            .take_property(received_ref.card)
            .ok_or_else(|| GameError::PropertyNotFound(wanted.to_string()))?;

        let event = GameEvent::PropertiesSwapped {
            player: self.player_name(player),
            target: self.player_name(target),
            given: given.name.clone(),
            received: received.name.clone(),
        };
        self.players[target].place_property(given, given_color)?;
        self.players[player].place_property(received, received_color)?;
        self.record(event);
        Ok(true)
    }

    fn record_cancelled(&mut self, player: usize, victim: usize, action: &str) {
        self.record(GameEvent::ActionCancelled {
            player: self.player_name(player),
            victim: self.player_name(victim),
            action: action.to_string(),
        });
    }

    fn target_index(&self, action: &Action) -> Result<usize, GameError> {
        let name = action
            .targets
            .first()
            .ok_or_else(|| GameError::Invariant(format!("{action} has no target player")))?;
        self.player_index(name)
            .ok_or_else(|| GameError::UnknownPlayer(name.clone()))
    }
}

fn required_color(color: Option<PropertyColor>, label: &str) -> Result<PropertyColor, GameError> {
    color.ok_or_else(|| GameError::Invariant(format!("{label} without a target color")))
}
