//! Shared fixtures: hand-built cards, a scripted decision provider, and
//! helpers that seat players around an unshuffled deck.

#![allow(dead_code)]

use std::collections::VecDeque;

use dealbench::game::{
    Action, Card, CardId, CardKind, Deck, Game, GameConfig, GameState, History, PaymentItem,
    PaymentRequest, PendingAction,
};
use dealbench::observation::Observation;
use dealbench::players::candidates::{just_say_no, plan_payment};
use dealbench::players::{DecisionProvider, ProviderError};
use dealbench::types::{BuildingKind, PropertyColor};

// =============================================================================
// Cards
// =============================================================================

pub fn money(id: u32, value: u32) -> Card {
    Card::new(CardId(id), format!("${value}M"), value, CardKind::Money)
}

pub fn property(id: u32, name: &str, color: PropertyColor) -> Card {
    Card::new(CardId(id), name, 2, CardKind::Property { color })
}

pub fn wild(id: u32, colors: &[PropertyColor]) -> Card {
    let name = colors
        .iter()
        .map(|color| color.to_string())
        .collect::<Vec<_>>()
        .join("/");
    Card::new(
        CardId(id),
        format!("Wild {name}"),
        2,
        CardKind::PropertyWild {
            colors: colors.to_vec(),
        },
    )
}

pub fn rainbow(id: u32) -> Card {
    Card::new(
        CardId(id),
        "Wild Any Color",
        0,
        CardKind::PropertyWild {
            colors: PropertyColor::ALL.to_vec(),
        },
    )
}

pub fn rent(id: u32, colors: &[PropertyColor]) -> Card {
    Card::new(
        CardId(id),
        "Rent",
        1,
        CardKind::Rent {
            colors: colors.to_vec(),
            wild: false,
        },
    )
}

pub fn wild_rent(id: u32) -> Card {
    Card::new(
        CardId(id),
        "Wild Rent",
        3,
        CardKind::Rent {
            colors: PropertyColor::ALL.to_vec(),
            wild: true,
        },
    )
}

pub fn building(id: u32, building: BuildingKind) -> Card {
    Card::new(CardId(id), building.to_string(), 3, CardKind::Building { building })
}

pub fn action_card(id: u32, name: &str, kind: CardKind) -> Card {
    Card::new(CardId(id), name, 3, kind)
}

pub fn just_say_no_card(id: u32) -> Card {
    action_card(id, "Just Say No", CardKind::JustSayNo)
}

pub fn double_rent(id: u32) -> Card {
    Card::new(CardId(id), "Double The Rent", 1, CardKind::DoubleTheRent)
}

/// `count` $1M cards starting at id `first`.
pub fn filler(first: u32, count: u32) -> Vec<Card> {
    (first..first + count).map(|id| money(id, 1)).collect()
}

/// The two Brown properties; placing both completes the set.
pub fn brown_pair(first: u32) -> [Card; 2] {
    [
        property(first, "Mediterranean Avenue", PropertyColor::Brown),
        property(first + 1, "Baltic Avenue", PropertyColor::Brown),
    ]
}

pub fn dark_blue_pair(first: u32) -> [Card; 2] {
    [
        property(first, "Park Place", PropertyColor::DarkBlue),
        property(first + 1, "Boardwalk", PropertyColor::DarkBlue),
    ]
}

pub fn utility_pair(first: u32) -> [Card; 2] {
    [
        property(first, "Electric Company", PropertyColor::Utility),
        property(first + 1, "Water Works", PropertyColor::Utility),
    ]
}

// =============================================================================
// Scripted provider
// =============================================================================

/// Plays back queued answers. When a queue runs dry it passes, discards
/// from the front of the hand, pays cheapest-first, and declines to negate
/// (or negates whenever possible if `always_negate` is set).
#[derive(Debug, Clone, Default)]
pub struct ScriptedPlayer {
    pub name: String,
    pub actions: VecDeque<Result<Action, ProviderError>>,
    pub discards: VecDeque<Vec<CardId>>,
    pub payments: VecDeque<Vec<PaymentItem>>,
    pub negations: VecDeque<Option<Action>>,
    pub always_negate: bool,
    pub pending_seen: Vec<PendingAction>,
    pub payment_requests: Vec<PaymentRequest>,
}

impl ScriptedPlayer {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_actions(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.actions.extend(actions.into_iter().map(Ok));
        self
    }

    pub fn negating(mut self) -> Self {
        self.always_negate = true;
        self
    }
}

impl DecisionProvider for ScriptedPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_action(
        &mut self,
        observation: &Observation,
        _history: &History,
    ) -> Result<Action, ProviderError> {
        self.actions
            .pop_front()
            .unwrap_or_else(|| Ok(Action::pass(observation.viewer_index)))
    }

    fn choose_discards(
        &mut self,
        count: usize,
        observation: &Observation,
        _history: &History,
    ) -> Result<Vec<CardId>, ProviderError> {
        Ok(self.discards.pop_front().unwrap_or_else(|| {
            observation.hand.iter().take(count).map(|card| card.id).collect()
        }))
    }

    fn provide_payment(
        &mut self,
        request: &PaymentRequest,
        observation: &Observation,
        _history: &History,
    ) -> Result<Vec<PaymentItem>, ProviderError> {
        self.payment_requests.push(request.clone());
        Ok(self
            .payments
            .pop_front()
            .unwrap_or_else(|| plan_payment(observation, request.amount)))
    }

    fn wants_to_negate(
        &mut self,
        pending: &PendingAction,
        observation: &Observation,
        _history: &History,
    ) -> Result<Option<Action>, ProviderError> {
        self.pending_seen.push(pending.clone());
        if let Some(response) = self.negations.pop_front() {
            return Ok(response);
        }
        if self.always_negate {
            return Ok(just_say_no(observation, &pending.opponent));
        }
        Ok(None)
    }
}

// =============================================================================
// Setup
// =============================================================================

/// Deterministic config: fixed seating, empty opening hands.
pub fn test_config() -> GameConfig {
    GameConfig {
        initial_hand_size: 0,
        shuffle_seating: false,
        ..GameConfig::default()
    }
}

pub fn state_for(names: &[&str], draw_pile: Vec<Card>) -> GameState {
    let names = names.iter().map(|name| name.to_string()).collect();
    match GameState::new(test_config(), names, Deck::stacked(draw_pile)) {
        Ok(state) => state,
        Err(err) => panic!("test state setup failed: {err}"),
    }
}

pub fn game_for(
    config: GameConfig,
    providers: Vec<ScriptedPlayer>,
    draw_pile: Vec<Card>,
) -> Game<ScriptedPlayer> {
    match Game::with_deck(config, providers, Deck::stacked(draw_pile)) {
        Ok(game) => game,
        Err(err) => panic!("test game setup failed: {err}"),
    }
}

pub fn place(state: &mut GameState, player: usize, cards: impl IntoIterator<Item = Card>, color: PropertyColor) {
    for card in cards {
        if let Err(err) = state.players[player].place_property(card, color) {
            panic!("fixture placement failed: {err}");
        }
    }
}

pub fn lines(state: &GameState) -> Vec<String> {
    state.history.lines().collect()
}
