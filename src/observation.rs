use serde::{Deserialize, Serialize};

use crate::game::card::Card;
use crate::game::players::PlayerState;
use crate::game::property_set::PropertySet;
use crate::game::state::GameState;
use crate::types::PropertyColor;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySetObservation {
    pub color: PropertyColor,
    pub cards: Vec<Card>,
    pub number_for_full_set: Option<u8>,
    pub is_full_set: bool,
    pub has_house: bool,
    pub has_hotel: bool,
    pub rent: u32,
}

impl From<&PropertySet> for PropertySetObservation {
    fn from(set: &PropertySet) -> Self {
        Self {
            color: set.color(),
            cards: set.cards().to_vec(),
            number_for_full_set: set.number_for_full_set(),
            is_full_set: set.is_full_set(),
            has_house: set.has_house(),
            has_hotel: set.has_hotel(),
            rent: set.rent(),
        }
    }
}

/// Public view of one player: hand size only, never hand contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerObservation {
    pub name: String,
    pub hand_count: usize,
    pub bank: Vec<Card>,
    pub bank_value: u32,
    pub property_sets: Vec<PropertySetObservation>,
}

impl PlayerObservation {
    pub fn set(&self, color: PropertyColor) -> Option<&PropertySetObservation> {
        self.property_sets.iter().find(|set| set.color == color)
    }

    pub fn full_set_count(&self) -> usize {
        self.property_sets.iter().filter(|set| set.is_full_set).count()
    }
}

impl From<&PlayerState> for PlayerObservation {
    fn from(player: &PlayerState) -> Self {
        Self {
            name: player.name.clone(),
            hand_count: player.hand.len(),
            bank: player.bank.clone(),
            bank_value: player.bank_value(),
            property_sets: player
                .property_sets
                .values()
                .map(PropertySetObservation::from)
                .collect(),
        }
    }
}

/// Everything one seat may see: all public information plus its own hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub viewer: String,
    pub viewer_index: usize,
    pub current_player: String,
    pub turn: u32,
    pub actions_played: u8,
    pub actions_per_turn: u8,
    pub cards_in_deck: usize,
    pub hand: Vec<Card>,
    pub players: Vec<PlayerObservation>,
}

impl Observation {
    pub fn me(&self) -> Option<&PlayerObservation> {
        self.players.get(self.viewer_index)
    }

    pub fn opponents(&self) -> impl Iterator<Item = &PlayerObservation> {
        self.players
            .iter()
            .enumerate()
            .filter(move |(idx, _)| *idx != self.viewer_index)
            .map(|(_, player)| player)
    }

    pub fn actions_remaining(&self) -> u8 {
        self.actions_per_turn.saturating_sub(self.actions_played)
    }
}

pub fn observation_for(state: &GameState, viewer: usize) -> Observation {
    let current = state
        .players
        .get(state.current_player)
        .map(|player| player.name.clone())
        .unwrap_or_default();
    let (name, hand) = state
        .players
        .get(viewer)
        .map(|player| (player.name.clone(), player.hand.clone()))
        .unwrap_or_default();
    Observation {
        viewer: name,
        viewer_index: viewer,
        current_player: current,
        turn: state.turn,
        actions_played: state.actions_played,
        actions_per_turn: state.config.actions_per_turn,
        cards_in_deck: state.deck.cards_remaining(),
        hand,
        players: state.players.iter().map(PlayerObservation::from).collect(),
    }
}
