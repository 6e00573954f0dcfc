use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::game::action::PropertyRef;
use crate::game::card::{Card, CardId};
use crate::game::property_set::{PropertyError, PropertySet};
use crate::types::{CardType, PaymentSource, PropertyColor};

pub const SETS_TO_WIN: usize = 3;

/// Internal address of a placed property card, produced from a name/color
/// reference by [`PlayerState::resolve_property`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedProperty {
    pub color: PropertyColor,
    pub index: usize,
    pub card: CardId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub name: String,
    pub hand: Vec<Card>,
    pub bank: Vec<Card>,
    pub property_sets: BTreeMap<PropertyColor, PropertySet>,
}

impl PlayerState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hand: Vec::new(),
            bank: Vec::new(),
            property_sets: BTreeMap::new(),
        }
    }

    pub fn hand_card(&self, id: CardId) -> Option<&Card> {
        self.hand.iter().find(|card| card.id == id)
    }

    pub fn take_from_hand(&mut self, id: CardId) -> Option<Card> {
        let position = self.hand.iter().position(|card| card.id == id)?;
        Some(self.hand.remove(position))
    }

    /// Removes the first hand card of the given type.
    pub fn take_first_of(&mut self, card_type: CardType) -> Option<Card> {
        let position = self
            .hand
            .iter()
            .position(|card| card.card_type() == card_type)?;
        Some(self.hand.remove(position))
    }

    pub fn count_in_hand(&self, card_type: CardType) -> usize {
        self.hand
            .iter()
            .filter(|card| card.card_type() == card_type)
            .count()
    }

    pub fn holds_just_say_no(&self) -> bool {
        self.hand.iter().any(Card::is_just_say_no)
    }

    pub fn bank_card(&self, id: CardId) -> Option<&Card> {
        self.bank.iter().find(|card| card.id == id)
    }

    pub fn take_from_bank(&mut self, id: CardId) -> Option<Card> {
        let position = self.bank.iter().position(|card| card.id == id)?;
        Some(self.bank.remove(position))
    }

    pub fn bank_value(&self) -> u32 {
        self.bank.iter().map(|card| card.value).sum()
    }

    pub fn property_value(&self) -> u32 {
        self.property_sets.values().map(PropertySet::total_value).sum()
    }

    /// Everything that can be surrendered as payment.
    pub fn total_assets(&self) -> u32 {
        self.bank_value() + self.property_value()
    }

    pub fn asset_count(&self) -> usize {
        self.bank.len() + self.property_sets.values().map(PropertySet::len).sum::<usize>()
    }

    pub fn property_card(&self, id: CardId) -> Option<&Card> {
        self.property_sets.values().find_map(|set| set.get(id))
    }

    pub fn property_color_of(&self, id: CardId) -> Option<PropertyColor> {
        self.property_sets
            .values()
            .find(|set| set.contains(id))
            .map(PropertySet::color)
    }

    /// Card held anywhere the player owns it.
    pub fn owned_card(&self, id: CardId) -> Option<&Card> {
        self.hand_card(id)
            .or_else(|| self.bank_card(id))
            .or_else(|| self.property_card(id))
    }

    pub fn asset(&self, id: CardId, source: PaymentSource) -> Option<&Card> {
        match source {
            PaymentSource::Bank => self.bank_card(id),
            PaymentSource::Properties => self.property_card(id),
            PaymentSource::Hand => None,
        }
    }

    pub fn take_asset(&mut self, id: CardId, source: PaymentSource) -> Option<Card> {
        match source {
            PaymentSource::Bank => self.take_from_bank(id),
            PaymentSource::Properties => self.take_property(id).map(|(_, card)| card),
            PaymentSource::Hand => None,
        }
    }

    /// Inserts into the set for `color`, creating it on first placement.
    pub fn place_property(&mut self, card: Card, color: PropertyColor) -> Result<(), PropertyError> {
        let set = self
            .property_sets
            .entry(color)
            .or_insert_with(|| PropertySet::new(color));
        let result = set.insert(card);
        if set.is_empty() {
            self.property_sets.remove(&color);
        }
        result
    }

    /// Removes a placed card, deleting its set if it empties.
    pub fn take_property(&mut self, id: CardId) -> Option<(PropertyColor, Card)> {
        let color = self.property_color_of(id)?;
        let set = self.property_sets.get_mut(&color)?;
        let card = set.remove(id)?;
        if set.is_empty() {
            self.property_sets.remove(&color);
        }
        Some((color, card))
    }

    pub fn take_set(&mut self, color: PropertyColor) -> Option<PropertySet> {
        self.property_sets.remove(&color)
    }

    pub fn absorb_set(&mut self, set: PropertySet) {
        let color = set.color();
        match self.property_sets.get_mut(&color) {
            Some(existing) => existing.absorb(set),
            None => {
                self.property_sets.insert(color, set);
            }
        }
    }

    pub fn resolve_property(&self, reference: &PropertyRef) -> Option<ResolvedProperty> {
        let set = self.property_sets.get(&reference.color)?;
        let index = set.position_by_name(&reference.name)?;
        Some(ResolvedProperty {
            color: reference.color,
            index,
            card: set.cards()[index].id,
        })
    }

    pub fn full_set_count(&self) -> usize {
        self.property_sets
            .values()
            .filter(|set| set.is_full_set())
            .count()
    }

    pub fn has_won(&self) -> bool {
        self.full_set_count() >= SETS_TO_WIN
    }
}
