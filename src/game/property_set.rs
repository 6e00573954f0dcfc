use serde::{Deserialize, Serialize};

use crate::game::card::{Card, CardId, CardKind};
use crate::types::{BuildingKind, PropertyColor};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PropertyError {
    #[error("{card} is not a property card")]
    NotAProperty { card: String },
    #[error("{card} cannot be placed in a {color} set")]
    ColorMismatch { card: String, color: PropertyColor },
    #[error("a {building} cannot be added to the {color} set")]
    BuildingRejected {
        building: BuildingKind,
        color: PropertyColor,
    },
}

/// Property cards of one color owned by one player. Wild cards held here are
/// bound to `color` for as long as they stay in the set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySet {
    color: PropertyColor,
    cards: Vec<Card>,
    number_for_full_set: Option<u8>,
    has_house: bool,
    has_hotel: bool,
}

impl PropertySet {
    pub fn new(color: PropertyColor) -> Self {
        Self {
            color,
            cards: Vec::new(),
            number_for_full_set: None,
            has_house: false,
            has_hotel: false,
        }
    }

    pub fn color(&self) -> PropertyColor {
        self.color
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// `None` until a standard property card has been added.
    pub fn number_for_full_set(&self) -> Option<u8> {
        self.number_for_full_set
    }

    pub fn has_house(&self) -> bool {
        self.has_house
    }

    pub fn has_hotel(&self) -> bool {
        self.has_hotel
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.cards.iter().any(|card| card.id == id)
    }

    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    pub fn position_by_name(&self, name: &str) -> Option<usize> {
        self.cards.iter().position(|card| card.name == name)
    }

    /// Places a property card, binding a wild to this set's color. The first
    /// standard property fixes the full-set threshold.
    pub fn insert(&mut self, card: Card) -> Result<(), PropertyError> {
        match &card.kind {
            CardKind::Property { color } => {
                if *color != self.color {
                    return Err(PropertyError::ColorMismatch {
                        card: card.name.clone(),
                        color: self.color,
                    });
                }
                if self.number_for_full_set.is_none() {
                    self.number_for_full_set = Some(self.color.full_set_size());
                }
            }
            CardKind::PropertyWild { colors } => {
                if !colors.contains(&self.color) {
                    return Err(PropertyError::ColorMismatch {
                        card: card.name.clone(),
                        color: self.color,
                    });
                }
            }
            _ => {
                return Err(PropertyError::NotAProperty {
                    card: card.name.clone(),
                });
            }
        }
        self.cards.push(card);
        Ok(())
    }

    /// Removes a card by identity. Emptying the set clears buildings and the
    /// threshold; the owner deletes empty sets.
    pub fn remove(&mut self, id: CardId) -> Option<Card> {
        let position = self.cards.iter().position(|card| card.id == id)?;
        let card = self.cards.remove(position);
        if self.cards.is_empty() {
            self.number_for_full_set = None;
            self.has_house = false;
            self.has_hotel = false;
        }
        Some(card)
    }

    pub fn is_full_set(&self) -> bool {
        match self.number_for_full_set {
            Some(required) => self.cards.len() >= required as usize,
            None => false,
        }
    }

    pub fn can_add_building(&self, building: BuildingKind) -> bool {
        if !self.is_full_set() || !self.color.allows_buildings() {
            return false;
        }
        match building {
            BuildingKind::House => !self.has_house && !self.has_hotel,
            BuildingKind::Hotel => self.has_house && !self.has_hotel,
        }
    }

    pub fn add_building(&mut self, building: BuildingKind) -> Result<(), PropertyError> {
        if !self.can_add_building(building) {
            return Err(PropertyError::BuildingRejected {
                building,
                color: self.color,
            });
        }
        match building {
            BuildingKind::House => self.has_house = true,
            BuildingKind::Hotel => self.has_hotel = true,
        }
        Ok(())
    }

    pub fn rent(&self) -> u32 {
        // Sets made only of any-color wilds have no rent table.
        if self.cards.iter().all(Card::is_rainbow_wild) {
            return 0;
        }
        let table = self.color.rent_values();
        let index = self.cards.len().min(table.len()) - 1;
        let mut rent = table[index];
        if self.has_house {
            rent += BuildingKind::House.rent_bonus();
            if self.has_hotel {
                rent += BuildingKind::Hotel.rent_bonus();
            }
        }
        rent
    }

    pub fn total_value(&self) -> u32 {
        self.cards.iter().map(|card| card.value).sum()
    }

    /// Folds a stolen set into this one. Buildings follow the cards.
    pub fn absorb(&mut self, other: PropertySet) {
        if self.number_for_full_set.is_none() {
            self.number_for_full_set = other.number_for_full_set;
        }
        self.has_house |= other.has_house;
        self.has_hotel |= other.has_hotel;
        self.cards.extend(other.cards);
    }
}
