use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{BuildingKind, CardType, PropertyColor};

/// Instance identity of a physical card. Two "$1M" cards share a name and a
/// value but never an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u32);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardKind {
    Money,
    Property { color: PropertyColor },
    /// Eligible colors only. The color a placed wild is bound to is the key of
    /// the property set holding it.
    PropertyWild { colors: Vec<PropertyColor> },
    Rent { colors: Vec<PropertyColor>, wild: bool },
    Building { building: BuildingKind },
    DoubleTheRent,
    JustSayNo,
    PassGo,
    Birthday,
    DebtCollector,
    DealBreaker,
    SlyDeal,
    ForcedDeal,
}

impl CardKind {
    /// Kinds that carry no payload, keyed by their tag.
    pub fn simple(card_type: CardType) -> Option<CardKind> {
        let kind = match card_type {
            CardType::Money => CardKind::Money,
            CardType::DoubleTheRent => CardKind::DoubleTheRent,
            CardType::JustSayNo => CardKind::JustSayNo,
            CardType::PassGo => CardKind::PassGo,
            CardType::Birthday => CardKind::Birthday,
            CardType::DebtCollector => CardKind::DebtCollector,
            CardType::DealBreaker => CardKind::DealBreaker,
            CardType::SlyDeal => CardKind::SlyDeal,
            CardType::ForcedDeal => CardKind::ForcedDeal,
            CardType::Property | CardType::PropertyWild | CardType::Rent | CardType::Building => {
                return None;
            }
        };
        Some(kind)
    }

    pub fn card_type(&self) -> CardType {
        match self {
            CardKind::Money => CardType::Money,
            CardKind::Property { .. } => CardType::Property,
            CardKind::PropertyWild { .. } => CardType::PropertyWild,
            CardKind::Rent { .. } => CardType::Rent,
            CardKind::Building { .. } => CardType::Building,
            CardKind::DoubleTheRent => CardType::DoubleTheRent,
            CardKind::JustSayNo => CardType::JustSayNo,
            CardKind::PassGo => CardType::PassGo,
            CardKind::Birthday => CardType::Birthday,
            CardKind::DebtCollector => CardType::DebtCollector,
            CardKind::DealBreaker => CardType::DealBreaker,
            CardKind::SlyDeal => CardType::SlyDeal,
            CardKind::ForcedDeal => CardType::ForcedDeal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    pub value: u32,
    pub kind: CardKind,
}

impl Card {
    pub fn new(id: CardId, name: impl Into<String>, value: u32, kind: CardKind) -> Self {
        Self {
            id,
            name: name.into(),
            value,
            kind,
        }
    }

    pub fn card_type(&self) -> CardType {
        self.kind.card_type()
    }

    /// Wild property cards cannot be banked; everything else has a cash value.
    pub fn can_bank(&self) -> bool {
        !matches!(self.kind, CardKind::PropertyWild { .. })
    }

    pub fn is_property(&self) -> bool {
        matches!(
            self.kind,
            CardKind::Property { .. } | CardKind::PropertyWild { .. }
        )
    }

    pub fn is_just_say_no(&self) -> bool {
        matches!(self.kind, CardKind::JustSayNo)
    }

    /// Whether this card may sit in a set of `color`.
    pub fn fits_color(&self, color: PropertyColor) -> bool {
        match &self.kind {
            CardKind::Property { color: own } => *own == color,
            CardKind::PropertyWild { colors } => colors.contains(&color),
            _ => false,
        }
    }

    /// A wild eligible for every color is worth nothing and carries no rent
    /// table of its own.
    pub fn is_rainbow_wild(&self) -> bool {
        match &self.kind {
            CardKind::PropertyWild { colors } => colors.len() == PropertyColor::ALL.len(),
            _ => false,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, ${}M)", self.name, self.id, self.value)
    }
}
