use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyColor {
    Brown,
    LightBlue,
    Pink,
    Orange,
    Red,
    Yellow,
    Green,
    DarkBlue,
    Railroad,
    Utility,
}

impl PropertyColor {
    pub const ALL: [PropertyColor; 10] = [
        PropertyColor::Brown,
        PropertyColor::LightBlue,
        PropertyColor::Pink,
        PropertyColor::Orange,
        PropertyColor::Red,
        PropertyColor::Yellow,
        PropertyColor::Green,
        PropertyColor::DarkBlue,
        PropertyColor::Railroad,
        PropertyColor::Utility,
    ];

    /// Rent owed for 1, 2, ... cards in a set of this color. The table length
    /// is also the number of cards needed for a full set.
    pub fn rent_values(self) -> &'static [u32] {
        match self {
            PropertyColor::Brown => &[1, 2],
            PropertyColor::LightBlue => &[1, 2, 3],
            PropertyColor::Pink => &[1, 2, 4],
            PropertyColor::Orange => &[1, 3, 5],
            PropertyColor::Red => &[2, 3, 6],
            PropertyColor::Yellow => &[2, 4, 6],
            PropertyColor::Green => &[2, 4, 7],
            PropertyColor::DarkBlue => &[3, 8],
            PropertyColor::Railroad => &[1, 2, 3, 4],
            PropertyColor::Utility => &[1, 2],
        }
    }

    pub fn full_set_size(self) -> u8 {
        self.rent_values().len() as u8
    }

    pub fn allows_buildings(self) -> bool {
        !matches!(self, PropertyColor::Railroad | PropertyColor::Utility)
    }
}

/// Flat tag for a card variant, used on the wire and in observations where
/// the full `CardKind` payload is not needed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardType {
    Money,
    Property,
    PropertyWild,
    Rent,
    Building,
    DoubleTheRent,
    JustSayNo,
    PassGo,
    Birthday,
    DebtCollector,
    DealBreaker,
    SlyDeal,
    ForcedDeal,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildingKind {
    House,
    Hotel,
}

impl BuildingKind {
    pub fn rent_bonus(self) -> u32 {
        match self {
            BuildingKind::House => 3,
            BuildingKind::Hotel => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    AddToBank,
    AddToProperties,
    MoveProperty,
    PlayAction,
    Pass,
}

/// Where a payment card is taken from. `Hand` exists so that a provider can
/// name it; the validator always rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentSource {
    Bank,
    Properties,
    Hand,
}
