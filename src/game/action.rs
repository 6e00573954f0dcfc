use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::card::{Card, CardId};
use crate::types::{ActionType, CardType, PropertyColor};

/// Name/color reference to a placed property card, as a decision provider
/// names it. Resolved against a player's sets before use.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyRef {
    pub name: String,
    pub color: PropertyColor,
}

impl PropertyRef {
    pub fn new(name: impl Into<String>, color: PropertyColor) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

impl fmt::Display for PropertyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.color)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Fields {
    targets: bool,
    target_color: bool,
    rent_color: bool,
    double_rent: bool,
    target_property: bool,
    source_property: bool,
}

impl Fields {
    fn for_action(action_type: ActionType, card_type: Option<CardType>) -> Self {
        let none = Fields::default();
        match (action_type, card_type) {
            (ActionType::AddToProperties | ActionType::MoveProperty, _) => Fields {
                target_color: true,
                ..none
            },
            (ActionType::PlayAction, Some(card_type)) => match card_type {
                CardType::Rent => Fields {
                    targets: true,
                    rent_color: true,
                    double_rent: true,
                    ..none
                },
                CardType::Building => Fields {
                    target_color: true,
                    ..none
                },
                CardType::DebtCollector | CardType::JustSayNo => Fields {
                    targets: true,
                    ..none
                },
                CardType::DealBreaker => Fields {
                    targets: true,
                    target_color: true,
                    ..none
                },
                CardType::SlyDeal => Fields {
                    targets: true,
                    target_property: true,
                    ..none
                },
                CardType::ForcedDeal => Fields {
                    targets: true,
                    target_property: true,
                    source_property: true,
                    ..none
                },
                _ => none,
            },
            _ => none,
        }
    }
}

/// One candidate move. Fields that do not apply to the action's type and
/// card are dropped by the builder methods, so e.g. an `AddToBank` action
/// never carries a target color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub player_index: usize,
    pub action_type: ActionType,
    pub card: Option<CardId>,
    pub card_type: Option<CardType>,
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default)]
    pub target_color: Option<PropertyColor>,
    #[serde(default)]
    pub rent_color: Option<PropertyColor>,
    #[serde(default)]
    pub double_rent_count: u8,
    #[serde(default)]
    pub target_property: Option<PropertyRef>,
    #[serde(default)]
    pub source_property: Option<PropertyRef>,
}

impl Action {
    pub fn pass(player_index: usize) -> Self {
        Self {
            player_index,
            action_type: ActionType::Pass,
            card: None,
            card_type: None,
            targets: Vec::new(),
            target_color: None,
            rent_color: None,
            double_rent_count: 0,
            target_property: None,
            source_property: None,
        }
    }

    pub fn new(player_index: usize, action_type: ActionType, card: &Card) -> Self {
        if action_type == ActionType::Pass {
            return Self::pass(player_index);
        }
        Self {
            card: Some(card.id),
            card_type: Some(card.card_type()),
            action_type,
            ..Self::pass(player_index)
        }
    }

    fn fields(&self) -> Fields {
        Fields::for_action(self.action_type, self.card_type)
    }

    pub fn with_targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.fields().targets {
            self.targets = targets.into_iter().map(Into::into).collect();
        }
        self
    }

    pub fn with_target(self, target: impl Into<String>) -> Self {
        self.with_targets([target.into()])
    }

    pub fn with_target_color(mut self, color: PropertyColor) -> Self {
        if self.fields().target_color {
            self.target_color = Some(color);
        }
        self
    }

    pub fn with_rent_color(mut self, color: PropertyColor) -> Self {
        if self.fields().rent_color {
            self.rent_color = Some(color);
        }
        self
    }

    pub fn with_double_rent(mut self, count: u8) -> Self {
        if self.fields().double_rent {
            self.double_rent_count = count;
        }
        self
    }

    pub fn with_target_property(mut self, reference: PropertyRef) -> Self {
        if self.fields().target_property {
            self.target_property = Some(reference);
        }
        self
    }

    pub fn with_source_property(mut self, reference: PropertyRef) -> Self {
        if self.fields().source_property {
            self.source_property = Some(reference);
        }
        self
    }

    /// Clears every field the action's type does not use. Applied to actions
    /// that arrive already assembled, e.g. deserialized from a provider.
    pub fn normalized(mut self) -> Self {
        if self.action_type == ActionType::Pass {
            return Self::pass(self.player_index);
        }
        let fields = self.fields();
        if !fields.targets {
            self.targets.clear();
        }
        if !fields.target_color {
            self.target_color = None;
        }
        if !fields.rent_color {
            self.rent_color = None;
        }
        if !fields.double_rent {
            self.double_rent_count = 0;
        }
        if !fields.target_property {
            self.target_property = None;
        }
        if !fields.source_property {
            self.source_property = None;
        }
        self
    }

    pub fn is_pass(&self) -> bool {
        self.action_type == ActionType::Pass
    }

    /// Budget slots consumed: moving a wild is free, each Double The Rent
    /// stacked on a rent card costs one more.
    pub fn action_cost(&self) -> u8 {
        match self.action_type {
            ActionType::Pass | ActionType::MoveProperty => 0,
            ActionType::PlayAction if self.card_type == Some(CardType::Rent) => {
                self.double_rent_count.saturating_add(1)
            }
            _ => 1,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.action_type)?;
        if let Some(card) = self.card {
            write!(f, " card={card}")?;
        }
        if !self.targets.is_empty() {
            write!(f, " targets=[{}]", self.targets.join(","))?;
        }
        if let Some(color) = self.target_color {
            write!(f, " color={color}")?;
        }
        if let Some(color) = self.rent_color {
            write!(f, " rent={color}")?;
        }
        if self.double_rent_count > 0 {
            write!(f, " x2^{}", self.double_rent_count)?;
        }
        if let Some(reference) = &self.target_property {
            write!(f, " take={reference}")?;
        }
        if let Some(reference) = &self.source_property {
            write!(f, " give={reference}")?;
        }
        Ok(())
    }
}
