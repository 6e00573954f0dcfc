//! Pure legality checks. Nothing here mutates state; every rejection carries
//! the reason shown to the decision provider and written to history.

use std::collections::HashSet;

use crate::game::action::{Action, PropertyRef};
use crate::game::card::{Card, CardId, CardKind};
use crate::game::players::PlayerState;
use crate::game::resolution::PaymentItem;
use crate::types::{ActionType, BuildingKind, CardType, PaymentSource, PropertyColor};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleViolation {
    #[error("action by player {actual} but it is player {expected}'s turn")]
    WrongPlayer { expected: usize, actual: usize },
    #[error("action does not reference a card")]
    MissingCard,
    #[error("{player} does not hold card {card} in hand")]
    CardNotInHand { player: String, card: CardId },
    #[error("{player} has no placed property {card}")]
    CardNotInProperties { player: String, card: CardId },
    #[error("only a rent card may carry a double-the-rent count")]
    DoubleRentOutsideRent,
    #[error("{0} cannot be used as money")]
    NotBankable(String),
    #[error("{0} does not take target players")]
    TargetsNotAllowed(&'static str),
    #[error("{0} does not take a target color")]
    TargetColorNotAllowed(&'static str),
    #[error("{0} does not take a rent color")]
    RentColorNotAllowed(&'static str),
    #[error("{0} requires a target color")]
    TargetColorRequired(&'static str),
    #[error("{0} requires a rent color")]
    RentColorRequired(&'static str),
    #[error("{0} requires a property reference")]
    PropertyRefRequired(&'static str),
    #[error("{0} must name exactly one target player")]
    ExactlyOneTarget(&'static str),
    #[error("{0} is not a property card")]
    NotAProperty(String),
    #[error("{card} is a {expected} property and cannot go in {color}")]
    ColorMismatch {
        card: String,
        expected: PropertyColor,
        color: PropertyColor,
    },
    #[error("{card} cannot represent {color}")]
    ColorNotEligible { card: String, color: PropertyColor },
    #[error("only placed property wild cards can move; {0} cannot")]
    NotMovable(String),
    #[error("{card} is already in the {color} set")]
    AlreadyInColor { card: String, color: PropertyColor },
    #[error("{0} cannot be played as an action")]
    NotAnActionCard(String),
    #[error("Double The Rent can only be played together with a rent card")]
    DoubleTheRentAlone,
    #[error("Just Say No can only be played in response to an action")]
    JustSayNoOutOfContext,
    #[error("action cards cannot target the player who played them")]
    SelfTarget,
    #[error("no player named {0}")]
    UnknownTarget(String),
    #[error("holds {held} Double The Rent cards but asked for {requested}")]
    NotEnoughDoubleRent { held: usize, requested: u8 },
    #[error("needs {needed} actions but only {remaining} remain this turn")]
    ActionBudgetExceeded { needed: u8, remaining: u8 },
    #[error("{player} owns no {color} properties")]
    NoPropertiesOfColor { player: String, color: PropertyColor },
    #[error("{card} cannot charge rent for {color}")]
    RentColorNotOnCard { card: String, color: PropertyColor },
    #[error("the {0} set is not a full set")]
    SetNotFull(PropertyColor),
    #[error("buildings cannot be added to {0} properties")]
    BuildingsNotAllowed(PropertyColor),
    #[error("the {0} set already has a house or hotel")]
    HouseAlreadyBuilt(PropertyColor),
    #[error("the {0} set needs a house before a hotel")]
    HotelWithoutHouse(PropertyColor),
    #[error("the {0} set already has a hotel")]
    HotelAlreadyBuilt(PropertyColor),
    #[error("properties in a full {0} set cannot be taken")]
    FullSetImmune(PropertyColor),
    #[error("{player} owns no property {reference}")]
    PropertyNotFound {
        player: String,
        reference: PropertyRef,
    },
    #[error("{0} is not a Just Say No card")]
    NotJustSayNo(String),
    #[error("Just Say No must target {expected}")]
    NegationWrongTarget { expected: String },
    #[error("cannot pay with card {0} from hand")]
    PaymentFromHand(CardId),
    #[error("card {card} is not in the payer's {location}")]
    PaymentCardNotFound {
        card: CardId,
        location: PaymentSource,
    },
    #[error("building card {0} cannot be paid as a property")]
    BuildingAsPayment(CardId),
    #[error("card {0} offered more than once")]
    DuplicatePaymentCard(CardId),
    #[error("owes more than total assets, so all {available} assets must be surrendered, offered {offered}")]
    MustSurrenderEverything { offered: usize, available: usize },
    #[error("offered ${offered}M but ${owed}M is owed")]
    Underpaid { offered: u32, owed: u32 },
    #[error("must discard exactly {expected} cards, chose {actual}")]
    WrongDiscardCount { expected: usize, actual: usize },
    #[error("card {0} chosen for discard is not in hand")]
    DiscardNotInHand(CardId),
    #[error("card {0} chosen for discard more than once")]
    DuplicateDiscard(CardId),
}

/// Action slots used and allowed in the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnBudget {
    pub played: u8,
    pub limit: u8,
}

impl TurnBudget {
    pub fn remaining(&self) -> u8 {
        self.limit.saturating_sub(self.played)
    }
}

/// Checks one proposed action. `targets` are the players named in
/// `action.targets`, already looked up by name, in the same order.
pub fn validate(
    action: &Action,
    current: &PlayerState,
    targets: &[&PlayerState],
    budget: TurnBudget,
) -> Result<(), RuleViolation> {
    if action.is_pass() {
        return Ok(());
    }
    let card_id = action.card.ok_or(RuleViolation::MissingCard)?;
    let card = match action.action_type {
        ActionType::MoveProperty => current.property_card(card_id).ok_or_else(|| {
            RuleViolation::CardNotInProperties {
                player: current.name.clone(),
                card: card_id,
            }
        })?,
        _ => current
            .hand_card(card_id)
            .ok_or_else(|| RuleViolation::CardNotInHand {
                player: current.name.clone(),
                card: card_id,
            })?,
    };

    let is_rent_play =
        action.action_type == ActionType::PlayAction && card.card_type() == CardType::Rent;
    if action.double_rent_count > 0 && !is_rent_play {
        return Err(RuleViolation::DoubleRentOutsideRent);
    }

    match action.action_type {
        ActionType::Pass => Ok(()),
        ActionType::AddToBank => validate_add_to_bank(action, card),
        ActionType::AddToProperties => validate_add_to_properties(action, card),
        ActionType::MoveProperty => validate_move_property(action, current, card),
        ActionType::PlayAction => validate_action_card(action, current, targets, card, budget),
    }
}

fn validate_add_to_bank(action: &Action, card: &Card) -> Result<(), RuleViolation> {
    if !card.can_bank() {
        return Err(RuleViolation::NotBankable(card.name.clone()));
    }
    no_targets(action, "ADD_TO_BANK")?;
    if action.target_color.is_some() {
        return Err(RuleViolation::TargetColorNotAllowed("ADD_TO_BANK"));
    }
    Ok(())
}

fn validate_add_to_properties(action: &Action, card: &Card) -> Result<(), RuleViolation> {
    let color = action
        .target_color
        .ok_or(RuleViolation::TargetColorRequired("ADD_TO_PROPERTIES"))?;
    no_targets(action, "ADD_TO_PROPERTIES")?;
    match &card.kind {
        CardKind::Property { color: expected } if *expected != color => {
            Err(RuleViolation::ColorMismatch {
                card: card.name.clone(),
                expected: *expected,
                color,
            })
        }
        CardKind::Property { .. } => Ok(()),
        CardKind::PropertyWild { colors } if !colors.contains(&color) => {
            Err(RuleViolation::ColorNotEligible {
                card: card.name.clone(),
                color,
            })
        }
        CardKind::PropertyWild { .. } => Ok(()),
        _ => Err(RuleViolation::NotAProperty(card.name.clone())),
    }
}

fn validate_move_property(
    action: &Action,
    current: &PlayerState,
    card: &Card,
) -> Result<(), RuleViolation> {
    let colors = match &card.kind {
        CardKind::PropertyWild { colors } => colors,
        _ => return Err(RuleViolation::NotMovable(card.name.clone())),
    };
    no_targets(action, "MOVE_PROPERTY")?;
    if action.rent_color.is_some() {
        return Err(RuleViolation::RentColorNotAllowed("MOVE_PROPERTY"));
    }
    let color = action
        .target_color
        .ok_or(RuleViolation::TargetColorRequired("MOVE_PROPERTY"))?;
    if !colors.contains(&color) {
        return Err(RuleViolation::ColorNotEligible {
            card: card.name.clone(),
            color,
        });
    }
    if current.property_color_of(card.id) == Some(color) {
        return Err(RuleViolation::AlreadyInColor {
            card: card.name.clone(),
            color,
        });
    }
    Ok(())
}

fn validate_action_card(
    action: &Action,
    current: &PlayerState,
    targets: &[&PlayerState],
    card: &Card,
    budget: TurnBudget,
) -> Result<(), RuleViolation> {
    if action.targets.iter().any(|name| *name == current.name) {
        return Err(RuleViolation::SelfTarget);
    }
    match &card.kind {
        CardKind::Rent { colors, wild } => {
            validate_rent(action, current, card, colors, *wild, budget)
        }
        CardKind::Building { building } => validate_building(action, current, *building),
        CardKind::PassGo => validate_untargeted(action, "PASS_GO"),
        CardKind::Birthday => validate_untargeted(action, "BIRTHDAY"),
        CardKind::DebtCollector => {
            exactly_one_target(action, targets, "DEBT_COLLECTOR")?;
            if action.target_color.is_some() {
                return Err(RuleViolation::TargetColorNotAllowed("DEBT_COLLECTOR"));
            }
            if action.rent_color.is_some() {
                return Err(RuleViolation::RentColorNotAllowed("DEBT_COLLECTOR"));
            }
            Ok(())
        }
        CardKind::DealBreaker => validate_deal_breaker(action, targets),
        CardKind::SlyDeal => validate_sly_deal(action, targets),
        CardKind::ForcedDeal => validate_forced_deal(action, current, targets),
        CardKind::JustSayNo => Err(RuleViolation::JustSayNoOutOfContext),
        CardKind::DoubleTheRent => Err(RuleViolation::DoubleTheRentAlone),
        CardKind::Money | CardKind::Property { .. } | CardKind::PropertyWild { .. } => {
            Err(RuleViolation::NotAnActionCard(card.name.clone()))
        }
    }
}

fn validate_rent(
    action: &Action,
    current: &PlayerState,
    card: &Card,
    colors: &[PropertyColor],
    wild: bool,
    budget: TurnBudget,
) -> Result<(), RuleViolation> {
    if action.double_rent_count > 0 {
        let held = current.count_in_hand(CardType::DoubleTheRent);
        if held < action.double_rent_count as usize {
            return Err(RuleViolation::NotEnoughDoubleRent {
                held,
                requested: action.double_rent_count,
            });
        }
    }
    let needed = action.double_rent_count.saturating_add(1);
    if needed > budget.remaining() {
        return Err(RuleViolation::ActionBudgetExceeded {
            needed,
            remaining: budget.remaining(),
        });
    }
    if wild && action.targets.len() != 1 {
        return Err(RuleViolation::ExactlyOneTarget("wild RENT"));
    }
    if action.target_color.is_some() {
        return Err(RuleViolation::TargetColorNotAllowed("RENT"));
    }
    let color = action
        .rent_color
        .ok_or(RuleViolation::RentColorRequired("RENT"))?;
    if !current.property_sets.contains_key(&color) {
        return Err(RuleViolation::NoPropertiesOfColor {
            player: current.name.clone(),
            color,
        });
    }
    if !wild && !colors.contains(&color) {
        return Err(RuleViolation::RentColorNotOnCard {
            card: card.name.clone(),
            color,
        });
    }
    Ok(())
}

fn validate_building(
    action: &Action,
    current: &PlayerState,
    building: BuildingKind,
) -> Result<(), RuleViolation> {
    let color = action
        .target_color
        .ok_or(RuleViolation::TargetColorRequired("BUILDING"))?;
    no_targets(action, "BUILDING")?;
    let set = current
        .property_sets
        .get(&color)
        .ok_or_else(|| RuleViolation::NoPropertiesOfColor {
            player: current.name.clone(),
            color,
        })?;
    if !set.is_full_set() {
        return Err(RuleViolation::SetNotFull(color));
    }
    if !color.allows_buildings() {
        return Err(RuleViolation::BuildingsNotAllowed(color));
    }
    match building {
        BuildingKind::House if set.has_house() || set.has_hotel() => {
            Err(RuleViolation::HouseAlreadyBuilt(color))
        }
        BuildingKind::Hotel if !set.has_house() => Err(RuleViolation::HotelWithoutHouse(color)),
        BuildingKind::Hotel if set.has_hotel() => Err(RuleViolation::HotelAlreadyBuilt(color)),
        _ => Ok(()),
    }
}

fn validate_untargeted(action: &Action, label: &'static str) -> Result<(), RuleViolation> {
    no_targets(action, label)?;
    if action.target_color.is_some() {
        return Err(RuleViolation::TargetColorNotAllowed(label));
    }
    if action.rent_color.is_some() {
        return Err(RuleViolation::RentColorNotAllowed(label));
    }
    Ok(())
}

fn validate_deal_breaker(action: &Action, targets: &[&PlayerState]) -> Result<(), RuleViolation> {
    let target = exactly_one_target(action, targets, "DEAL_BREAKER")?;
    if action.rent_color.is_some() {
        return Err(RuleViolation::RentColorNotAllowed("DEAL_BREAKER"));
    }
    let color = action
        .target_color
        .ok_or(RuleViolation::TargetColorRequired("DEAL_BREAKER"))?;
    match target.property_sets.get(&color) {
        Some(set) if set.is_full_set() => Ok(()),
        Some(_) => Err(RuleViolation::SetNotFull(color)),
        None => Err(RuleViolation::NoPropertiesOfColor {
            player: target.name.clone(),
            color,
        }),
    }
}

fn validate_sly_deal(action: &Action, targets: &[&PlayerState]) -> Result<(), RuleViolation> {
    let target = exactly_one_target(action, targets, "SLY_DEAL")?;
    if action.target_color.is_some() {
        return Err(RuleViolation::TargetColorNotAllowed("SLY_DEAL"));
    }
    if action.rent_color.is_some() {
        return Err(RuleViolation::RentColorNotAllowed("SLY_DEAL"));
    }
    let reference = action
        .target_property
        .as_ref()
        .ok_or(RuleViolation::PropertyRefRequired("SLY_DEAL"))?;
    stealable(target, reference)
}

fn validate_forced_deal(
    action: &Action,
    current: &PlayerState,
    targets: &[&PlayerState],
) -> Result<(), RuleViolation> {
    let target = exactly_one_target(action, targets, "FORCED_DEAL")?;
    if action.target_color.is_some() {
        return Err(RuleViolation::TargetColorNotAllowed("FORCED_DEAL"));
    }
    if action.rent_color.is_some() {
        return Err(RuleViolation::RentColorNotAllowed("FORCED_DEAL"));
    }
    let wanted = action
        .target_property
        .as_ref()
        .ok_or(RuleViolation::PropertyRefRequired("FORCED_DEAL"))?;
    let offered = action
        .source_property
        .as_ref()
        .ok_or(RuleViolation::PropertyRefRequired("FORCED_DEAL"))?;
    if current.resolve_property(offered).is_none() {
        return Err(RuleViolation::PropertyNotFound {
            player: current.name.clone(),
            reference: offered.clone(),
        });
    }
    stealable(target, wanted)
}

/// The referenced card exists and its set is not full.
fn stealable(target: &PlayerState, reference: &PropertyRef) -> Result<(), RuleViolation> {
    let resolved =
        target
            .resolve_property(reference)
            .ok_or_else(|| RuleViolation::PropertyNotFound {
                player: target.name.clone(),
                reference: reference.clone(),
            })?;
    let full = target
        .property_sets
        .get(&resolved.color)
        .is_some_and(|set| set.is_full_set());
    if full {
        return Err(RuleViolation::FullSetImmune(resolved.color));
    }
    Ok(())
}

fn no_targets(action: &Action, label: &'static str) -> Result<(), RuleViolation> {
    if action.targets.is_empty() {
        Ok(())
    } else {
        Err(RuleViolation::TargetsNotAllowed(label))
    }
}

fn exactly_one_target<'a>(
    action: &Action,
    targets: &[&'a PlayerState],
    label: &'static str,
) -> Result<&'a PlayerState, RuleViolation> {
    match (action.targets.as_slice(), targets) {
        ([_], [target]) => Ok(*target),
        _ => Err(RuleViolation::ExactlyOneTarget(label)),
    }
}

/// Checks a Just Say No offered by `responder` against `opponent`'s pending
/// action.
pub fn validate_negation(
    action: &Action,
    responder: &PlayerState,
    opponent: &PlayerState,
) -> Result<(), RuleViolation> {
    let card_id = action.card.ok_or(RuleViolation::MissingCard)?;
    let card = responder
        .hand_card(card_id)
        .ok_or_else(|| RuleViolation::CardNotInHand {
            player: responder.name.clone(),
            card: card_id,
        })?;
    if action.action_type != ActionType::PlayAction || !card.is_just_say_no() {
        return Err(RuleViolation::NotJustSayNo(card.name.clone()));
    }
    if action.targets.len() != 1 || action.targets[0] != opponent.name {
        return Err(RuleViolation::NegationWrongTarget {
            expected: opponent.name.clone(),
        });
    }
    if action.target_color.is_some() {
        return Err(RuleViolation::TargetColorNotAllowed("JUST_SAY_NO"));
    }
    if action.rent_color.is_some() {
        return Err(RuleViolation::RentColorNotAllowed("JUST_SAY_NO"));
    }
    Ok(())
}

/// Checks the structure of a payment. Insolvent payers must hand over
/// everything; solvent payers must cover the amount owed.
pub fn validate_payment(
    payment: &[PaymentItem],
    payer: &PlayerState,
    owed: u32,
) -> Result<(), RuleViolation> {
    let mut seen = HashSet::new();
    let mut offered_value = 0;
    for item in payment {
        if item.source == PaymentSource::Hand {
            return Err(RuleViolation::PaymentFromHand(item.card));
        }
        if item.source == PaymentSource::Properties {
            let is_building = payer
                .owned_card(item.card)
                .is_some_and(|card| card.card_type() == CardType::Building);
            if is_building {
                return Err(RuleViolation::BuildingAsPayment(item.card));
            }
        }
        let card = payer.asset(item.card, item.source).ok_or(
            RuleViolation::PaymentCardNotFound {
                card: item.card,
                location: item.source,
            },
        )?;
        if !seen.insert(item.card) {
            return Err(RuleViolation::DuplicatePaymentCard(item.card));
        }
        offered_value += card.value;
    }

    if payer.total_assets() < owed {
        let available = payer.asset_count();
        if payment.len() != available {
            return Err(RuleViolation::MustSurrenderEverything {
                offered: payment.len(),
                available,
            });
        }
    } else if offered_value < owed {
        return Err(RuleViolation::Underpaid {
            offered: offered_value,
            owed,
        });
    }
    Ok(())
}

/// Checks a discard choice: exactly `count` distinct cards from hand.
pub fn validate_discards(
    cards: &[CardId],
    player: &PlayerState,
    count: usize,
) -> Result<(), RuleViolation> {
    if cards.len() != count {
        return Err(RuleViolation::WrongDiscardCount {
            expected: count,
            actual: cards.len(),
        });
    }
    let mut seen = HashSet::new();
    for card in cards {
        if player.hand_card(*card).is_none() {
            return Err(RuleViolation::DiscardNotInHand(*card));
        }
        if !seen.insert(*card) {
            return Err(RuleViolation::DuplicateDiscard(*card));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::card::Card;

    fn property(id: u32, name: &str, color: PropertyColor) -> Card {
        Card::new(CardId(id), name, 2, CardKind::Property { color })
    }

    fn budget() -> TurnBudget {
        TurnBudget {
            played: 0,
            limit: 3,
        }
    }

    fn player_with_hand(name: &str, hand: Vec<Card>) -> PlayerState {
        let mut player = PlayerState::new(name);
        player.hand = hand;
        player
    }

    #[test]
    fn pass_is_always_valid() {
        let player = PlayerState::new("Alice");
        assert_eq!(validate(&Action::pass(0), &player, &[], budget()), Ok(()));
    }

    #[test]
    fn card_must_be_in_hand() {
        let card = Card::new(CardId(1), "$1M", 1, CardKind::Money);
        let player = PlayerState::new("Alice");
        let action = Action::new(0, ActionType::AddToBank, &card);
        assert!(matches!(
            validate(&action, &player, &[], budget()),
            Err(RuleViolation::CardNotInHand { .. })
        ));
    }

    #[test]
    fn bank_rejects_wilds_and_stray_fields() {
        let wild = Card::new(
            CardId(1),
            "Wild (Pink/Orange)",
            2,
            CardKind::PropertyWild {
                colors: vec![PropertyColor::Pink, PropertyColor::Orange],
            },
        );
        let money = Card::new(CardId(2), "$3M", 3, CardKind::Money);
        let player = player_with_hand("Alice", vec![wild.clone(), money.clone()]);

        let bank_wild = Action::new(0, ActionType::AddToBank, &wild);
        assert_eq!(
            validate(&bank_wild, &player, &[], budget()),
            Err(RuleViolation::NotBankable("Wild (Pink/Orange)".into()))
        );

        let mut bank_money = Action::new(0, ActionType::AddToBank, &money);
        bank_money.target_color = Some(PropertyColor::Red);
        assert_eq!(
            validate(&bank_money, &player, &[], budget()),
            Err(RuleViolation::TargetColorNotAllowed("ADD_TO_BANK"))
        );
    }

    #[test]
    fn standard_property_must_match_its_color() {
        let card = property(1, "Ruby Rd", PropertyColor::Red);
        let player = player_with_hand("Alice", vec![card.clone()]);
        let wrong = Action::new(0, ActionType::AddToProperties, &card)
            .with_target_color(PropertyColor::Yellow);
        assert!(matches!(
            validate(&wrong, &player, &[], budget()),
            Err(RuleViolation::ColorMismatch { .. })
        ));
        let right = Action::new(0, ActionType::AddToProperties, &card)
            .with_target_color(PropertyColor::Red);
        assert_eq!(validate(&right, &player, &[], budget()), Ok(()));
    }

    #[test]
    fn rent_double_count_respects_hand_and_budget() {
        let rent = Card::new(
            CardId(1),
            "Rent (Yellow/Red)",
            1,
            CardKind::Rent {
                colors: vec![PropertyColor::Yellow, PropertyColor::Red],
                wild: false,
            },
        );
        let double = |id| Card::new(CardId(id), "Double The Rent", 1, CardKind::DoubleTheRent);
        let mut player = player_with_hand("Alice", vec![rent.clone(), double(2), double(3)]);
        player
            .place_property(property(4, "Ruby Rd", PropertyColor::Red), PropertyColor::Red)
            .unwrap();

        let two = Action::new(0, ActionType::PlayAction, &rent)
            .with_rent_color(PropertyColor::Red)
            .with_double_rent(2);
        assert_eq!(validate(&two, &player, &[], budget()), Ok(()));

        let after_one = TurnBudget {
            played: 1,
            limit: 3,
        };
        assert_eq!(
            validate(&two, &player, &[], after_one),
            Err(RuleViolation::ActionBudgetExceeded {
                needed: 3,
                remaining: 2
            })
        );

        let three = two.clone().with_double_rent(3);
        assert!(matches!(
            validate(&three, &player, &[], budget()),
            Err(RuleViolation::NotEnoughDoubleRent { held: 2, .. })
        ));
    }

    #[test]
    fn sly_deal_cannot_take_from_full_set() {
        let sly = Card::new(CardId(1), "Sly Deal", 3, CardKind::SlyDeal);
        let thief = player_with_hand("Alice", vec![sly.clone()]);
        let mut victim = PlayerState::new("Bob");
        victim
            .place_property(property(2, "Old Town Rd", PropertyColor::Brown), PropertyColor::Brown)
            .unwrap();
        victim
            .place_property(
                property(3, "Cobblestone Way", PropertyColor::Brown),
                PropertyColor::Brown,
            )
            .unwrap();
        victim
            .place_property(property(4, "Ruby Rd", PropertyColor::Red), PropertyColor::Red)
            .unwrap();

        let from_full = Action::new(0, ActionType::PlayAction, &sly)
            .with_target("Bob")
            .with_target_property(PropertyRef::new("Old Town Rd", PropertyColor::Brown));
        assert_eq!(
            validate(&from_full, &thief, &[&victim], budget()),
            Err(RuleViolation::FullSetImmune(PropertyColor::Brown))
        );

        let from_partial = Action::new(0, ActionType::PlayAction, &sly)
            .with_target("Bob")
            .with_target_property(PropertyRef::new("Ruby Rd", PropertyColor::Red));
        assert_eq!(validate(&from_partial, &thief, &[&victim], budget()), Ok(()));
    }

    #[test]
    fn action_cards_cannot_target_their_player() {
        let debt = Card::new(CardId(1), "Debt Collector", 3, CardKind::DebtCollector);
        let player = player_with_hand("Alice", vec![debt.clone()]);
        let action = Action::new(0, ActionType::PlayAction, &debt).with_target("Alice");
        assert_eq!(
            validate(&action, &player, &[&player], budget()),
            Err(RuleViolation::SelfTarget)
        );
    }

    #[test]
    fn just_say_no_needs_a_pending_action() {
        let jsn = Card::new(CardId(1), "Just Say No!", 4, CardKind::JustSayNo);
        let alice = player_with_hand("Alice", vec![jsn.clone()]);
        let bob = PlayerState::new("Bob");
        let action = Action::new(0, ActionType::PlayAction, &jsn).with_target("Bob");
        assert_eq!(
            validate(&action, &alice, &[&bob], budget()),
            Err(RuleViolation::JustSayNoOutOfContext)
        );
        assert_eq!(validate_negation(&action, &alice, &bob), Ok(()));
    }

    #[test]
    fn hotel_needs_house_on_full_set() {
        let hotel = Card::new(
            CardId(1),
            "Hotel",
            4,
            CardKind::Building {
                building: BuildingKind::Hotel,
            },
        );
        let mut player = player_with_hand("Alice", vec![hotel.clone()]);
        player
            .place_property(property(2, "Luxury Lane", PropertyColor::DarkBlue), PropertyColor::DarkBlue)
            .unwrap();
        let action = Action::new(0, ActionType::PlayAction, &hotel)
            .with_target_color(PropertyColor::DarkBlue);
        assert_eq!(
            validate(&action, &player, &[], budget()),
            Err(RuleViolation::SetNotFull(PropertyColor::DarkBlue))
        );
        player
            .place_property(
                property(3, "Prestige Point", PropertyColor::DarkBlue),
                PropertyColor::DarkBlue,
            )
            .unwrap();
        assert_eq!(
            validate(&action, &player, &[], budget()),
            Err(RuleViolation::HotelWithoutHouse(PropertyColor::DarkBlue))
        );
    }

    #[test]
    fn payment_rules() {
        let mut payer = PlayerState::new("Bob");
        payer.bank.push(Card::new(CardId(1), "$1M", 1, CardKind::Money));
        payer.bank.push(Card::new(CardId(2), "$2M", 2, CardKind::Money));
        payer.hand.push(Card::new(CardId(3), "$5M", 5, CardKind::Money));
        payer
            .place_property(property(4, "Ruby Rd", PropertyColor::Red), PropertyColor::Red)
            .unwrap();

        let from_hand = [PaymentItem::new(CardId(3), PaymentSource::Hand)];
        assert_eq!(
            validate_payment(&from_hand, &payer, 2),
            Err(RuleViolation::PaymentFromHand(CardId(3)))
        );

        let enough = [PaymentItem::new(CardId(2), PaymentSource::Bank)];
        assert_eq!(validate_payment(&enough, &payer, 2), Ok(()));

        let short = [PaymentItem::new(CardId(1), PaymentSource::Bank)];
        assert!(matches!(
            validate_payment(&short, &payer, 2),
            Err(RuleViolation::Underpaid { .. })
        ));

        // Owes 8 with 5 in assets: everything must go.
        let partial = [
            PaymentItem::new(CardId(1), PaymentSource::Bank),
            PaymentItem::new(CardId(2), PaymentSource::Bank),
        ];
        assert!(matches!(
            validate_payment(&partial, &payer, 8),
            Err(RuleViolation::MustSurrenderEverything { .. })
        ));
        let everything = [
            PaymentItem::new(CardId(1), PaymentSource::Bank),
            PaymentItem::new(CardId(2), PaymentSource::Bank),
            PaymentItem::new(CardId(4), PaymentSource::Properties),
        ];
        assert_eq!(validate_payment(&everything, &payer, 8), Ok(()));
    }

    #[test]
    fn discard_choice_must_be_exact() {
        let player = player_with_hand(
            "Alice",
            vec![
                Card::new(CardId(1), "$1M", 1, CardKind::Money),
                Card::new(CardId(2), "$1M", 1, CardKind::Money),
            ],
        );
        assert_eq!(validate_discards(&[CardId(1)], &player, 1), Ok(()));
        assert!(validate_discards(&[CardId(1), CardId(1)], &player, 2).is_err());
        assert!(validate_discards(&[CardId(9)], &player, 1).is_err());
        assert!(validate_discards(&[], &player, 1).is_err());
    }
}
