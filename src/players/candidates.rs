use crate::game::action::{Action, PropertyRef};
use crate::game::card::{Card, CardId, CardKind};
use crate::game::resolution::PaymentItem;
use crate::observation::{Observation, PlayerObservation};
use crate::types::{ActionType, BuildingKind, CardType, PaymentSource, PropertyColor};

/// Enumerates plausible moves for the viewer from its observation. The list
/// is a superset filter, not a rules oracle: the engine still validates
/// whatever a provider picks. PASS is always first.
pub fn candidate_actions(observation: &Observation) -> Vec<Action> {
    let player = observation.viewer_index;
    let mut actions = vec![Action::pass(player)];
    let Some(me) = observation.me() else {
        return actions;
    };
    let remaining = observation.actions_remaining();
    if remaining > 0 {
        for card in &observation.hand {
            hand_card_actions(observation, me, card, remaining, &mut actions);
        }
    }
    for set in &me.property_sets {
        for card in &set.cards {
            if let CardKind::PropertyWild { colors } = &card.kind {
                for color in colors.iter().filter(|color| **color != set.color) {
                    actions.push(Action::new(player, ActionType::MoveProperty, card).with_target_color(*color));
                }
            }
        }
    }
    actions
}

fn hand_card_actions(
    observation: &Observation,
    me: &PlayerObservation,
    card: &Card,
    remaining: u8,
    actions: &mut Vec<Action>,
) {
    let player = observation.viewer_index;
    if card.can_bank() {
        actions.push(Action::new(player, ActionType::AddToBank, card));
    }
    let play = || Action::new(player, ActionType::PlayAction, card);
    match &card.kind {
        CardKind::Money | CardKind::DoubleTheRent | CardKind::JustSayNo => {}
        CardKind::Property { color } => {
            actions.push(Action::new(player, ActionType::AddToProperties, card).with_target_color(*color));
        }
        CardKind::PropertyWild { colors } => {
            for color in colors {
                actions.push(Action::new(player, ActionType::AddToProperties, card).with_target_color(*color));
            }
        }
        CardKind::Rent { colors, wild } => {
            let doubles = observation
                .hand
                .iter()
                .filter(|card| card.card_type() == CardType::DoubleTheRent)
                .count()
                .min(remaining.saturating_sub(1) as usize) as u8;
            for set in me.property_sets.iter().filter(|set| set.rent > 0) {
                if !*wild && !colors.contains(&set.color) {
                    continue;
                }
                for double in 0..=doubles {
                    let rent = play().with_rent_color(set.color).with_double_rent(double);
                    if *wild {
                        for opponent in observation.opponents() {
                            actions.push(rent.clone().with_target(opponent.name.clone()));
                        }
                    } else {
                        actions.push(rent);
                    }
                }
            }
        }
        CardKind::Building { building } => {
            for set in me.property_sets.iter().filter(|set| set.is_full_set) {
                let fits = match building {
                    BuildingKind::House => !set.has_house && !set.has_hotel,
                    BuildingKind::Hotel => set.has_house && !set.has_hotel,
                };
                if fits && set.color.allows_buildings() {
                    actions.push(play().with_target_color(set.color));
                }
            }
        }
        CardKind::PassGo | CardKind::Birthday => actions.push(play()),
        CardKind::DebtCollector => {
            for opponent in observation.opponents() {
                actions.push(play().with_target(opponent.name.clone()));
            }
        }
        CardKind::DealBreaker => {
            for opponent in observation.opponents() {
                for set in opponent.property_sets.iter().filter(|set| set.is_full_set) {
                    actions.push(play().with_target(opponent.name.clone()).with_target_color(set.color));
                }
            }
        }
        CardKind::SlyDeal => {
            for opponent in observation.opponents() {
                for wanted in stealable(opponent) {
                    actions.push(play().with_target(opponent.name.clone()).with_target_property(wanted));
                }
            }
        }
        CardKind::ForcedDeal => {
            let offers = placed(me);
            for opponent in observation.opponents() {
                for wanted in stealable(opponent) {
                    for offered in &offers {
                        actions.push(
                            play()
                                .with_target(opponent.name.clone())
                                .with_target_property(wanted.clone())
                                .with_source_property(offered.clone()),
                        );
                    }
                }
            }
        }
    }
}

/// Properties of `player` outside full sets.
fn stealable(player: &PlayerObservation) -> Vec<PropertyRef> {
    player
        .property_sets
        .iter()
        .filter(|set| !set.is_full_set)
        .flat_map(|set| set.cards.iter().map(|card| PropertyRef::new(card.name.clone(), set.color)))
        .collect()
}

fn placed(player: &PlayerObservation) -> Vec<PropertyRef> {
    player
        .property_sets
        .iter()
        .flat_map(|set| set.cards.iter().map(|card| PropertyRef::new(card.name.clone(), set.color)))
        .collect()
}

/// Cheapest-first payment: bank cards, then placed properties, until the
/// amount is covered. An insolvent payer ends up offering everything.
pub fn plan_payment(observation: &Observation, amount: u32) -> Vec<PaymentItem> {
    let Some(me) = observation.me() else {
        return Vec::new();
    };
    let mut bank: Vec<&Card> = me.bank.iter().collect();
    bank.sort_by_key(|card| card.value);
    let mut properties: Vec<(&Card, PropertyColor)> = me
        .property_sets
        .iter()
        .flat_map(|set| set.cards.iter().map(move |card| (card, set.color)))
        .collect();
    properties.sort_by_key(|(card, _)| card.value);

    let sources = bank
        .into_iter()
        .map(|card| (card, PaymentSource::Bank))
        .chain(properties.into_iter().map(|(card, _)| (card, PaymentSource::Properties)));
    let mut paid = 0;
    let mut items = Vec::new();
    for (card, source) in sources {
        if paid >= amount {
            break;
        }
        paid += card.value;
        items.push(PaymentItem::new(card.id, source));
    }
    items
}

/// The `count` least valuable cards in hand.
pub fn cheapest_discards(hand: &[Card], count: usize) -> Vec<CardId> {
    let mut cards: Vec<&Card> = hand.iter().collect();
    cards.sort_by_key(|card| card.value);
    cards.into_iter().take(count).map(|card| card.id).collect()
}

/// A Just Say No aimed at `opponent`, if the viewer holds one.
pub fn just_say_no(observation: &Observation, opponent: &str) -> Option<Action> {
    observation
        .hand
        .iter()
        .find(|card| card.is_just_say_no())
        .map(|card| Action::new(observation.viewer_index, ActionType::PlayAction, card).with_target(opponent))
}
