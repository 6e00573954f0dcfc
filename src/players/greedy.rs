use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::game::action::Action;
use crate::game::card::{CardId, CardKind};
use crate::game::history::History;
use crate::game::resolution::{ContestKind, PaymentItem, PaymentRequest, PendingAction};
use crate::observation::{Observation, PlayerObservation};
use crate::players::DecisionProvider;
use crate::players::base::ProviderError;
use crate::players::candidates::{candidate_actions, cheapest_discards, just_say_no, plan_payment};
use crate::types::{ActionType, PropertyColor};

#[derive(Clone)]
pub struct GreedyPlayer {
    name: String,
    pub params: GreedyParams,
    pub epsilon: Option<f64>,
    rng: StdRng,
}

/// Weights for the one-step action score.
#[derive(Debug, Clone)]
pub struct GreedyParams {
    pub completes_set: f64,
    pub set_progress: f64,
    pub bank_value: f64,
    pub bank_action_card: f64,
    pub collected: f64,
    pub double_rent_cost: f64,
    pub steal_set: f64,
    pub steal_property: f64,
    pub building: f64,
    pub draw: f64,
    pub negate_threshold: u32,
}

impl Default for GreedyParams {
    fn default() -> Self {
        Self {
            completes_set: 100.0,
            set_progress: 10.0,
            bank_value: 2.0,
            bank_action_card: -4.0,
            collected: 3.0,
            double_rent_cost: 2.0,
            steal_set: 150.0,
            steal_property: 12.0,
            building: 15.0,
            draw: 6.0,
            negate_threshold: 3,
        }
    }
}

impl GreedyPlayer {
    pub fn new(name: impl Into<String>, seed: u64, params: Option<GreedyParams>, epsilon: Option<f64>) -> Self {
        Self {
            name: name.into(),
            params: params.unwrap_or_default(),
            epsilon,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl DecisionProvider for GreedyPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_action(
        &mut self,
        observation: &Observation,
        _history: &History,
    ) -> Result<Action, ProviderError> {
        let actions = candidate_actions(observation);
        if actions.len() == 1 {
            return Ok(Action::pass(observation.viewer_index));
        }

        if let Some(epsilon) = self.epsilon {
            if self.rng.gen_bool(epsilon.clamp(0.0, 1.0)) {
                if let Some(action) = actions.choose(&mut self.rng) {
                    return Ok(action.clone());
                }
            }
        }

        let mut best_value = 0.0;
        let mut best_action = Action::pass(observation.viewer_index);
        for action in actions {
            let value = score_action(observation, &action, &self.params);
            if value > best_value {
                best_value = value;
                best_action = action;
            }
        }
        Ok(best_action)
    }

    fn choose_discards(
        &mut self,
        count: usize,
        observation: &Observation,
        _history: &History,
    ) -> Result<Vec<CardId>, ProviderError> {
        Ok(cheapest_discards(&observation.hand, count))
    }

    fn provide_payment(
        &mut self,
        request: &PaymentRequest,
        observation: &Observation,
        _history: &History,
    ) -> Result<Vec<PaymentItem>, ProviderError> {
        Ok(plan_payment(observation, request.amount))
    }

    fn wants_to_negate(
        &mut self,
        pending: &PendingAction,
        observation: &Observation,
        _history: &History,
    ) -> Result<Option<Action>, ProviderError> {
        let worth_it = match pending.kind {
            ContestKind::Charge => pending.amount.unwrap_or(0) >= self.params.negate_threshold,
            ContestKind::DealBreaker | ContestKind::SlyDeal | ContestKind::ForcedDeal => true,
        };
        if !worth_it {
            return Ok(None);
        }
        Ok(just_say_no(observation, &pending.opponent))
    }
}

/// Cards the viewer would hold in `color` after adding one, against the
/// size that completes it.
fn progress(me: &PlayerObservation, color: PropertyColor) -> (usize, usize) {
    let held = me.set(color).map_or(0, |set| set.cards.len());
    let needed = me
        .set(color)
        .and_then(|set| set.number_for_full_set)
        .unwrap_or_else(|| color.full_set_size()) as usize;
    (held + 1, needed)
}

fn placement_value(me: &PlayerObservation, color: PropertyColor, params: &GreedyParams) -> f64 {
    if me.set(color).is_some_and(|set| set.is_full_set) {
        return 1.0;
    }
    let (after, needed) = progress(me, color);
    if after >= needed {
        params.completes_set
    } else {
        params.set_progress * after as f64 / needed as f64
    }
}

fn score_action(observation: &Observation, action: &Action, params: &GreedyParams) -> f64 {
    let Some(me) = observation.me() else {
        return 0.0;
    };
    let card = action
        .card
        .and_then(|id| observation.hand.iter().find(|card| card.id == id));
    let opponents = observation.opponents().count() as f64;

    match action.action_type {
        ActionType::Pass => 0.0,
        ActionType::MoveProperty => {
            // Moves are free, so only take ones that finish a set.
            match action.target_color {
                Some(color) if placement_value(me, color, params) >= params.completes_set => {
                    params.completes_set / 2.0
                }
                _ => -1.0,
            }
        }
        ActionType::AddToBank => match card {
            Some(card) if matches!(card.kind, CardKind::Money) => params.bank_value * card.value as f64,
            Some(card) => params.bank_action_card + card.value as f64,
            None => 0.0,
        },
        ActionType::AddToProperties => action
            .target_color
            .map_or(0.0, |color| placement_value(me, color, params)),
        ActionType::PlayAction => {
            let Some(card) = card else {
                return 0.0;
            };
            match &card.kind {
                CardKind::Rent { wild, .. } => {
                    let rent = action
                        .rent_color
                        .and_then(|color| me.set(color))
                        .map_or(0, |set| set.rent) as f64;
                    let payers = if *wild { 1.0 } else { opponents };
                    let doubled = 2f64.powi(action.double_rent_count as i32);
                    params.collected * rent * doubled * payers
                        - params.double_rent_cost * action.double_rent_count as f64
                }
                CardKind::Building { .. } => params.building,
                CardKind::PassGo => params.draw,
                CardKind::Birthday => params.collected * 2.0 * opponents,
                CardKind::DebtCollector => params.collected * 5.0,
                CardKind::DealBreaker => params.steal_set,
                CardKind::SlyDeal => action.target_property.as_ref().map_or(0.0, |wanted| {
                    params.steal_property + placement_value(me, wanted.color, params)
                }),
                CardKind::ForcedDeal => {
                    let gained = action
                        .target_property
                        .as_ref()
                        .map_or(0.0, |wanted| placement_value(me, wanted.color, params));
                    let lost = action.source_property.as_ref().map_or(0.0, |offered| {
                        if me.set(offered.color).is_some_and(|set| set.is_full_set) {
                            params.completes_set
                        } else {
                            params.set_progress
                        }
                    });
                    gained - lost
                }
                CardKind::Money
                | CardKind::Property { .. }
                | CardKind::PropertyWild { .. }
                | CardKind::DoubleTheRent
                | CardKind::JustSayNo => 0.0,
            }
        }
    }
}
