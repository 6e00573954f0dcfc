use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::game::action::Action;
use crate::game::card::CardId;
use crate::game::history::History;
use crate::game::resolution::{PaymentItem, PaymentRequest, PendingAction};
use crate::observation::Observation;
use crate::players::DecisionProvider;
use crate::players::base::ProviderError;
use crate::players::candidates::{candidate_actions, just_say_no, plan_payment};

/// Uniformly random over enumerated candidates. Seeded so a whole game is
/// reproducible from its config.
#[derive(Clone)]
pub struct RandomPlayer {
    name: String,
    rng: StdRng,
}

impl RandomPlayer {
    pub fn new(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl DecisionProvider for RandomPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_action(
        &mut self,
        observation: &Observation,
        _history: &History,
    ) -> Result<Action, ProviderError> {
        let actions = candidate_actions(observation);
        actions
            .choose(&mut self.rng)
            .cloned()
            .ok_or_else(|| ProviderError::Internal("no candidate actions".into()))
    }

    fn choose_discards(
        &mut self,
        count: usize,
        observation: &Observation,
        _history: &History,
    ) -> Result<Vec<CardId>, ProviderError> {
        let ids: Vec<CardId> = observation.hand.iter().map(|card| card.id).collect();
        Ok(ids
            .choose_multiple(&mut self.rng, count)
            .copied()
            .collect())
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
        Ok(just_say_no(observation, &pending.opponent))
    }
}
