use crate::game::action::Action;
use crate::game::card::CardId;
use crate::game::history::History;
use crate::game::resolution::{PaymentItem, PaymentRequest, PendingAction};
use crate::observation::Observation;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("decision provider timed out")]
    Timeout,
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("decision provider failed: {0}")]
    Internal(String),
}

/// Source of decisions for one seat: a human, a script, a heuristic, or a
/// remote model. Every call sees the seat's own observation and the shared
/// history, and may fail; the engine retries and degrades on failure.
pub trait DecisionProvider {
    fn name(&self) -> &str;

    fn get_action(
        &mut self,
        observation: &Observation,
        history: &History,
    ) -> Result<Action, ProviderError>;

    /// Must return exactly `count` distinct cards from the hand.
    fn choose_discards(
        &mut self,
        count: usize,
        observation: &Observation,
        history: &History,
    ) -> Result<Vec<CardId>, ProviderError>;

    fn provide_payment(
        &mut self,
        request: &PaymentRequest,
        observation: &Observation,
        history: &History,
    ) -> Result<Vec<PaymentItem>, ProviderError>;

    /// `Ok(None)` declines to respond.
    fn wants_to_negate(
        &mut self,
        pending: &PendingAction,
        observation: &Observation,
        history: &History,
    ) -> Result<Option<Action>, ProviderError>;
}
