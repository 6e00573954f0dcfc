use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::card::CardId;
use crate::game::history::GameEvent;
use crate::game::rules;
use crate::game::state::{GameError, GameState};
use crate::players::{DecisionProvider, Rejection, Request};
use crate::types::{PaymentSource, PropertyColor};

/// One card handed over in a payment, named by id and where it sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentItem {
    pub card: CardId,
    pub source: PaymentSource,
}

impl PaymentItem {
    pub fn new(card: CardId, source: PaymentSource) -> Self {
        Self { card, source }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub collector: String,
    pub reason: String,
    pub amount: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContestKind {
    Charge,
    DealBreaker,
    SlyDeal,
    ForcedDeal,
}

/// What a player is being asked to answer with Just Say No. `opponent` is
/// whoever made the most recent move in the chain, the one a new negation
/// must target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAction {
    pub initiator: String,
    pub victim: String,
    pub opponent: String,
    pub kind: ContestKind,
    pub description: String,
    pub amount: Option<u32>,
    pub negations: u32,
}

impl fmt::Display for PendingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} against {})", self.description, self.initiator, self.victim)?;
        if self.negations > 0 {
            write!(f, ", {} Just Say No played so far", self.negations)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeReason {
    Rent(PropertyColor),
    Birthday,
    DebtCollector,
}

impl fmt::Display for ChargeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChargeReason::Rent(color) => write!(f, "rent for {color}"),
            ChargeReason::Birthday => f.write_str("birthday"),
            ChargeReason::DebtCollector => f.write_str("debt collection"),
        }
    }
}

/// Result of a Just Say No exchange. An even number of negations leaves
/// the original action standing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Negotiation {
    pub negations: u32,
}

impl Negotiation {
    pub fn proceeds(&self) -> bool {
        self.negations % 2 == 0
    }

    pub fn cancelled(&self) -> bool {
        !self.proceeds()
    }
}

impl GameState {
    /// Runs the Just Say No chain for a contested action. The victim is
    /// asked first, then the two sides alternate until someone declines,
    /// runs out of Just Say No cards, or exhausts their retries. Each card
    /// played leaves the game, so the chain always ends.
    pub fn negotiate<P: DecisionProvider>(
        &mut self,
        providers: &mut [P],
        initiator: usize,
        victim: usize,
        kind: ContestKind,
        amount: Option<u32>,
        description: String,
    ) -> Result<Negotiation, GameError> {
        let mut responder = victim;
        let mut opponent = initiator;
        let mut negations = 0;
        let retry = self.config.retry.clone();

        while self.players[responder].holds_just_say_no() {
            let pending = PendingAction {
                initiator: self.player_name(initiator),
                victim: self.player_name(victim),
                opponent: self.player_name(opponent),
                kind,
                description: description.clone(),
                amount,
                negations,
            };
            let observation = self.observation(responder);
            let responder_name = self.player_name(responder);
            let turn = self.turn;
            let players = &self.players;
            let history = &mut self.history;
            let provider = providers
                .get_mut(responder)
                .ok_or(GameError::InvalidPlayer(responder))?;

            let response = retry.run(Request::Negation, |attempt| {
                let result = provider
                    .wants_to_negate(&pending, &observation, history)
                    .map_err(Rejection::from)
                    .and_then(|response| match response {
                        Some(mut action) => {
                            if let Some(card) = action.card.and_then(|id| players[responder].hand_card(id)) {
                                action.card_type = Some(card.card_type());
                            }
                            let action = action.normalized();
                            rules::validate_negation(&action, &players[responder], &players[opponent])?;
                            Ok(Some(action))
                        }
                        None => Ok(None),
                    });
                if let Err(rejection) = &result {
                    history.record(
                        turn,
                        GameEvent::ActionRejected {
                            player: responder_name.clone(),
                            attempt,
                            reason: rejection.to_string(),
                        },
                    );
                }
                result
            });

            match response {
                Ok(Some(action)) => {
                    let card_id = action
                        .card
                        .ok_or_else(|| GameError::Invariant("validated negation without card".into()))?;
                    let card = self.players[responder].take_from_hand(card_id).ok_or_else(|| {
                        GameError::Invariant(format!("Just Say No {card_id} left the hand"))
                    })?;
                    self.deck.discard_card(card);
                    negations += 1;
                    self.record(GameEvent::JustSayNo {
                        player: responder_name,
                        against: self.player_name(opponent),
                    });
                    std::mem::swap(&mut responder, &mut opponent);
                }
                Ok(None) => break,
                Err(rejection) => {
                    self.record(GameEvent::NegationSkipped {
                        player: responder_name,
                        reason: rejection.to_string(),
                    });
                    break;
                }
            }
        }
        Ok(Negotiation { negations })
    }

    /// Charges `payer` on behalf of `collector`, giving the payer a chance
    /// to negate first. Returns whether anything of value changed hands; a
    /// charge of nothing is settled at once and counts as collected.
    pub fn charge<P: DecisionProvider>(
        &mut self,
        providers: &mut [P],
        collector: usize,
        payer: usize,
        amount: u32,
        reason: &ChargeReason,
    ) -> Result<bool, GameError> {
        if amount == 0 {
            return Ok(true);
        }
        self.record(GameEvent::ChargeRequested {
            collector: self.player_name(collector),
            payer: self.player_name(payer),
            amount,
            reason: reason.to_string(),
        });
        let negotiation = self.negotiate(
            providers,
            collector,
            payer,
            ContestKind::Charge,
            Some(amount),
            format!("${amount}M {reason}"),
        )?;
        if negotiation.cancelled() {
            self.record(GameEvent::ChargeCancelled {
                collector: self.player_name(collector),
                payer: self.player_name(payer),
                reason: reason.to_string(),
            });
            return Ok(false);
        }
        self.collect_payment(providers, collector, payer, amount, reason)
    }

    /// Asks the payer which cards to hand over and moves them into the
    /// collector's bank. Properties arrive as bank value, not as sets.
    pub fn collect_payment<P: DecisionProvider>(
        &mut self,
        providers: &mut [P],
        collector: usize,
        payer: usize,
        amount: u32,
        reason: &ChargeReason,
    ) -> Result<bool, GameError> {
        let request = PaymentRequest {
            collector: self.player_name(collector),
            reason: reason.to_string(),
            amount,
        };
        let observation = self.observation(payer);
        let payer_name = self.player_name(payer);
        let retry = self.config.retry.clone();
        let turn = self.turn;
        let players = &self.players;
        let history = &mut self.history;
        let provider = providers
            .get_mut(payer)
            .ok_or(GameError::InvalidPlayer(payer))?;

        let offer = retry.run(Request::Payment, |attempt| {
            let result = provider
                .provide_payment(&request, &observation, history)
                .map_err(Rejection::from)
                .and_then(|items| {
                    rules::validate_payment(&items, &players[payer], amount)?;
                    Ok(items)
                });
            if let Err(rejection) = &result {
                history.record(
                    turn,
                    GameEvent::ActionRejected {
                        player: payer_name.clone(),
                        attempt,
                        reason: rejection.to_string(),
                    },
                );
            }
            result
        });

        let items = match offer {
            Ok(items) => items,
            Err(rejection) => {
                self.record(GameEvent::PaymentSkipped {
                    payer: payer_name,
                    reason: rejection.to_string(),
                });
                return Ok(false);
            }
        };

        let mut paid = 0;
        let mut cards = Vec::with_capacity(items.len());
        for item in &items {
            let card = self.players[payer]
                .take_asset(item.card, item.source)
                .ok_or_else(|| GameError::Invariant(format!("payment card {} vanished", item.card)))?;
            paid += card.value;
            cards.push(card.name.clone());
            self.players[collector].bank.push(card);
        }
        self.record(GameEvent::Paid {
            payer: payer_name,
            collector: self.player_name(collector),
            paid,
            owed: amount,
            cards,
        });
        Ok(paid > 0)
    }
}
