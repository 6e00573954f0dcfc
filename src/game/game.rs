use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::game::action::Action;
use crate::game::card::Card;
use crate::game::deck::{Deck, DeckError};
use crate::game::history::{GameEvent, History};
use crate::game::rules;
use crate::game::state::{GameConfig, GameError, GameState, RefusedRentPolicy};
use crate::observation::PlayerObservation;
use crate::players::{DecisionProvider, Rejection, Request};
use crate::types::{ActionType, CardType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TurnPhase {
    TurnStart,
    Draw,
    ActionLoop,
    Discard,
    TurnEnd,
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub winner: Option<String>,
    pub turns: u32,
}

/// Full end-of-game dump of one seat, hand included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    #[serde(flatten)]
    pub public: PlayerObservation,
    pub hand: Vec<Card>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: Uuid,
    pub seed: u64,
    pub players: Vec<PlayerRecord>,
    pub winner: Option<String>,
    pub turns: u32,
    pub history: History,
}

/// Ensures a discard phase that started over the hand limit ended exactly
/// on it.
pub fn check_discard_outcome(player: &str, hand: usize, max: usize) -> Result<(), GameError> {
    if hand != max {
        return Err(GameError::HandLimit {
            player: player.to_string(),
            hand,
            max,
        });
    }
    Ok(())
}

pub struct Game<P> {
    pub id: Uuid,
    pub seed: u64,
    pub state: GameState,
    pub phase: TurnPhase,
    winner: Option<usize>,
    providers: Vec<P>,
}

impl<P: DecisionProvider> Game<P> {
    pub fn new(config: GameConfig, providers: Vec<P>) -> Result<Self, GameError> {
        let deck = Deck::standard(config.seed);
        Self::with_deck(config, providers, deck)
    }

    /// Seats `providers` (shuffled when the config asks for it) around the
    /// given deck.
    pub fn with_deck(config: GameConfig, mut providers: Vec<P>, deck: Deck) -> Result<Self, GameError> {
        if config.shuffle_seating {
            let mut rng = StdRng::seed_from_u64(config.seed);
            providers.shuffle(&mut rng);
        }
        let names = providers.iter().map(|p| p.name().to_string()).collect();
        let seed = config.seed;
        let state = GameState::new(config, names, deck)?;
        Ok(Self {
            id: Uuid::new_v4(),
            seed,
            state,
            phase: TurnPhase::TurnStart,
            winner: None,
            providers,
        })
    }

    pub fn providers(&self) -> &[P] {
        &self.providers
    }

    pub fn into_providers(self) -> Vec<P> {
        self.providers
    }

    pub fn is_over(&self) -> bool {
        self.phase == TurnPhase::GameOver
    }

    pub fn winner(&self) -> Option<&str> {
        self.winner
            .and_then(|idx| self.state.players.get(idx))
            .map(|player| player.name.as_str())
    }

    /// Plays turns until someone wins or the turn limit is reached. With
    /// `end_on_empty_deck` set, running out of cards also ends the game.
    pub fn play(&mut self) -> Result<GameOutcome, GameError> {
        if self.is_over() {
            return Err(GameError::GameFinished);
        }
        let names: Vec<&str> = self.state.players.iter().map(|p| p.name.as_str()).collect();
        info!(game.id = %self.id, seed = self.seed, players = ?names, "game started");

        while !self.is_over() {
            if self.state.turn >= self.state.config.max_turns {
                let turns = self.state.turn;
                self.state.record(GameEvent::TurnLimitReached { turns });
                self.phase = TurnPhase::GameOver;
                break;
            }
            match self.play_turn() {
                Ok(()) => {}
                Err(GameError::Deck(DeckError::Exhausted)) if self.state.config.end_on_empty_deck => {
                    warn!(game.id = %self.id, turn = self.state.turn, "deck exhausted, ending game");
                    self.state.record(GameEvent::DeckExhausted);
                    self.phase = TurnPhase::GameOver;
                }
                Err(err) => {
                    error!(game.id = %self.id, turn = self.state.turn, %err, "game aborted");
                    return Err(err);
                }
            }
        }

        let outcome = self.outcome();
        info!(
            game.id = %self.id,
            winner = outcome.winner.as_deref().unwrap_or("none"),
            turns = outcome.turns,
            "game finished"
        );
        Ok(outcome)
    }

    pub fn outcome(&self) -> GameOutcome {
        GameOutcome {
            winner: self.winner().map(str::to_string),
            turns: self.state.turn,
        }
    }

    /// One full turn for the current player: draw, act, discard, pass on.
    pub fn play_turn(&mut self) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::GameFinished);
        }
        let player = self.state.current_player;
        let name = self.state.player_name(player);
        self.state.turn += 1;
        self.state.actions_played = 0;

        self.phase = TurnPhase::TurnStart;
        self.state.record(GameEvent::TurnStarted {
            player: name.clone(),
        });

        self.phase = TurnPhase::Draw;
        let count = self.state.config.draws_per_turn;
        let hand_size = self.state.draw_cards(player, count)?;
        self.state.record(GameEvent::CardsDrawn {
            player: name.clone(),
            count,
            hand_size,
        });

        self.phase = TurnPhase::ActionLoop;
        if self.action_loop(player)? {
            return Ok(());
        }

        self.phase = TurnPhase::Discard;
        self.discard_phase(player)?;
        if self.check_winner(player) {
            return Ok(());
        }

        self.phase = TurnPhase::TurnEnd;
        self.state.record(GameEvent::TurnEnded { player: name });
        self.state.current_player = (player + 1) % self.state.players.len();
        self.phase = TurnPhase::TurnStart;
        Ok(())
    }

    /// Returns true when the game ended during the loop.
    fn action_loop(&mut self, player: usize) -> Result<bool, GameError> {
        let name = self.state.player_name(player);
        let mut decisions = 0;
        while self.state.actions_played < self.state.config.actions_per_turn
            && decisions < self.state.config.max_decisions_per_turn
        {
            decisions += 1;
            let Some(action) = self.request_action(player)? else {
                break;
            };
            let success = self.state.execute(&mut self.providers, &action)?;
            self.state.record(GameEvent::ActionResolved {
                player: name.clone(),
                action: action.to_string(),
                success,
            });

            let refunded = !success
                && self.state.config.refused_rent == RefusedRentPolicy::RefundSlot
                && is_charge(&action);
            if !refunded {
                self.state.actions_played = self.state.actions_played.saturating_add(action.action_cost());
            }
            if self.check_winner(player) {
                return Ok(true);
            }
        }
        self.state.record(GameEvent::ActionPhaseEnded {
            player: name,
            actions_played: self.state.actions_played,
        });
        Ok(false)
    }

    /// Asks for the next action. `None` means the player passed or used
    /// up their retries; either way the action phase ends.
    fn request_action(&mut self, player: usize) -> Result<Option<Action>, GameError> {
        let observation = self.state.observation(player);
        let retry = self.state.config.retry.clone();
        let state = &self.state;
        let provider = self
            .providers
            .get_mut(player)
            .ok_or(GameError::InvalidPlayer(player))?;

        let mut rejected = Vec::new();
        let outcome = retry.run(Request::Action, |attempt| {
            let result = provider
                .get_action(&observation, &state.history)
                .map_err(Rejection::from)
                .and_then(|action| {
                    let action = state.canonicalize(action).normalized();
                    state.validate_action(&action)?;
                    Ok(action)
                });
            if let Err(rejection) = &result {
                rejected.push((attempt, rejection.to_string()));
            }
            result
        });

        let name = self.state.player_name(player);
        for (attempt, reason) in rejected {
            self.state.record(GameEvent::ActionRejected {
                player: name.clone(),
                attempt,
                reason,
            });
        }
        match outcome {
            Ok(action) if action.is_pass() => Ok(None),
            Ok(action) => Ok(Some(action)),
            Err(rejection) => {
                self.state.record(GameEvent::ActionSkipped {
                    player: name,
                    reason: rejection.to_string(),
                });
                Ok(None)
            }
        }
    }

    fn discard_phase(&mut self, player: usize) -> Result<(), GameError> {
        let name = self.state.player_name(player);
        let max = self.state.config.max_hand_size;
        let hand = self.state.players[player].hand.len();
        if hand <= max {
            return Ok(());
        }
        let count = hand - max;
        self.state.record(GameEvent::DiscardRequired {
            player: name.clone(),
            count,
        });

        let observation = self.state.observation(player);
        let retry = self.state.config.retry.clone();
        let state = &self.state;
        let provider = self
            .providers
            .get_mut(player)
            .ok_or(GameError::InvalidPlayer(player))?;

        let mut rejected = Vec::new();
        let outcome = retry.run(Request::Discard, |attempt| {
            let result = provider
                .choose_discards(count, &observation, &state.history)
                .map_err(Rejection::from)
                .and_then(|cards| {
                    rules::validate_discards(&cards, &state.players[player], count)?;
                    Ok(cards)
                });
            if let Err(rejection) = &result {
                rejected.push((attempt, rejection.to_string()));
            }
            result
        });

        for (attempt, reason) in rejected {
            self.state.record(GameEvent::ActionRejected {
                player: name.clone(),
                attempt,
                reason,
            });
        }
        let (cards, forced) = match outcome {
            Ok(cards) => (cards, false),
            Err(rejection) => {
                self.state.record(GameEvent::ActionSkipped {
                    player: name.clone(),
                    reason: rejection.to_string(),
                });
                let hand = &self.state.players[player].hand;
                let newest = hand[hand.len() - count..].iter().map(|card| card.id).collect();
                (newest, true)
            }
        };

        let mut discarded = Vec::with_capacity(cards.len());
        for id in cards {
            let card = self.state.players[player]
                .take_from_hand(id)
                .ok_or_else(|| GameError::Invariant(format!("discard {id} left the hand")))?;
            discarded.push(card.name.clone());
            self.state.deck.discard_card(card);
        }
        self.state.record(GameEvent::Discarded {
            player: name.clone(),
            cards: discarded,
            forced,
        });
        check_discard_outcome(&name, self.state.players[player].hand.len(), max)
    }

    fn check_winner(&mut self, player: usize) -> bool {
        if !self.state.players[player].has_won() {
            return false;
        }
        let turn = self.state.turn;
        self.state.record(GameEvent::GameWon {
            player: self.state.player_name(player),
            turn,
        });
        self.winner = Some(player);
        self.phase = TurnPhase::GameOver;
        true
    }

    pub fn record(&self) -> GameRecord {
        GameRecord {
            id: self.id,
            seed: self.seed,
            players: self
                .state
                .players
                .iter()
                .map(|player| PlayerRecord {
                    public: PlayerObservation::from(player),
                    hand: player.hand.clone(),
                })
                .collect(),
            winner: self.winner().map(str::to_string),
            turns: self.state.turn,
            history: self.state.history.clone(),
        }
    }
}

fn is_charge(action: &Action) -> bool {
    action.action_type == ActionType::PlayAction
        && matches!(
            action.card_type,
            Some(CardType::Rent | CardType::Birthday | CardType::DebtCollector)
        )
}
