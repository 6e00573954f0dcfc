use crate::game::action::Action;
use crate::game::card::CardId;
use crate::game::history::History;
use crate::game::resolution::{PaymentItem, PaymentRequest, PendingAction};
use crate::observation::Observation;
use crate::players::{DecisionProvider, GreedyParams, GreedyPlayer, ProviderError, RandomPlayer};

pub struct CliPlayer {
    pub code: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const CLI_PLAYERS: &[CliPlayer] = &[
    CliPlayer {
        code: "R",
        name: "RandomPlayer",
        description: "Chooses uniformly among candidate moves. Always answers with Just Say No when holding one.",
    },
    CliPlayer {
        code: "G",
        name: "GreedyPlayer",
        description: "Plays the move with the best one-step score. First param is EPSILON for random exploration.",
    },
];

#[derive(Clone)]
pub enum PlayerInstance {
    Random(RandomPlayer),
    Greedy(GreedyPlayer),
}

impl PlayerInstance {
    pub fn code(&self) -> &'static str {
        match self {
            PlayerInstance::Random(_) => "R",
            PlayerInstance::Greedy(_) => "G",
        }
    }
}

impl DecisionProvider for PlayerInstance {
    fn name(&self) -> &str {
        match self {
            PlayerInstance::Random(p) => p.name(),
            PlayerInstance::Greedy(p) => p.name(),
        }
    }

    fn get_action(&mut self, observation: &Observation, history: &History) -> Result<Action, ProviderError> {
        match self {
            PlayerInstance::Random(p) => p.get_action(observation, history),
            PlayerInstance::Greedy(p) => p.get_action(observation, history),
        }
    }

    fn choose_discards(
        &mut self,
        count: usize,
        observation: &Observation,
        history: &History,
    ) -> Result<Vec<CardId>, ProviderError> {
        match self {
            PlayerInstance::Random(p) => p.choose_discards(count, observation, history),
            PlayerInstance::Greedy(p) => p.choose_discards(count, observation, history),
        }
    }

    fn provide_payment(
        &mut self,
        request: &PaymentRequest,
        observation: &Observation,
        history: &History,
    ) -> Result<Vec<PaymentItem>, ProviderError> {
        match self {
            PlayerInstance::Random(p) => p.provide_payment(request, observation, history),
            PlayerInstance::Greedy(p) => p.provide_payment(request, observation, history),
        }
    }

    fn wants_to_negate(
        &mut self,
        pending: &PendingAction,
        observation: &Observation,
        history: &History,
    ) -> Result<Option<Action>, ProviderError> {
        match self {
            PlayerInstance::Random(p) => p.wants_to_negate(pending, observation, history),
            PlayerInstance::Greedy(p) => p.wants_to_negate(pending, observation, history),
        }
    }
}

/// Builds a provider from a registry code such as `R` or `G:0.1`. The seat
/// name must be unique within a game.
pub fn create_player(code: &str, name: impl Into<String>, seed: u64, params: Vec<&str>) -> Option<PlayerInstance> {
    match code {
        "R" => Some(PlayerInstance::Random(RandomPlayer::new(name, seed))),
        "G" => {
            let epsilon = params.first().and_then(|s| s.parse::<f64>().ok());
            Some(PlayerInstance::Greedy(GreedyPlayer::new(
                name,
                seed,
                Some(GreedyParams::default()),
                epsilon,
            )))
        }
        _ => None,
    }
}

/// Parses a comma-separated lineup (`R,G,G:0.1`) into named seats
/// `P1-R`, `P2-G`, ...
pub fn parse_lineup(lineup: &str, seed: u64) -> Result<Vec<PlayerInstance>, String> {
    lineup.split(',')
        .enumerate()
        .map(|(idx, key)| {
            let parts: Vec<&str> = key.trim().split(':').collect();
            let code = parts[0];
            let params = parts[1..].to_vec();
            let name = format!("P{}-{}", idx + 1, code);
            create_player(code, name, seed.wrapping_add(idx as u64), params)
                .ok_or_else(|| format!("unknown player code '{code}'"))
        })
        .collect()
}

pub fn print_player_help() {
    println!("Player Legend:");
    println!("{:<5} {:<25} DESCRIPTION", "CODE", "PLAYER");
    println!("{}", "-".repeat(80));
    for player in CLI_PLAYERS {
        println!("{:<5} {:<25} {}", player.code, player.name, player.description);
    }
}
