use std::collections::HashMap;
use std::time::Duration;

use crate::game::game::Game;

#[derive(Debug, Default, Clone)]
pub struct GameStats {
    pub wins: HashMap<String, u32>,
    pub full_sets_by_player: HashMap<String, Vec<usize>>,
    pub games: u32,
    pub draws: u32,
    pub total_events: u64,
    pub total_turns: u64,
    pub total_duration: Duration,
}

impl GameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_game<P>(&mut self, game: &Game<P>, duration: Duration)
    where
        P: crate::players::DecisionProvider,
    {
        self.games += 1;
        self.total_duration += duration;
        self.total_turns += game.state.turn as u64;
        self.total_events += game.state.history.len() as u64;

        match game.winner() {
            Some(winner) => *self.wins.entry(winner.to_string()).or_insert(0) += 1,
            None => self.draws += 1,
        }

        for player in &game.state.players {
            self.full_sets_by_player
                .entry(player.name.clone())
                .or_default()
                .push(player.full_set_count());
        }
    }

    pub fn merge(&mut self, other: GameStats) {
        for (name, wins) in other.wins {
            *self.wins.entry(name).or_insert(0) += wins;
        }
        for (name, sets) in other.full_sets_by_player {
            self.full_sets_by_player.entry(name).or_default().extend(sets);
        }
        self.games += other.games;
        self.draws += other.draws;
        self.total_events += other.total_events;
        self.total_turns += other.total_turns;
        self.total_duration += other.total_duration;
    }

    pub fn wins_for(&self, name: &str) -> u32 {
        self.wins.get(name).copied().unwrap_or(0)
    }

    pub fn get_avg_full_sets(&self, name: &str) -> f64 {
        self.full_sets_by_player
            .get(name)
            .filter(|sets| !sets.is_empty())
            .map(|sets| sets.iter().sum::<usize>() as f64 / sets.len() as f64)
            .unwrap_or(0.0)
    }

    pub fn get_avg_events(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_events as f64 / self.games as f64
    }

    pub fn get_avg_turns(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_turns as f64 / self.games as f64
    }

    pub fn get_avg_duration(&self) -> Duration {
        if self.games == 0 {
            return Duration::ZERO;
        }
        self.total_duration / self.games
    }
}

#[derive(Debug, Default)]
pub struct StatisticsAccumulator {
    pub stats: GameStats,
}

impl StatisticsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn after<P>(&mut self, game: &Game<P>, duration: Duration)
    where
        P: crate::players::DecisionProvider,
    {
        self.stats.record_game(game, duration);
    }

    pub fn merge(&mut self, other: StatisticsAccumulator) {
        self.stats.merge(other.stats);
    }
}
