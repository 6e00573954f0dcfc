use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use clap::Parser;
use dealbench::cli::{create_player, load_config, print_player_help};
use dealbench::game::{Game, GameConfig};
use itertools::Itertools;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Parser, Clone)]
#[command(name = "dealbench-tournament")]
#[command(about = "Round-robin tournament between player strategies")]
struct Args {
    /// Comma-separated player codes to enter (e.g., R,G,G:0.1)
    #[arg(long, default_value = "R,G")]
    players: String,

    /// Games played by each pair
    #[arg(long, default_value_t = 10)]
    games_per_pair: u32,

    /// Random seed; every game derives its own from this
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file overriding the default game config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the final ranking as JSON to this file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Number of worker threads
    #[arg(long, default_value_t = 1)]
    workers: usize,

    /// Show player codes and exit
    #[arg(long)]
    help_players: bool,

    /// Silence console output
    #[arg(long)]
    quiet: bool,

    /// Log every game event
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone)]
struct Match {
    first: String,
    second: String,
    seed: u64,
}

#[derive(Debug, Clone)]
struct MatchResult {
    first: String,
    second: String,
    winner: Option<String>,
}

#[derive(Debug, Default, Clone, Serialize)]
struct Standing {
    entry: String,
    wins: u32,
    losses: u32,
    draws: u32,
    games: u32,
    win_rate: f64,
}

fn main() {
    let args = Args::parse();

    let filter = if args.verbose {
        "debug"
    } else if args.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if args.help_players {
        print_player_help();
        return;
    }

    let mut config = load_config(args.config.as_deref()).unwrap_or_else(|err| {
        eprintln!("Error: {err}");
        std::process::exit(1);
    });
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let entries: Vec<String> = args
        .players
        .split(',')
        .map(|entry| entry.trim().to_string())
        .unique()
        .collect();
    if let Some(bad) = entries.iter().find(|entry| build_seat(entry, "check", 0).is_none()) {
        eprintln!("Error: Unknown player code '{bad}'");
        eprintln!("Use --help-players to see available codes");
        std::process::exit(1);
    }
    if entries.len() < 2 {
        eprintln!("Error: A tournament needs at least 2 distinct entries");
        std::process::exit(1);
    }

    let mut matches = Vec::new();
    for (first, second) in entries.iter().tuple_combinations() {
        for game_idx in 0..args.games_per_pair {
            let seed = config.seed.wrapping_add(matches.len() as u64);
            // Alternate who is listed first so seating bias evens out.
            let (first, second) = if game_idx % 2 == 0 { (first, second) } else { (second, first) };
            matches.push(Match {
                first: first.clone(),
                second: second.clone(),
                seed,
            });
        }
    }
    info!(entries = entries.len(), games = matches.len(), "starting tournament");

    let results = run_matches(matches, &config, args.workers.max(1));
    let standings = rank(&entries, &results);

    if !args.quiet {
        print_standings(&standings);
    }
    if let Some(path) = &args.output {
        let written = serde_json::to_string_pretty(&standings)
            .map_err(|err| err.to_string())
            .and_then(|json| std::fs::write(path, json).map_err(|err| err.to_string()));
        match written {
            Ok(()) => info!(path = %path.display(), "ranking written"),
            Err(err) => warn!(%err, "failed to write ranking"),
        }
    }
}

/// Seat names carry the entry so results map back without a lookup.
fn build_seat(entry: &str, seat: &str, seed: u64) -> Option<dealbench::cli::PlayerInstance> {
    let parts: Vec<&str> = entry.split(':').collect();
    create_player(parts[0], format!("{seat}|{entry}"), seed, parts[1..].to_vec())
}

fn entry_of(seat_name: &str) -> String {
    seat_name
        .split_once('|')
        .map(|(_, entry)| entry.to_string())
        .unwrap_or_default()
}

fn play_match(config: &GameConfig, game: &Match) -> Option<MatchResult> {
    let seats = [
        build_seat(&game.first, "A", game.seed)?,
        build_seat(&game.second, "B", game.seed.wrapping_add(1))?,
    ];
    let config = GameConfig {
        seed: game.seed,
        ..config.clone()
    };
    let mut instance = match Game::new(config, seats.to_vec()) {
        Ok(instance) => instance,
        Err(err) => {
            warn!(%err, "could not set up match");
            return None;
        }
    };
    match instance.play() {
        Ok(outcome) => Some(MatchResult {
            first: game.first.clone(),
            second: game.second.clone(),
            winner: outcome.winner.as_deref().map(entry_of),
        }),
        Err(err) => {
            warn!(game.id = %instance.id, %err, "match aborted");
            None
        }
    }
}

fn run_matches(matches: Vec<Match>, config: &GameConfig, workers: usize) -> Vec<MatchResult> {
    if workers == 1 {
        return matches.iter().filter_map(|game| play_match(config, game)).collect();
    }

    let config = Arc::new(config.clone());
    let chunk_size = matches.len().div_ceil(workers).max(1);
    let handles: Vec<_> = matches
        .chunks(chunk_size)
        .map(|chunk| {
            let chunk = chunk.to_vec();
            let config = Arc::clone(&config);
            thread::spawn(move || {
                chunk
                    .iter()
                    .filter_map(|game| play_match(&config, game))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        match handle.join() {
            Ok(worker_results) => results.extend(worker_results),
            Err(_) => warn!("tournament worker panicked"),
        }
    }
    results
}

fn rank(entries: &[String], results: &[MatchResult]) -> Vec<Standing> {
    let mut table: BTreeMap<&str, Standing> = entries
        .iter()
        .map(|entry| {
            (
                entry.as_str(),
                Standing {
                    entry: entry.clone(),
                    ..Standing::default()
                },
            )
        })
        .collect();

    for result in results {
        for entry in [&result.first, &result.second] {
            let Some(standing) = table.get_mut(entry.as_str()) else {
                continue;
            };
            standing.games += 1;
            match &result.winner {
                Some(winner) if winner == entry => standing.wins += 1,
                Some(_) => standing.losses += 1,
                None => standing.draws += 1,
            }
        }
    }

    table
        .into_values()
        .map(|mut standing| {
            if standing.games > 0 {
                standing.win_rate = standing.wins as f64 / standing.games as f64;
            }
            standing
        })
        .sorted_by(|a, b| b.win_rate.total_cmp(&a.win_rate).then_with(|| a.entry.cmp(&b.entry)))
        .collect()
}

fn print_standings(standings: &[Standing]) {
    println!("\n{}", "=".repeat(80));
    println!("TOURNAMENT RANKING");
    println!("{}", "=".repeat(80));
    println!(
        "{:<5} {:<15} {:<8} {:<8} {:<8} {:<10}",
        "Rank", "Entry", "Wins", "Losses", "Draws", "Win Rate"
    );
    println!("{}", "-".repeat(60));
    for (idx, standing) in standings.iter().enumerate() {
        println!(
            "{:<5} {:<15} {:<8} {:<8} {:<8} {:<9.1}%",
            idx + 1,
            standing.entry,
            standing.wins,
            standing.losses,
            standing.draws,
            standing.win_rate * 100.0
        );
    }
}
