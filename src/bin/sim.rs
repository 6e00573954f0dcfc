use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use dealbench::cli::{PlayerInstance, StatisticsAccumulator, load_config, parse_lineup, print_player_help, write_record};
use dealbench::game::{Game, GameConfig};
use dealbench::players::DecisionProvider;
use tracing::{info, warn};

#[derive(Debug, Parser, Clone)]
#[command(name = "dealbench-sim")]
#[command(about = "Property deal simulator - play batches of games between player strategies")]
struct Args {
    /// Number of games to play
    #[arg(short = 'n', long, default_value_t = 5)]
    num: u32,

    /// Comma-separated player codes (e.g., R,R or G,R,R)
    /// Use ':' to set player-specific params (e.g., G:0.1 for epsilon)
    #[arg(long, default_value = "G,R")]
    players: String,

    /// Random seed for reproducibility; game i uses seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file overriding the default game config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory to write one JSON record per game
    #[arg(long)]
    output: Option<PathBuf>,

    /// Show player codes and exit
    #[arg(long)]
    help_players: bool,

    /// Silence console output
    #[arg(long)]
    quiet: bool,

    /// Log every game event
    #[arg(short, long)]
    verbose: bool,

    /// Number of worker threads for parallel execution
    #[arg(long, default_value_t = 1)]
    workers: usize,
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

    let players = parse_lineup(&args.players, config.seed).unwrap_or_else(|err| {
        eprintln!("Error: {err}");
        eprintln!("Use --help-players to see available codes");
        std::process::exit(1);
    });
    if players.len() < 2 || players.len() > 5 {
        eprintln!("Error: Must specify 2-5 players");
        std::process::exit(1);
    }

    info!(games = args.num, players = %args.players, seed = config.seed, "starting simulation");
    let mut stats = StatisticsAccumulator::new();
    if args.workers > 1 {
        run_parallel_simulations(&args, &config, &players, &mut stats);
    } else {
        run_sequential_simulations(&args, &config, &players, &mut stats);
    }

    if !args.quiet {
        print_summary(&stats, &players);
    }
}

/// Plays game `game_idx` to completion, writing its record if asked.
fn play_one(
    args: &Args,
    base: &GameConfig,
    players: &[PlayerInstance],
    game_idx: u64,
) -> Option<(Game<PlayerInstance>, std::time::Duration)> {
    let config = GameConfig {
        seed: base.seed.wrapping_add(game_idx),
        ..base.clone()
    };
    let start = Instant::now();
    let mut game = match Game::new(config, players.to_vec()) {
        Ok(game) => game,
        Err(err) => {
            warn!(game = game_idx + 1, %err, "could not set up game");
            return None;
        }
    };
    if let Err(err) = game.play() {
        warn!(game = game_idx + 1, game.id = %game.id, %err, "game aborted");
        return None;
    }
    let duration = start.elapsed();

    if let Some(dir) = &args.output {
        match write_record(dir, &game.record()) {
            Ok(path) => info!(path = %path.display(), "game record written"),
            Err(err) => warn!(%err, "failed to write game record"),
        }
    }
    Some((game, duration))
}

fn run_sequential_simulations(
    args: &Args,
    config: &GameConfig,
    players: &[PlayerInstance],
    stats: &mut StatisticsAccumulator,
) {
    for game_idx in 0..args.num {
        let Some((game, duration)) = play_one(args, config, players, game_idx as u64) else {
            continue;
        };
        stats.after(&game, duration);

        if !args.quiet {
            let last_n = 10;
            if game_idx < last_n || game_idx >= args.num.saturating_sub(last_n) {
                let seating = game
                    .providers()
                    .iter()
                    .map(|p| p.name())
                    .collect::<Vec<_>>()
                    .join(",");
                println!(
                    "Game {:>4}: Seating=[{}], Winner={:>6}, Turns={:>4}, Duration={:?}",
                    game_idx + 1,
                    seating,
                    game.winner().unwrap_or("None"),
                    game.state.turn,
                    duration
                );
            } else if (game_idx + 1) % 100 == 0 {
                print!(".");
                use std::io::Write;
                let _ = std::io::stdout().flush();
            }
        }
    }
}

fn run_parallel_simulations(
    args: &Args,
    config: &GameConfig,
    players: &[PlayerInstance],
    stats: &mut StatisticsAccumulator,
) {
    use std::sync::Arc;
    use std::thread;

    let players = Arc::new(players.to_vec());
    let args = Arc::new(args.clone());
    let config = Arc::new(config.clone());

    let mut handles = Vec::new();
    let games_per_worker = args.num as usize / args.workers;
    let remainder = args.num as usize % args.workers;

    for worker_id in 0..args.workers {
        let players = Arc::clone(&players);
        let args = Arc::clone(&args);
        let config = Arc::clone(&config);

        let num_games = if worker_id < remainder {
            games_per_worker + 1
        } else {
            games_per_worker
        };

        handles.push(thread::spawn(move || {
            let mut local_stats = StatisticsAccumulator::new();
            let start_idx = worker_id * games_per_worker + worker_id.min(remainder);
            for local_idx in 0..num_games {
                let game_idx = (start_idx + local_idx) as u64;
                if let Some((game, duration)) = play_one(&args, &config, &players, game_idx) {
                    local_stats.after(&game, duration);
                }
            }
            local_stats
        }));
    }

    for handle in handles {
        match handle.join() {
            Ok(worker_stats) => stats.merge(worker_stats),
            Err(_) => warn!("simulation worker panicked"),
        }
    }
}

fn print_summary(stats: &StatisticsAccumulator, players: &[PlayerInstance]) {
    println!("\n{}", "=".repeat(80));
    println!("SIMULATION SUMMARY");
    println!("{}", "=".repeat(80));

    println!("\nPlayer Summary:");
    println!("{:<15} {:<10} {:<12} {:<12}", "Player", "Wins", "Win Rate", "Avg Sets");
    println!("{}", "-".repeat(50));

    for player in players {
        let wins = stats.stats.wins_for(player.name());
        let win_rate = if stats.stats.games > 0 {
            (wins as f64 / stats.stats.games as f64) * 100.0
        } else {
            0.0
        };
        println!(
            "{:<15} {:<10} {:<11.1}% {:<12.2}",
            player.name(),
            wins,
            win_rate,
            stats.stats.get_avg_full_sets(player.name())
        );
    }

    println!("\nGame Summary:");
    println!("  Total Games: {}", stats.stats.games);
    println!("  No Winner: {}", stats.stats.draws);
    println!("  Avg Turns: {:.2}", stats.stats.get_avg_turns());
    println!("  Avg Events: {:.2}", stats.stats.get_avg_events());
    println!("  Avg Duration: {:.2?}", stats.stats.get_avg_duration());
}
