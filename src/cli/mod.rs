pub mod config;
pub mod players;
pub mod stats;

pub use config::{CliError, load_config, write_record};
pub use players::{CLI_PLAYERS, CliPlayer, PlayerInstance, create_player, parse_lineup, print_player_help};
pub use stats::{GameStats, StatisticsAccumulator};
