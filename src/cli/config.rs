use std::fs;
use std::path::{Path, PathBuf};

use crate::game::game::GameRecord;
use crate::game::state::GameConfig;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Reads a JSON config, filling unspecified fields with the rule defaults.
/// Without a file the batch-run defaults from [`GameConfig::simulation`]
/// apply.
pub fn load_config(path: Option<&Path>) -> Result<GameConfig, CliError> {
    let Some(path) = path else {
        return Ok(GameConfig::simulation());
    };
    let text = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    GameConfig::from_json(&text).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `<dir>/<game id>.json` and returns the path written.
pub fn write_record(dir: &Path, record: &GameRecord) -> Result<PathBuf, CliError> {
    fs::create_dir_all(dir).map_err(|source| CliError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(format!("{}.json", record.id));
    let json = serde_json::to_string_pretty(record).map_err(|source| CliError::Json {
        path: path.clone(),
        source,
    })?;
    fs::write(&path, json).map_err(|source| CliError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
