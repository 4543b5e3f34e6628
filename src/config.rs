//! Run configuration: credentials and database location.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Environment override for the API key; takes precedence over the key file.
pub const API_KEY_ENV: &str = "RIOT_API_KEY";

/// Default database location relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "db/data.db";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read API key file {path}: {source}")]
    KeyFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("API key is empty (set RIOT_API_KEY or put the key on the first line of the key file)")]
    EmptyKey,
}

/// Load the Riot API key: the `RIOT_API_KEY` environment variable if set,
/// otherwise the first line of `path`, trimmed.
pub fn load_api_key(path: &Path) -> Result<String, ConfigError> {
    if let Ok(key) = env::var(API_KEY_ENV) {
        let key = key.trim().to_string();
        if !key.is_empty() {
            debug!("Using API key from {}", API_KEY_ENV);
            return Ok(key);
        }
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::KeyFile {
        path: path.display().to_string(),
        source,
    })?;
    let key = contents.lines().next().unwrap_or("").trim().to_string();
    if key.is_empty() {
        return Err(ConfigError::EmptyKey);
    }

    Ok(key)
}

/// Database path for a run: the explicit override if given, otherwise
/// `db/data.db` under the current working directory.
pub fn resolve_db_path(db: Option<PathBuf>) -> PathBuf {
    db.unwrap_or_else(|| {
        env::current_dir()
            .map(|cwd| cwd.join(DEFAULT_DB_PATH))
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_PATH))
    })
}
