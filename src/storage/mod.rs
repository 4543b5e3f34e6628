//! SQLite persistence for resolved player identities.
//!
//! One table, keyed by puuid, appended to per run. Table creation and the
//! bulk insert for a run share a single IMMEDIATE transaction, so a failed
//! batch leaves no partial rows behind.

use std::path::Path;

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Transaction, TransactionBehavior};
use tracing::{debug, info};

use crate::models::PlayerRecord;

/// Destination table for player identities.
pub const PLAYERS_TABLE: &str = "summonerID";

const CREATE_PLAYERS_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS summonerID (
    puuid text PRIMARY KEY NOT NULL,
    summoner_id text NOT NULL,
    account_id text NOT NULL,
    summoner_name text NOT NULL,
    region text NOT NULL
);";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database file could not be opened or created
    #[error("failed to open database at {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Parent directory for the database file could not be created
    #[error("failed to create database directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Insert batch failed (and was rolled back)
    #[error("insert into {table} failed: {source}")]
    Insert {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Read query failed
    #[error("query against {table} failed: {source}")]
    Query {
        table: String,
        #[source]
        source: rusqlite::Error,
    },
}

pub struct PlayerStore {
    conn: Connection,
}

impl PlayerStore {
    /// Open (creating if needed) the database file, including its parent
    /// directory.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| StorageError::CreateDir {
                    path: parent.display().to_string(),
                    source,
                })?;
            }
        }

        let conn = Connection::open(path).map_err(|source| StorageError::Open {
            path: path.display().to_string(),
            source,
        })?;
        debug!("Opened database at {}", path.display());

        Ok(Self { conn })
    }

    /// In-memory store for tests.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|source| StorageError::Open {
            path: ":memory:".to_string(),
            source,
        })?;
        Ok(Self { conn })
    }

    /// Idempotent create of the players table. Returns the table name.
    pub fn create_players_table(&self) -> Result<&'static str, StorageError> {
        self.conn
            .execute_batch(CREATE_PLAYERS_TABLE_SQL)
            .map_err(|source| StorageError::Insert {
                table: PLAYERS_TABLE.to_string(),
                source,
            })?;
        Ok(PLAYERS_TABLE)
    }

    /// Bulk-insert tuple-shaped rows into `table`.
    ///
    /// Schema-agnostic: the placeholder list is derived from the width of
    /// the first row, so any column count inserts. The whole batch runs in
    /// one IMMEDIATE transaction.
    pub fn insert_rows(&mut self, table: &str, rows: &[Vec<Value>]) -> Result<usize, StorageError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|source| StorageError::Insert {
                table: table.to_string(),
                source,
            })?;

        let inserted = insert_rows_tx(&tx, table, rows)?;

        tx.commit().map_err(|source| StorageError::Insert {
            table: table.to_string(),
            source,
        })?;

        Ok(inserted)
    }

    /// Persist one run's worth of resolved players: table create (if absent)
    /// and the full batch insert, atomically.
    pub fn insert_players(&mut self, records: &[PlayerRecord]) -> Result<usize, StorageError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|source| StorageError::Insert {
                table: PLAYERS_TABLE.to_string(),
                source,
            })?;

        tx.execute_batch(CREATE_PLAYERS_TABLE_SQL)
            .map_err(|source| StorageError::Insert {
                table: PLAYERS_TABLE.to_string(),
                source,
            })?;

        let rows: Vec<Vec<Value>> = records.iter().map(player_row).collect();
        let inserted = insert_rows_tx(&tx, PLAYERS_TABLE, &rows)?;

        tx.commit().map_err(|source| StorageError::Insert {
            table: PLAYERS_TABLE.to_string(),
            source,
        })?;

        info!("📦 Committed {} players to {}", inserted, PLAYERS_TABLE);
        Ok(inserted)
    }

    /// All stored players, in insertion order.
    pub fn players(&self) -> Result<Vec<PlayerRecord>, StorageError> {
        let map_err = |source| StorageError::Query {
            table: PLAYERS_TABLE.to_string(),
            source,
        };

        let mut stmt = self
            .conn
            .prepare(
                "SELECT puuid, summoner_id, account_id, summoner_name, region
                 FROM summonerID ORDER BY rowid",
            )
            .map_err(map_err)?;

        let records = stmt
            .query_map([], |row| {
                Ok(PlayerRecord {
                    puuid: row.get(0)?,
                    summoner_id: row.get(1)?,
                    account_id: row.get(2)?,
                    summoner_name: row.get(3)?,
                    region: row.get(4)?,
                })
            })
            .map_err(map_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_err)?;

        Ok(records)
    }

    /// Number of stored players.
    pub fn player_count(&self) -> Result<usize, StorageError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM summonerID", [], |row| row.get(0))
            .map_err(|source| StorageError::Query {
                table: PLAYERS_TABLE.to_string(),
                source,
            })?;
        Ok(count as usize)
    }
}

fn insert_rows_tx(tx: &Transaction, table: &str, rows: &[Vec<Value>]) -> Result<usize, StorageError> {
    let width = match rows.first() {
        Some(first) => first.len(),
        None => return Ok(0),
    };

    let placeholders = (1..=width)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!("INSERT INTO {table} VALUES ({placeholders})");

    let map_err = |source| StorageError::Insert {
        table: table.to_string(),
        source,
    };

    let mut stmt = tx.prepare(&sql).map_err(map_err)?;
    let mut inserted = 0usize;
    for row in rows {
        inserted += stmt.execute(params_from_iter(row.iter())).map_err(map_err)?;
    }

    Ok(inserted)
}

fn player_row(record: &PlayerRecord) -> Vec<Value> {
    vec![
        Value::Text(record.puuid.clone()),
        Value::Text(record.summoner_id.clone()),
        Value::Text(record.account_id.clone()),
        Value::Text(record.summoner_name.clone()),
        Value::Text(record.region.clone()),
    ]
}
