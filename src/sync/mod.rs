//! Two-phase ladder sync: listing fetch, per-entry identity resolution,
//! bulk persist.
//!
//! Strictly sequential: one request in flight at a time, entries resolved in
//! listing order. The per-player lookup is the dominant cost (one round trip
//! per entry; the listing endpoint does not embed the resolved identifiers).

use std::path::PathBuf;

use tracing::{debug, info};

use crate::models::PlayerRecord;
use crate::riot::{RiotClient, RiotError};
use crate::storage::{PlayerStore, StorageError, PLAYERS_TABLE};

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Riot(#[from] RiotError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// One (region, tier) run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub region: String,
    pub tier: String,
    pub division: String,
    pub page: u32,
    pub db_path: PathBuf,
}

/// Outcome of a completed run. `lookups` counts successful per-player
/// requests; diagnostic only, never persisted.
#[derive(Debug, Clone, Copy)]
pub struct SyncReport {
    pub records: usize,
    pub lookups: u64,
}

/// Run one full sync: fetch the ladder listing, resolve every entry to its
/// persistent identifiers, and commit the batch.
///
/// Any fatal error aborts immediately; entries resolved but not yet
/// persisted are discarded.
pub async fn run_sync(client: &RiotClient, opts: &SyncOptions) -> Result<SyncReport, SyncError> {
    info!(
        "Starting ladder sync: region={} tier={} division={:?} page={}",
        opts.region, opts.tier, opts.division, opts.page
    );

    let listing = client
        .fetch_ladder(&opts.tier, &opts.division, opts.page)
        .await?;
    info!("Listing returned {} entries", listing.entries.len());

    let mut lookups = 0u64;
    let mut records = Vec::with_capacity(listing.entries.len());
    for entry in &listing.entries {
        let ids = client.fetch_summoner(&entry.summoner_id).await?;
        lookups += 1;
        debug!(
            "Resolved {} -> {} ({} lookups so far)",
            entry.summoner_name, ids.puuid, lookups
        );

        records.push(PlayerRecord {
            puuid: ids.puuid,
            summoner_id: entry.summoner_id.clone(),
            account_id: ids.account_id,
            summoner_name: entry.summoner_name.clone(),
            region: opts.region.clone(),
        });
    }

    let mut store = PlayerStore::open(&opts.db_path)?;
    let inserted = store.insert_players(&records)?;
    info!(
        "Sync complete: {} players persisted to {} after {} lookups",
        inserted, PLAYERS_TABLE, lookups
    );

    Ok(SyncReport {
        records: inserted,
        lookups,
    })
}
