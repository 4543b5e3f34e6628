//! laddersync - pull a ranked ladder from the Riot API into SQLite.
//!
//! One invocation is one (region, tier) run: list the ladder, resolve every
//! entry to its persistent identifiers, bulk-insert the batch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use laddersync::config;
use laddersync::riot::RiotClient;
use laddersync::sync::{run_sync, SyncOptions};

#[derive(Parser, Debug)]
#[command(name = "laddersync")]
#[command(about = "Sync ranked-ladder player identities into a local SQLite database")]
struct Args {
    /// Region code (NA, EUW, EUN, BR, JP, KR, LA, OC, TR, RU, PH, SG, TH, TW, VN)
    #[arg(short, long, default_value = "NA")]
    region: String,

    /// Ranked tier (iron through challenger, case-insensitive)
    #[arg(short, long, default_value = "Master")]
    tier: String,

    /// Division within the tier: 1-4, or empty for the top leagues
    #[arg(short, long, default_value = "")]
    division: String,

    /// Page of the paginated entries endpoint (ignored for top leagues)
    #[arg(short, long, default_value_t = 1)]
    page: u32,

    /// File whose first line is the Riot API key
    #[arg(long, default_value = "API.in", env = "RIOT_API_KEY_FILE")]
    key_file: PathBuf,

    /// SQLite database path (defaults to ./db/data.db)
    #[arg(long, env = "LADDERSYNC_DB")]
    db: Option<PathBuf>,

    /// Cap on rate-limit retries per request; retries forever when unset
    #[arg(long)]
    max_retries: Option<u32>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    let api_key = config::load_api_key(&args.key_file)
        .with_context(|| format!("no usable API key (key file: {})", args.key_file.display()))?;

    let client = RiotClient::new(api_key, &args.region)
        .context("invalid run configuration")?
        .with_max_retries(args.max_retries);

    let opts = SyncOptions {
        region: args.region,
        tier: args.tier,
        division: args.division,
        page: args.page,
        db_path: config::resolve_db_path(args.db),
    };

    let report = run_sync(&client, &opts)
        .await
        .context("ladder sync failed")?;

    info!(
        "Done: {} players persisted ({} summoner lookups)",
        report.records, report.lookups
    );
    Ok(())
}
