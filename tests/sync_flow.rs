//! End-to-end sync tests against a local mock of the Riot endpoints.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::extract::{Path, RawQuery, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;

use laddersync::riot::{RiotClient, RiotError};
use laddersync::storage::PlayerStore;
use laddersync::sync::{run_sync, SyncError, SyncOptions};

const MASTER_LISTING_PATH: &str = "/lol/league/v4/masterleagues/by-queue/RANKED_SOLO_5x5";
const ENTRIES_LISTING_PATH: &str = "/lol/league/v4/entries/RANKED_SOLO_5x5/:tier/:division";
const SUMMONER_PATH: &str = "/lol/summoner/v4/summoners/:id";

/// Scripted behavior for one mock server instance.
struct MockState {
    listing_body: serde_json::Value,
    listing_hits: AtomicUsize,
    listing_query: Mutex<Option<String>>,
    lookup_hits: AtomicUsize,
    /// 429 every lookup until this many have been served.
    rate_limit_first_lookups: usize,
    retry_after: &'static str,
    lookups_return_500: bool,
}

impl MockState {
    fn with_entries(count: usize) -> Self {
        let entries: Vec<_> = (0..count)
            .map(|i| {
                json!({
                    "summonerId": format!("sid-{i}"),
                    "summonerName": format!("Player {i}"),
                    "leaguePoints": 100 + i,
                })
            })
            .collect();

        Self {
            listing_body: json!({ "entries": entries }),
            listing_hits: AtomicUsize::new(0),
            listing_query: Mutex::new(None),
            lookup_hits: AtomicUsize::new(0),
            rate_limit_first_lookups: 0,
            retry_after: "2",
            lookups_return_500: false,
        }
    }
}

async fn master_listing(State(state): State<Arc<MockState>>) -> Json<serde_json::Value> {
    state.listing_hits.fetch_add(1, Ordering::SeqCst);
    Json(state.listing_body.clone())
}

async fn entries_listing(
    State(state): State<Arc<MockState>>,
    Path((_tier, _division)): Path<(String, String)>,
    RawQuery(query): RawQuery,
) -> Json<serde_json::Value> {
    state.listing_hits.fetch_add(1, Ordering::SeqCst);
    *state.listing_query.lock().unwrap() = query;
    Json(state.listing_body.clone())
}

async fn summoner_lookup(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Response {
    let served = state.lookup_hits.fetch_add(1, Ordering::SeqCst);

    if served < state.rate_limit_first_lookups {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, state.retry_after)],
        )
            .into_response();
    }
    if state.lookups_return_500 {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    Json(json!({
        "puuid": format!("puuid-{id}"),
        "accountId": format!("acct-{id}"),
        "id": id,
    }))
    .into_response()
}

async fn spawn_mock(state: Arc<MockState>) -> String {
    let app = Router::new()
        .route(MASTER_LISTING_PATH, get(master_listing))
        .route(ENTRIES_LISTING_PATH, get(entries_listing))
        .route(SUMMONER_PATH, get(summoner_lookup))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock server");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

fn client_for(base: &str) -> RiotClient {
    RiotClient::with_base_url("RGAPI-test-key".to_string(), base.to_string())
}

fn options(db_path: std::path::PathBuf) -> SyncOptions {
    SyncOptions {
        region: "NA".to_string(),
        tier: "Master".to_string(),
        division: String::new(),
        page: 1,
        db_path,
    }
}

#[tokio::test]
async fn master_ladder_three_entries_full_sync() {
    let state = Arc::new(MockState::with_entries(3));
    let base = spawn_mock(state.clone()).await;
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("db/data.db");

    let report = run_sync(&client_for(&base), &options(db_path.clone()))
        .await
        .expect("Sync failed");

    assert_eq!(report.records, 3);
    assert_eq!(report.lookups, 3);

    // 1 listing + 3 lookups, nothing else.
    assert_eq!(state.listing_hits.load(Ordering::SeqCst), 1);
    assert_eq!(state.lookup_hits.load(Ordering::SeqCst), 3);

    let store = PlayerStore::open(&db_path).expect("Failed to reopen database");
    let players = store.players().expect("Failed to read players");
    assert_eq!(players.len(), 3);
    for (i, player) in players.iter().enumerate() {
        assert_eq!(player.puuid, format!("puuid-sid-{i}"));
        assert_eq!(player.summoner_id, format!("sid-{i}"));
        assert_eq!(player.account_id, format!("acct-sid-{i}"));
        assert_eq!(player.summoner_name, format!("Player {i}"));
        assert_eq!(player.region, "NA");
    }
}

#[tokio::test]
async fn paginated_tier_listing_carries_page_query() {
    let state = Arc::new(MockState::with_entries(1));
    let base = spawn_mock(state.clone()).await;
    let dir = tempfile::tempdir().unwrap();

    let opts = SyncOptions {
        tier: "gold".to_string(),
        division: "2".to_string(),
        page: 3,
        ..options(dir.path().join("data.db"))
    };

    let report = run_sync(&client_for(&base), &opts).await.expect("Sync failed");

    assert_eq!(report.records, 1);
    assert_eq!(
        state.listing_query.lock().unwrap().as_deref(),
        Some("page=3")
    );
}

#[tokio::test]
async fn rate_limited_lookup_waits_then_succeeds() {
    let state = Arc::new(MockState {
        rate_limit_first_lookups: 1,
        ..MockState::with_entries(1)
    });
    let base = spawn_mock(state.clone()).await;
    let dir = tempfile::tempdir().unwrap();

    let started = Instant::now();
    let report = run_sync(&client_for(&base), &options(dir.path().join("data.db")))
        .await
        .expect("Sync failed");

    // Retry-After: 2 plus the one-second margin.
    assert!(started.elapsed() >= Duration::from_secs(3));
    assert_eq!(report.records, 1);
    assert_eq!(report.lookups, 1);
    assert_eq!(state.lookup_hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn listing_without_entries_is_malformed() {
    let state = Arc::new(MockState {
        listing_body: json!({ "tier": "MASTER", "leagueId": "abc" }),
        ..MockState::with_entries(0)
    });
    let base = spawn_mock(state.clone()).await;
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("db/data.db");

    let err = run_sync(&client_for(&base), &options(db_path.clone()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SyncError::Riot(RiotError::MalformedResponse { .. })
    ));
    assert_eq!(state.lookup_hits.load(Ordering::SeqCst), 0);
    assert!(!db_path.exists());
}

#[tokio::test]
async fn lookup_server_error_aborts_run() {
    let state = Arc::new(MockState {
        lookups_return_500: true,
        ..MockState::with_entries(2)
    });
    let base = spawn_mock(state.clone()).await;
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("db/data.db");

    let err = run_sync(&client_for(&base), &options(db_path.clone()))
        .await
        .unwrap_err();

    match err {
        SyncError::Riot(RiotError::UnexpectedStatus { status, .. }) => assert_eq!(status, 500),
        other => panic!("expected UnexpectedStatus, got {other:?}"),
    }
    // First failed lookup aborts the run; nothing reaches storage.
    assert_eq!(state.lookup_hits.load(Ordering::SeqCst), 1);
    assert!(!db_path.exists());
}

#[tokio::test]
async fn retry_ceiling_gives_up() {
    let state = Arc::new(MockState {
        rate_limit_first_lookups: usize::MAX,
        retry_after: "0",
        ..MockState::with_entries(1)
    });
    let base = spawn_mock(state.clone()).await;
    let dir = tempfile::tempdir().unwrap();

    let client = client_for(&base).with_max_retries(Some(1));
    let err = run_sync(&client, &options(dir.path().join("data.db")))
        .await
        .unwrap_err();

    match err {
        SyncError::Riot(RiotError::RetriesExhausted { attempts, .. }) => assert_eq!(attempts, 2),
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
    assert_eq!(state.lookup_hits.load(Ordering::SeqCst), 2);
}
