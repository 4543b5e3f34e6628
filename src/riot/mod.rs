//! Riot API surface: route construction and the authenticated fetch client.

pub mod client;
pub mod routes;

pub use client::RiotClient;

/// Riot API errors.
///
/// The validation variants are raised by the route builders before any
/// network call; the rest classify HTTP outcomes. Only the rate-limit case
/// is ever retried, and `RetriesExhausted` is reachable only when a retry
/// ceiling has been configured.
#[derive(Debug, thiserror::Error)]
pub enum RiotError {
    /// Region code outside the known platform set
    #[error("unknown region code: {0}")]
    InvalidRegion(String),

    /// Tier name outside the known tier set
    #[error("unknown tier: {0}")]
    InvalidTier(String),

    /// Division outside {"", 1, 2, 3, 4}
    #[error("invalid division: {0}")]
    InvalidDivision(String),

    /// Top leagues (master and above) are division-less leaderboards
    #[error("tier {0} is a top league and takes no division")]
    TierDivisionConflict(String),

    /// Network-level failure reaching the API
    #[error("connection to Riot API failed: {0}")]
    Connection(#[from] reqwest::Error),

    /// Any non-200/429 response
    #[error("unexpected status {status} ({reason}) from {url}")]
    UnexpectedStatus {
        status: u16,
        reason: String,
        url: String,
    },

    /// Response body did not match the expected shape
    #[error("malformed response from {url}: {detail}")]
    MalformedResponse { url: String, detail: String },

    /// Rate-limit retry ceiling hit (only with an explicit --max-retries)
    #[error("gave up on {url} after {attempts} rate-limited attempts")]
    RetriesExhausted { url: String, attempts: u32 },
}

/// Result type for Riot API operations
pub type RiotResult<T> = Result<T, RiotError>;
