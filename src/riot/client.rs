//! Authenticated Riot API client.
//!
//! One `reqwest::Client` per run, the API key in the `X-Riot-Token` header
//! on every request. Rate-limited responses are retried in place after the
//! server-mandated wait; everything else non-200 is fatal to the run.

use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::{routes, RiotError, RiotResult};
use crate::models::{LeagueListing, SummonerIds};

const RIOT_TOKEN_HEADER: &str = "X-Riot-Token";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Safety margin added on top of the server-supplied Retry-After wait.
const RETRY_MARGIN_SECS: u64 = 1;

pub struct RiotClient {
    http: Client,
    api_key: String,
    base_url: String,
    /// Rate-limit retry ceiling per request; `None` retries forever.
    max_retries: Option<u32>,
}

impl RiotClient {
    /// Build a client for one region. Fails before any network call if the
    /// region code is unknown.
    pub fn new(api_key: String, region: &str) -> RiotResult<Self> {
        let base_url = routes::region_base_url(region)?.to_string();
        Ok(Self::with_base_url(api_key, base_url))
    }

    /// Build a client against an explicit base URL (tests point this at a
    /// local mock server).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http,
            api_key,
            base_url,
            max_retries: None,
        }
    }

    /// Cap rate-limit retries per request; `None` preserves unbounded retry.
    pub fn with_max_retries(mut self, max_retries: Option<u32>) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch one page of the ladder listing for a tier.
    pub async fn fetch_ladder(
        &self,
        tier: &str,
        division: &str,
        page: u32,
    ) -> RiotResult<LeagueListing> {
        let path = routes::ladder_path(tier, division, page)?;
        self.get_json(&self.url(&path)).await
    }

    /// Resolve one summoner id to its persistent identifiers.
    pub async fn fetch_summoner(&self, summoner_id: &str) -> RiotResult<SummonerIds> {
        let path = routes::summoner_path(summoner_id);
        self.get_json(&self.url(&path)).await
    }

    /// GET a URL and classify the outcome.
    ///
    /// 429 sleeps for the server's Retry-After plus a one-second margin and
    /// retries the identical request; the loop is iterative and unbounded
    /// unless a ceiling was configured.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> RiotResult<T> {
        let mut attempts: u32 = 0;

        loop {
            let response = self
                .http
                .get(url)
                .header(RIOT_TOKEN_HEADER, &self.api_key)
                .send()
                .await?;

            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                attempts += 1;
                if let Some(max) = self.max_retries {
                    if attempts > max {
                        return Err(RiotError::RetriesExhausted {
                            url: url.to_string(),
                            attempts,
                        });
                    }
                }

                let wait_secs = parse_retry_after(response.headers()).ok_or_else(|| {
                    RiotError::MalformedResponse {
                        url: url.to_string(),
                        detail: "429 without a usable Retry-After header".to_string(),
                    }
                })?;
                let wait = Duration::from_secs(wait_secs + RETRY_MARGIN_SECS);
                warn!(
                    "Rate limited on {} (attempt {}), waiting {}s before retry",
                    url,
                    attempts,
                    wait.as_secs()
                );
                sleep(wait).await;
                continue;
            }

            if !status.is_success() {
                let reason = status
                    .canonical_reason()
                    .unwrap_or("unknown reason")
                    .to_string();
                let body = response.text().await.unwrap_or_default();
                debug!("Error body from {}: {}", url, body);
                return Err(RiotError::UnexpectedStatus {
                    status: status.as_u16(),
                    reason,
                    url: url.to_string(),
                });
            }

            let body = response.text().await?;
            return serde_json::from_str(&body).map_err(|e| RiotError::MalformedResponse {
                url: url.to_string(),
                detail: e.to_string(),
            });
        }
    }
}

/// Extract the Retry-After wait in whole seconds, if present and numeric.
fn parse_retry_after(headers: &HeaderMap) -> Option<u64> {
    headers.get(RETRY_AFTER)?.to_str().ok()?.trim().parse().ok()
}
