use serde::Deserialize;

/// One player's placement in a ranked ladder listing.
///
/// Transient: consumed immediately to drive the per-player identity lookup,
/// never persisted as-is.
#[derive(Debug, Clone, Deserialize)]
pub struct LadderEntry {
    #[serde(rename = "summonerId")]
    pub summoner_id: String,
    #[serde(rename = "summonerName")]
    pub summoner_name: String,
}

/// Ladder listing response body. Both the paginated entries endpoint and the
/// top-league leaderboards return their players under `entries`.
#[derive(Debug, Deserialize)]
pub struct LeagueListing {
    pub entries: Vec<LadderEntry>,
}

/// Identity half of the summoner lookup response.
#[derive(Debug, Clone, Deserialize)]
pub struct SummonerIds {
    pub puuid: String,
    #[serde(rename = "accountId")]
    pub account_id: String,
}

/// The persisted unit: one fully resolved player identity.
///
/// `puuid` is globally unique per player and never reused; a record is
/// immutable once written (this tool has no update path).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    pub puuid: String,
    pub summoner_id: String,
    pub account_id: String,
    pub summoner_name: String,
    pub region: String,
}
