//! Pure URL builders for the Riot endpoints.
//!
//! No state, no I/O: region/tier/division validation and path formatting
//! only. Composition with a region base is the caller's one piece of glue.

use super::{RiotError, RiotResult};

/// Ranked queue every path in this tool targets.
pub const QUEUE: &str = "RANKED_SOLO_5x5";

/// Tiers that are single leaderboards with no divisions.
const TOP_TIERS: [&str; 3] = ["master", "grandmaster", "challenger"];

const TIERS: [&str; 9] = [
    "iron",
    "bronze",
    "silver",
    "gold",
    "platinum",
    "diamond",
    "master",
    "grandmaster",
    "challenger",
];

/// Resolve a region code to its platform base URL.
///
/// The 14 codes below are the full enumerated set; anything else is
/// `InvalidRegion`.
pub fn region_base_url(region: &str) -> RiotResult<&'static str> {
    let base = match region {
        "NA" => "https://na1.api.riotgames.com",
        "EUW" => "https://euw1.api.riotgames.com",
        "EUN" => "https://eun1.api.riotgames.com",
        "BR" => "https://br1.api.riotgames.com",
        "JP" => "https://jp1.api.riotgames.com",
        "KR" => "https://kr.api.riotgames.com",
        "LA" => "https://la1.api.riotgames.com",
        "OC" => "https://oc1.api.riotgames.com",
        "TR" => "https://tr1.api.riotgames.com",
        "RU" => "https://ru.api.riotgames.com",
        "PH" => "https://ph2.api.riotgames.com",
        "SG" => "https://sg2.api.riotgames.com",
        "TH" => "https://th2.api.riotgames.com",
        "TW" => "https://tw2.api.riotgames.com",
        "VN" => "https://vn2.api.riotgames.com",
        other => return Err(RiotError::InvalidRegion(other.to_string())),
    };
    Ok(base)
}

/// Build the ladder-listing path for a tier.
///
/// Tier is matched case-insensitively. Division is one of "" or "1"-"4"
/// (mapped to Roman numerals); the top leagues reject any non-empty
/// division. Top leagues get their fixed leaderboard path and ignore
/// `page`; every other tier gets the paginated entries path.
pub fn ladder_path(tier: &str, division: &str, page: u32) -> RiotResult<String> {
    let tier = tier.to_lowercase();

    let roman = match division {
        "" => "",
        "1" => "I",
        "2" => "II",
        "3" => "III",
        "4" => "IV",
        other => return Err(RiotError::InvalidDivision(other.to_string())),
    };

    if !TIERS.contains(&tier.as_str()) {
        return Err(RiotError::InvalidTier(tier));
    }

    if TOP_TIERS.contains(&tier.as_str()) {
        if !roman.is_empty() {
            return Err(RiotError::TierDivisionConflict(tier));
        }
        return Ok(format!("/lol/league/v4/{tier}leagues/by-queue/{QUEUE}"));
    }

    Ok(format!(
        "/lol/league/v4/entries/{QUEUE}/{tier}/{roman}?page={page}"
    ))
}

/// Build the per-player lookup path for an encrypted summoner id.
pub fn summoner_path(summoner_id: &str) -> String {
    format!("/lol/summoner/v4/summoners/{summoner_id}")
}
