use crate::types::{Organization, Repository};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordering applied to the displayed page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Stars,
    Forks,
    Recent,
    /// Keeps the order returned by the API.
    Unsorted,
}

impl From<&str> for SortKey {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "stars" => SortKey::Stars,
            "forks" => SortKey::Forks,
            "recent" => SortKey::Recent,
            _ => SortKey::Unsorted,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortKey::Stars => "stars",
            SortKey::Forks => "forks",
            SortKey::Recent => "recent",
            SortKey::Unsorted => "unsorted",
        };
        f.write_str(name)
    }
}

/// One bucket of the language distribution chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageStat {
    pub name: String,
    pub count: usize,
    pub color: &'static str,
}

/// Organization together with its first page of repositories.
#[derive(Debug, Clone, PartialEq)]
pub struct OrgData {
    pub org: Organization,
    pub repos: Vec<Repository>,
}

/// Cache lookup key: organization plus credential, `anonymous` when none.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub org: String,
    pub credential: String,
}

impl CacheKey {
    pub const ANONYMOUS: &'static str = "anonymous";

    /// Surrounding whitespace in the name and an empty credential do not
    /// change which API resource is addressed, so they do not change the key.
    pub fn new(org: &str, credential: Option<&str>) -> Self {
        Self {
            org: org.trim().to_string(),
            credential: credential
                .filter(|c| !c.is_empty())
                .unwrap_or(Self::ANONYMOUS)
                .to_string(),
        }
    }
}

/// Identity of the active query. Responses tagged with a different key are stale.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub org: String,
    pub credential: Option<String>,
}

/// Rate limit state reported by the last API response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitState {
    pub remaining: u32,
    pub limit: u32,
    pub reset_time: DateTime<Utc>,
    pub is_limited: bool,
}

impl Default for RateLimitState {
    fn default() -> Self {
        Self {
            remaining: 60,
            limit: 60,
            reset_time: Utc::now() + chrono::Duration::hours(1),
            is_limited: false,
        }
    }
}
