use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::models::RateLimitState;
use crate::types::{decode_body, Organization, Repository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use std::sync::RwLock;
use tracing::{debug, warn};
use url::Url;

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
const LOW_RATE_LIMIT: u32 = 10;

/// Source of organization and repository data.
///
/// `GitHubClient` talks to the REST API; tests substitute an in-memory source.
#[async_trait]
pub trait RepoSource: Send + Sync {
    async fn fetch_organization(&self, org: &str, credential: Option<&str>)
        -> Result<Organization>;

    /// One page of repositories, most recently updated first. Pages start at 1.
    async fn fetch_repository_page(
        &self,
        org: &str,
        page: u32,
        per_page: u32,
        credential: Option<&str>,
    ) -> Result<Vec<Repository>>;
}

pub struct GitHubClient {
    client: Client,
    base_url: Url,
    rate_limit: RwLock<Option<RateLimitState>>,
}

impl GitHubClient {
    pub fn new(config: &DashboardConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(GitHubClient {
            client,
            base_url: config.api_base_url.clone(),
            rate_limit: RwLock::new(None),
        })
    }

    /// Rate limit reported by the most recent response that carried the headers.
    pub fn last_rate_limit(&self) -> Option<RateLimitState> {
        self.rate_limit.read().ok().and_then(|guard| guard.clone())
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DashboardError::RequestFailed {
                status: 0,
                detail: format!("API base URL cannot take a path: {}", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn make_request(&self, url: Url, credential: Option<&str>) -> Result<(u16, Vec<u8>)> {
        let mut request = self.client.get(url.clone()).header(ACCEPT, GITHUB_ACCEPT);
        if let Some(token) = credential.filter(|t| !t.is_empty()) {
            request = request.header(AUTHORIZATION, format!("token {}", token));
        }

        debug!(%url, authenticated = credential.is_some(), "Issuing GitHub request");
        let response = request.send().await?;

        let rate_limit = rate_limit_from_headers(response.headers());
        if let Some(state) = &rate_limit {
            if state.remaining < LOW_RATE_LIMIT {
                warn!(
                    remaining = state.remaining,
                    reset_time = %state.reset_time,
                    "GitHub rate limit running low"
                );
            }
            if let Ok(mut guard) = self.rate_limit.write() {
                *guard = Some(state.clone());
            }
        }

        let status = response.status();
        match status {
            s if s.is_success() => {
                let body = response
                    .bytes()
                    .await
                    .map_err(|e| DashboardError::RequestFailed {
                        status: s.as_u16(),
                        detail: format!("failed to read response body: {}", e),
                    })?;
                debug!(%url, status = s.as_u16(), bytes = body.len(), "GitHub request complete");
                Ok((s.as_u16(), body.to_vec()))
            }
            StatusCode::NOT_FOUND => {
                Err(DashboardError::NotFound(format!("{} returned 404", url.path())))
            }
            StatusCode::FORBIDDEN => {
                let detail = match rate_limit {
                    Some(state) if state.is_limited => {
                        format!("API rate limit exceeded. Resets at {}", state.reset_time)
                    }
                    _ => format!("{} returned 403", url.path()),
                };
                Err(DashboardError::RateLimitedOrForbidden(detail))
            }
            status => Err(DashboardError::RequestFailed {
                status: status.as_u16(),
                detail: status.canonical_reason().unwrap_or("Unknown status").to_string(),
            }),
        }
    }
}

#[async_trait]
impl RepoSource for GitHubClient {
    async fn fetch_organization(
        &self,
        org: &str,
        credential: Option<&str>,
    ) -> Result<Organization> {
        let org = validate_org_name(org)?;
        let url = self.endpoint(&["orgs", org])?;
        let (status, body) = self.make_request(url, credential).await?;
        decode_body(status, &body)
    }

    async fn fetch_repository_page(
        &self,
        org: &str,
        page: u32,
        per_page: u32,
        credential: Option<&str>,
    ) -> Result<Vec<Repository>> {
        let org = validate_org_name(org)?;
        let mut url = self.endpoint(&["orgs", org, "repos"])?;
        url.query_pairs_mut()
            .append_pair("per_page", &per_page.to_string())
            .append_pair("page", &page.max(1).to_string())
            .append_pair("sort", "updated");

        let (status, body) = self.make_request(url, credential).await?;
        decode_body(status, &body)
    }
}

fn validate_org_name(org: &str) -> Result<&str> {
    let trimmed = org.trim();
    if trimmed.is_empty() {
        return Err(DashboardError::InvalidOrganization(org.to_string()));
    }
    Ok(trimmed)
}

/// Parse the `X-RateLimit-*` headers, if the response carries them.
pub fn rate_limit_from_headers(headers: &HeaderMap) -> Option<RateLimitState> {
    let header_value = |name: &str| headers.get(name).and_then(|h| h.to_str().ok());

    let remaining = header_value("X-RateLimit-Remaining")?.parse::<u32>().ok()?;

    let limit = header_value("X-RateLimit-Limit")
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(remaining);

    let reset_time = header_value("X-RateLimit-Reset")
        .and_then(|s| s.parse::<i64>().ok())
        .and_then(|timestamp| DateTime::from_timestamp(timestamp, 0))
        .unwrap_or_else(|| Utc::now() + chrono::Duration::hours(1));

    Some(RateLimitState {
        remaining,
        limit,
        reset_time,
        is_limited: remaining == 0,
    })
}
