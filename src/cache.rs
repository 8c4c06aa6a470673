//! Time-boxed cache of organization data keyed by organization and credential.
//!
//! A miss fetches the organization and its first repository page concurrently
//! and stores both together when both succeed. Entries are only ever replaced
//! whole, so a failed refresh leaves the previous entry in place.

use crate::config::DashboardConfig;
use crate::error::Result;
use crate::github::RepoSource;
use crate::models::{CacheKey, OrgData};
use crate::types::{Organization, Repository};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub data: OrgData,
    pub captured_at: Instant,
    generation: u64,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.captured_at.elapsed() < ttl
    }
}

/// Both halves of an organization load, each with its own outcome.
#[derive(Debug, Clone)]
pub struct OrgFetch {
    pub org: Result<Organization>,
    pub repos: Result<Vec<Repository>>,
}

impl OrgFetch {
    fn into_data(self) -> Result<OrgData> {
        Ok(OrgData {
            org: self.org?,
            repos: self.repos?,
        })
    }
}

pub struct OrgCache<S> {
    source: Arc<S>,
    ttl: Duration,
    per_page: u32,
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    next_generation: AtomicU64,
}

impl<S: RepoSource> OrgCache<S> {
    pub fn new(source: Arc<S>, config: &DashboardConfig) -> Self {
        Self {
            source,
            ttl: config.cache_ttl,
            per_page: config.per_page,
            entries: Mutex::new(HashMap::new()),
            next_generation: AtomicU64::new(0),
        }
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Organization plus first repository page, served from cache while fresh.
    /// Fails if either half fails.
    pub async fn get_org_data(
        &self,
        org: &str,
        credential: Option<&str>,
        force_refresh: bool,
    ) -> Result<OrgData> {
        self.load(org, credential, force_refresh).await.into_data()
    }

    /// Same lookup as [`OrgCache::get_org_data`], keeping the organization and
    /// repository outcomes apart so a failure can be attributed to its side.
    pub async fn load(&self, org: &str, credential: Option<&str>, force_refresh: bool) -> OrgFetch {
        let key = CacheKey::new(org, credential);
        let org = key.org.clone();
        let credential = credential.filter(|c| !c.is_empty());

        if !force_refresh {
            let entries = self.entries.lock().await;
            if let Some(entry) = entries.get(&key) {
                if entry.is_fresh(self.ttl) {
                    debug!(org = %key.org, "Cache hit");
                    return OrgFetch {
                        org: Ok(entry.data.org.clone()),
                        repos: Ok(entry.data.repos.clone()),
                    };
                }
                debug!(org = %key.org, "Cache entry expired");
            }
        }

        // Stamped at issue time so a slower, older load cannot replace a newer entry.
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst);
        debug!(org = %key.org, force_refresh, generation, "Cache miss, fetching organization data");

        let (org_result, repos_result) = futures::join!(
            self.source.fetch_organization(&org, credential),
            self.source.fetch_repository_page(&org, 1, self.per_page, credential)
        );

        if let Err(e) = &org_result {
            warn!(org = %key.org, error = %e, "Failed to fetch organization");
        }
        if let Err(e) = &repos_result {
            warn!(org = %key.org, error = %e, "Failed to fetch first repository page");
        }

        if let (Ok(org_data), Ok(repos)) = (&org_result, &repos_result) {
            let data = OrgData {
                org: org_data.clone(),
                repos: repos.clone(),
            };
            self.store(key, generation, data).await;
        }

        OrgFetch {
            org: org_result,
            repos: repos_result,
        }
    }

    async fn store(&self, key: CacheKey, generation: u64, data: OrgData) {
        let mut entries = self.entries.lock().await;
        if let Some(existing) = entries.get(&key) {
            if existing.generation > generation {
                debug!(org = %key.org, generation, newer = existing.generation, "Dropping result of an older load");
                return;
            }
        }
        entries.insert(
            key,
            CacheEntry {
                data,
                captured_at: Instant::now(),
                generation,
            },
        );
    }

    /// Fetch a later page directly; pages are not cached.
    pub async fn fetch_page(
        &self,
        org: &str,
        page: u32,
        credential: Option<&str>,
    ) -> Result<Vec<Repository>> {
        self.source
            .fetch_repository_page(org, page, self.per_page, credential)
            .await
    }

    pub async fn entry(&self, org: &str, credential: Option<&str>) -> Option<CacheEntry> {
        self.entries
            .lock()
            .await
            .get(&CacheKey::new(org, credential))
            .cloned()
    }
}
