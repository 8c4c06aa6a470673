//! Query lifecycle for the dashboard view.
//!
//! The controller owns the effective organization, page cursor, sort key and
//! credential. Fetches are issued as tagged [`FetchRequest`]s and executed by
//! [`run_request`] without borrowing the controller, so a response that comes
//! back after the query moved on can be recognised and discarded in
//! [`Dashboard::apply`].

use crate::accumulator::RepoAccumulator;
use crate::cache::{OrgCache, OrgFetch};
use crate::derive::{language_statistics, sort_repositories};
use crate::error::{DashboardError, Result};
use crate::github::RepoSource;
use crate::models::{LanguageStat, QueryKey, SortKey};
use crate::types::{Organization, Repository};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A fetch tagged with the query that was active when it was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub query: QueryKey,
    pub page: u32,
    pub force_refresh: bool,
}

#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub request: FetchRequest,
    pub org: Result<Organization>,
    /// `None` when a later page was never requested because the organization failed.
    pub repos: Option<Result<Vec<Repository>>>,
}

/// What [`Dashboard::apply`] did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Current,
    /// Same query, different page: merged into the accumulator only.
    StalePage,
    /// Organization or credential changed since the request was issued.
    Discarded,
}

/// Execute a request against the cache. Page 1 comes from the cached
/// organization data; later pages are fetched directly once the organization
/// is known. Each side reports its own outcome.
pub async fn run_request<S: RepoSource>(cache: &OrgCache<S>, request: FetchRequest) -> FetchOutcome {
    let org_name = request.query.org.as_str();
    let credential = request.query.credential.as_deref();

    debug!(org = org_name, page = request.page, force_refresh = request.force_refresh, "Running fetch");

    let OrgFetch { org, repos } = cache.load(org_name, credential, request.force_refresh).await;
    if request.page <= 1 {
        return FetchOutcome {
            request,
            org,
            repos: Some(repos),
        };
    }

    let repos = match &org {
        Ok(_) => {
            let page = cache.fetch_page(org_name, request.page, credential).await;
            if let Err(e) = &page {
                warn!(org = org_name, page = request.page, error = %e, "Repository page fetch failed");
            }
            Some(page)
        }
        Err(_) => None,
    };

    FetchOutcome { request, org, repos }
}

/// Read-only snapshot handed to the presentation layer.
#[derive(Debug)]
pub struct DashboardView<'a> {
    pub org: Option<&'a Organization>,
    pub repos: &'a [Repository],
    pub language_stats: &'a [LanguageStat],
    pub current_page: u32,
    pub has_next: bool,
    pub has_previous: bool,
    pub is_loading: bool,
    pub error: Option<&'a DashboardError>,
}

impl DashboardView<'_> {
    pub fn error_message(&self) -> Option<String> {
        self.error.map(DashboardError::user_message)
    }
}

pub struct Dashboard<S> {
    cache: Arc<OrgCache<S>>,
    search_text: String,
    org_name: Option<String>,
    credential: Option<String>,
    page: u32,
    sort: SortKey,
    accumulator: RepoAccumulator,
    org: Option<Organization>,
    page_repos: Vec<Repository>,
    org_error: Option<DashboardError>,
    repos_error: Option<DashboardError>,
    pending: Option<FetchRequest>,
    // derived
    sorted: Vec<Repository>,
    language_stats: Vec<LanguageStat>,
}

impl<S: RepoSource> Dashboard<S> {
    pub fn new(cache: Arc<OrgCache<S>>) -> Self {
        Self {
            cache,
            search_text: String::new(),
            org_name: None,
            credential: None,
            page: 1,
            sort: SortKey::default(),
            accumulator: RepoAccumulator::new(),
            org: None,
            page_repos: Vec::new(),
            org_error: None,
            repos_error: None,
            pending: None,
            sorted: Vec::new(),
            language_stats: Vec::new(),
        }
    }

    /// Store raw input. Takes effect on [`Dashboard::commit_search`].
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Apply the settled search text as the effective organization.
    ///
    /// Returns `true` when the organization changed, in which case the page
    /// cursor and accumulator were reset.
    pub fn commit_search(&mut self) -> bool {
        let trimmed = self.search_text.trim();
        let next = (!trimmed.is_empty()).then(|| trimmed.to_string());
        if next == self.org_name {
            return false;
        }

        info!(from = ?self.org_name, to = ?next, "Organization query changed");
        self.org_name = next;
        self.page = 1;
        self.clear_query_state();
        true
    }

    /// Set and immediately commit the search text.
    pub fn search(&mut self, text: impl Into<String>) -> bool {
        self.set_search_text(text);
        self.commit_search()
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        if self.sort != sort {
            self.sort = sort;
            self.recompute();
        }
    }

    /// Change the credential. A different credential starts a fresh accumulator.
    pub fn set_credential(&mut self, credential: Option<String>) -> bool {
        let credential = credential.filter(|c| !c.trim().is_empty());
        if credential == self.credential {
            return false;
        }

        debug!(authenticated = credential.is_some(), "Credential changed");
        self.credential = credential;
        self.clear_query_state();
        true
    }

    pub fn next_page(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.page += 1;
        self.clear_page();
        true
    }

    pub fn previous_page(&mut self) -> bool {
        if self.page <= 1 {
            return false;
        }
        self.page -= 1;
        self.clear_page();
        true
    }

    pub fn query_key(&self) -> Option<QueryKey> {
        self.org_name.as_ref().map(|org| QueryKey {
            org: org.clone(),
            credential: self.credential.clone(),
        })
    }

    /// Issue a request for the current query and page. `None` without an organization.
    pub fn request(&mut self, force_refresh: bool) -> Option<FetchRequest> {
        let request = FetchRequest {
            query: self.query_key()?,
            page: self.page,
            force_refresh,
        };
        self.pending = Some(request.clone());
        Some(request)
    }

    /// Re-issue the current request with a forced refresh, if the last one
    /// failed with an error that another attempt could clear.
    pub fn retry(&mut self) -> Option<FetchRequest> {
        if !self.error().is_some_and(DashboardError::is_retryable) {
            return None;
        }
        info!(org = ?self.org_name, page = self.page, "Retrying failed fetch");
        self.request(true)
    }

    pub fn apply(&mut self, outcome: FetchOutcome) -> Applied {
        let FetchOutcome { request, org, repos } = outcome;

        if self.pending.as_ref() == Some(&request) {
            self.pending = None;
        }

        if Some(&request.query) != self.query_key().as_ref() {
            info!(org = %request.query.org, page = request.page, "Discarding response for a previous query");
            return Applied::Discarded;
        }

        if request.page != self.page {
            if let Some(Ok(page)) = &repos {
                self.accumulator.merge(page);
                self.recompute();
            }
            debug!(page = request.page, current = self.page, "Response for another page merged into statistics only");
            return Applied::StalePage;
        }

        match org {
            Ok(org) => {
                self.org = Some(org);
                self.org_error = None;
            }
            Err(e) => {
                warn!(org = %request.query.org, error = %e, "Organization fetch failed");
                self.org_error = Some(e);
            }
        }

        match repos {
            Some(Ok(page)) => {
                let added = self.accumulator.merge(&page);
                debug!(page = request.page, fetched = page.len(), added, total = self.accumulator.len(), "Merged repository page");
                self.page_repos = page;
                self.repos_error = None;
            }
            Some(Err(e)) => {
                self.page_repos.clear();
                self.repos_error = Some(e);
            }
            None => {}
        }

        self.recompute();
        Applied::Current
    }

    /// Issue, run and apply a request for the current state.
    pub async fn load(&mut self) -> Option<Applied> {
        let request = self.request(false)?;
        Some(self.run_and_apply(request).await)
    }

    pub async fn retry_load(&mut self) -> Option<Applied> {
        let request = self.retry()?;
        Some(self.run_and_apply(request).await)
    }

    async fn run_and_apply(&mut self, request: FetchRequest) -> Applied {
        let cache = Arc::clone(&self.cache);
        let outcome = run_request(&cache, request).await;
        self.apply(outcome)
    }

    pub fn current_page(&self) -> u32 {
        self.page
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    pub fn organization_name(&self) -> Option<&str> {
        self.org_name.as_deref()
    }

    pub fn accumulated(&self) -> &[Repository] {
        self.accumulator.repos()
    }

    /// Approximation: a full page suggests another one exists.
    pub fn has_next(&self) -> bool {
        self.repos_error.is_none()
            && !self.page_repos.is_empty()
            && self.page_repos.len() == self.cache.per_page() as usize
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// First error to display; organization failures take precedence.
    pub fn error(&self) -> Option<&DashboardError> {
        self.org_error.as_ref().or(self.repos_error.as_ref())
    }

    pub fn errors(&self) -> (Option<&DashboardError>, Option<&DashboardError>) {
        (self.org_error.as_ref(), self.repos_error.as_ref())
    }

    pub fn view(&self) -> DashboardView<'_> {
        DashboardView {
            org: self.org.as_ref(),
            repos: &self.sorted,
            language_stats: &self.language_stats,
            current_page: self.page,
            has_next: self.has_next(),
            has_previous: self.has_previous(),
            is_loading: self.is_loading(),
            error: self.error(),
        }
    }

    fn clear_page(&mut self) {
        self.page_repos.clear();
        self.repos_error = None;
        self.recompute();
    }

    fn clear_query_state(&mut self) {
        self.accumulator.reset();
        self.org = None;
        self.org_error = None;
        self.pending = None;
        self.clear_page();
    }

    fn recompute(&mut self) {
        self.sorted = sort_repositories(&self.page_repos, self.sort);
        self.language_stats = if self.accumulator.is_empty() {
            language_statistics(&self.sorted)
        } else {
            language_statistics(self.accumulator.repos())
        };
    }
}
