use std::time::Duration;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_PER_PAGE: u32 = 10;
pub const CACHE_FRESHNESS: Duration = Duration::from_secs(5 * 60);

/// Settings shared by the fetch, cache and controller layers.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub api_base_url: Url,
    pub per_page: u32,
    pub cache_ttl: Duration,
    pub user_agent: String,
    /// Left unset by default; the transport's own timeout applies.
    pub request_timeout: Option<Duration>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_BASE_URL).expect("default API URL is valid"),
            per_page: DEFAULT_PER_PAGE,
            cache_ttl: CACHE_FRESHNESS,
            user_agent: format!("org-dashboard/{}", env!("CARGO_PKG_VERSION")),
            request_timeout: None,
        }
    }
}

impl DashboardConfig {
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.api_base_url = base_url;
        self
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.max(1);
        self
    }
}
