#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, TimeZone, Utc};
use org_dashboard::{DashboardConfig, GitHubClient, OrgCache, Organization, Repository};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use url::Url;

/// A request observed by the mock API.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: HashMap<String, String>,
    pub accept: Option<String>,
    pub authorization: Option<String>,
}

#[derive(Default)]
struct MockState {
    orgs: HashMap<String, Organization>,
    pages: HashMap<String, Vec<Vec<Repository>>>,
    failures: HashMap<String, (u16, Vec<(&'static str, String)>)>,
    malformed: HashMap<String, String>,
    requests: Vec<RecordedRequest>,
}

/// In-process stand-in for the GitHub REST API.
#[derive(Clone, Default)]
pub struct MockGitHub {
    state: Arc<Mutex<MockState>>,
}

impl MockGitHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an organization served with explicit repository pages.
    pub fn with_org(self, login: &str, pages: Vec<Vec<Repository>>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.orgs.insert(login.to_string(), organization(login));
            state.pages.insert(login.to_string(), pages);
        }
        self
    }

    /// Every request for `path` answers with `status` and the given headers.
    pub fn fail(&self, path: &str, status: u16, headers: Vec<(&'static str, String)>) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(path.to_string(), (status, headers));
    }

    pub fn heal(&self, path: &str) {
        self.state.lock().unwrap().failures.remove(path);
    }

    /// Answer `path` with a 200 and a raw body.
    pub fn serve_raw(&self, path: &str, body: &str) {
        self.state
            .lock()
            .unwrap()
            .malformed
            .insert(path.to_string(), body.to_string());
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests().iter().filter(|r| r.path == path).count()
    }

    pub async fn spawn(&self) -> Url {
        let app = Router::new()
            .route("/orgs/:org", get(org_handler))
            .route("/orgs/:org/repos", get(repos_handler))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Url::parse(&format!("http://{}", addr)).unwrap()
    }

    fn record(&self, path: &str, query: HashMap<String, String>, headers: &HeaderMap) -> Option<Response> {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        let mut state = self.state.lock().unwrap();
        state.requests.push(RecordedRequest {
            path: path.to_string(),
            query,
            accept: header("accept"),
            authorization: header("authorization"),
        });

        if let Some((status, extra)) = state.failures.get(path) {
            let status = StatusCode::from_u16(*status).unwrap();
            let mut response = (status, Json(serde_json::json!({ "message": "mock failure" }))).into_response();
            for (name, value) in extra.clone() {
                response.headers_mut().insert(name, value.parse().unwrap());
            }
            return Some(response);
        }

        state
            .malformed
            .get(path)
            .map(|body| (StatusCode::OK, body.clone()).into_response())
    }
}

async fn org_handler(
    State(mock): State<MockGitHub>,
    Path(org): Path<String>,
    headers: HeaderMap,
) -> Response {
    let path = format!("/orgs/{}", org);
    if let Some(response) = mock.record(&path, HashMap::new(), &headers) {
        return response;
    }

    match mock.state.lock().unwrap().orgs.get(&org) {
        Some(found) => Json(found.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(serde_json::json!({ "message": "Not Found" }))).into_response(),
    }
}

async fn repos_handler(
    State(mock): State<MockGitHub>,
    Path(org): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let path = format!("/orgs/{}/repos", org);
    let page = query
        .get("page")
        .and_then(|p| p.parse::<usize>().ok())
        .unwrap_or(1);
    if let Some(response) = mock.record(&path, query, &headers) {
        return response;
    }

    match mock.state.lock().unwrap().pages.get(&org) {
        Some(pages) => Json(pages.get(page - 1).cloned().unwrap_or_default()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(serde_json::json!({ "message": "Not Found" }))).into_response(),
    }
}

pub fn organization(login: &str) -> Organization {
    Organization {
        login: login.to_string(),
        avatar_url: format!("https://avatars.githubusercontent.com/{}", login),
        description: Some(format!("The {} organization", login)),
        blog: None,
        location: Some("Internet".to_string()),
        public_repos: 3,
        followers: 10,
        following: 0,
    }
}

pub fn timestamp(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, day, 8, 0, 0).unwrap()
}

pub fn repo(id: u64, stars: u32, language: Option<&str>) -> Repository {
    Repository {
        id,
        name: format!("repo-{}", id),
        full_name: format!("octocat-org/repo-{}", id),
        description: None,
        html_url: format!("https://github.com/octocat-org/repo-{}", id),
        stargazers_count: stars,
        forks_count: 0,
        language: language.map(str::to_string),
        created_at: timestamp(1),
        updated_at: timestamp(1 + (id % 28) as u32),
        is_private: false,
    }
}

pub struct TestContext {
    pub mock: MockGitHub,
    pub config: DashboardConfig,
    pub client: Arc<GitHubClient>,
    pub cache: Arc<OrgCache<GitHubClient>>,
}

impl TestContext {
    pub async fn new(mock: MockGitHub) -> Self {
        Self::with_per_page(mock, 10).await
    }

    pub async fn with_per_page(mock: MockGitHub, per_page: u32) -> Self {
        let base_url = mock.spawn().await;
        let config = DashboardConfig::default()
            .with_base_url(base_url)
            .with_per_page(per_page);
        let client = Arc::new(GitHubClient::new(&config).expect("Failed to create client"));
        let cache = Arc::new(OrgCache::new(client.clone(), &config));

        TestContext {
            mock,
            config,
            client,
            cache,
        }
    }
}
