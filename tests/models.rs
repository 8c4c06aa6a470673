use chrono::{TimeZone, Utc};
use org_dashboard::models::{CacheKey, OrgData, RateLimitState};
use org_dashboard::{Organization, Repository, SortKey};

fn sample_repo() -> Repository {
    Repository {
        id: 12345,
        name: "test-repo".to_string(),
        full_name: "owner/test-repo".to_string(),
        description: Some("Test repository".to_string()),
        html_url: "https://github.com/owner/test-repo".to_string(),
        stargazers_count: 100,
        forks_count: 12,
        language: Some("Rust".to_string()),
        created_at: Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        is_private: false,
    }
}

#[test]
fn test_repo_json_uses_api_field_names() {
    let json = serde_json::to_value(sample_repo()).unwrap();

    assert_eq!(json["private"], false);
    assert_eq!(json["stargazers_count"], 100);
    assert_eq!(json["updated_at"], "2024-01-01T00:00:00Z");
    assert!(json.get("is_private").is_none());
}

#[test]
fn test_org_data_creation() {
    let org = Organization {
        login: "owner".to_string(),
        avatar_url: "https://github.com/owner.png".to_string(),
        description: None,
        blog: Some("https://owner.dev".to_string()),
        location: None,
        public_repos: 1,
        followers: 5,
        following: 0,
    };
    let data = OrgData {
        org: org.clone(),
        repos: vec![sample_repo()],
    };

    assert_eq!(data.org, org);
    assert_eq!(data.repos.len(), 1);
    assert_eq!(data.repos[0].full_name, "owner/test-repo");
}

#[test]
fn test_cache_key_normalization() {
    let authed = CacheKey::new("owner", Some("ghp_abc"));
    assert_eq!(CacheKey::new("  owner\t", Some("ghp_abc")), authed);
    assert_ne!(authed, CacheKey::new("owner", None));

    let anonymous = CacheKey::new("owner", None);
    assert_eq!(CacheKey::new("owner", Some("")), anonymous);
    assert_eq!(anonymous.credential, CacheKey::ANONYMOUS);
}

#[test]
fn test_sort_key_default_and_display() {
    assert_eq!(SortKey::default(), SortKey::Stars);
    assert_eq!(SortKey::Recent.to_string(), "recent");
    assert_eq!(SortKey::from(SortKey::Forks.to_string().as_str()), SortKey::Forks);
}

#[test]
fn test_rate_limit_state_default() {
    let state = RateLimitState::default();
    assert_eq!(state.remaining, state.limit);
    assert!(!state.is_limited);
    assert!(state.reset_time > Utc::now());
}
