pub mod accumulator;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod derive;
pub mod error;
pub mod github;
pub mod models;
pub mod types;

pub use cache::{OrgCache, OrgFetch};
pub use config::DashboardConfig;
pub use dashboard::{Applied, Dashboard, DashboardView, FetchOutcome, FetchRequest};
pub use error::{DashboardError, Result};
pub use github::{GitHubClient, RepoSource};
pub use models::{LanguageStat, OrgData, SortKey};
pub use types::{Organization, Repository};
