use clap::Parser;
use url::Url;

#[derive(Parser)]
#[command(name = "org-dashboard")]
#[command(about = "GitHub Organizations Dashboard - Browse an organization's repositories and language mix")]
#[command(version)]
pub struct Cli {
    /// Organization login to look up
    #[arg(long, short)]
    pub org: String,

    /// GitHub token, raises the rate limit
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Sort order for repositories: stars, forks or recent
    #[arg(long, default_value = "stars")]
    pub sort: String,

    /// Number of pages to walk through
    #[arg(long, default_value_t = 1)]
    pub pages: u32,

    /// Repositories per page
    #[arg(long, default_value_t = 10)]
    pub per_page: u32,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    pub api_url: Url,
}
