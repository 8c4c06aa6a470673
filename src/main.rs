mod cli;

use clap::Parser;
use cli::Cli;
use colored::*;
use org_dashboard::{
    Dashboard, DashboardConfig, DashboardView, GitHubClient, OrgCache, SortKey,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = DashboardConfig::default()
        .with_base_url(cli.api_url.clone())
        .with_per_page(cli.per_page);

    let client = Arc::new(GitHubClient::new(&config)?);
    let cache = Arc::new(OrgCache::new(client.clone(), &config));
    let mut dashboard = Dashboard::new(cache);

    dashboard.set_credential(cli.token.clone());
    dashboard.set_sort(SortKey::from(cli.sort.as_str()));
    dashboard.search(cli.org.as_str());

    println!("{}", "GitHub Organizations Dashboard".bold().green());
    println!("{}\n", "=".repeat(50).dimmed());

    for _ in 0..cli.pages.max(1) {
        dashboard.load().await;

        if dashboard.error().is_some() {
            // one retry, matching the interactive retry button
            dashboard.retry_load().await;
        }

        let view = dashboard.view();
        if let Some(message) = view.error_message() {
            eprintln!("❌ {}", message.red());
            if let Some(err) = view.error {
                eprintln!("   {}", err.to_string().dimmed());
            }
            std::process::exit(1);
        }

        render_page(&view);

        if !dashboard.next_page() {
            break;
        }
    }

    render_languages(&dashboard.view(), dashboard.accumulated().len());

    if let Some(rate_limit) = client.last_rate_limit() {
        println!(
            "\n{}",
            format!(
                "Rate limit: {}/{} remaining, resets at {}",
                rate_limit.remaining, rate_limit.limit, rate_limit.reset_time
            )
            .dimmed()
        );
    }

    Ok(())
}

fn render_page(view: &DashboardView<'_>) {
    if view.current_page == 1 {
        if let Some(org) = view.org {
            println!("{}", org.login.bold());
            if let Some(description) = &org.description {
                println!("{}", description);
            }
            let mut details = vec![format!("{} repositories", org.public_repos)];
            if let Some(location) = &org.location {
                details.push(location.clone());
            }
            println!("{}\n", details.join("  ·  ").dimmed());
        }
    }

    println!("{}", format!("Page {}", view.current_page).bold());
    if view.repos.is_empty() {
        println!("  {}", "No repositories found".yellow());
    }

    for repo in view.repos {
        println!(
            "  {}  ⭐ {}  🍴 {}  {}",
            repo.name.bold(),
            repo.stargazers_count,
            repo.forks_count,
            repo.language.as_deref().unwrap_or("—").cyan()
        );
        if let Some(description) = &repo.description {
            println!("      {}", description.dimmed());
        }
    }
    println!();
}

fn render_languages(view: &DashboardView<'_>, sample_size: usize) {
    if view.language_stats.is_empty() {
        return;
    }

    println!(
        "{}",
        format!("Languages across {} fetched repositories", sample_size).bold()
    );
    let widest = view.language_stats.iter().map(|s| s.count).max().unwrap_or(1);
    for stat in view.language_stats {
        let bar_len = (stat.count * 30).div_ceil(widest);
        println!(
            "  {:<18} {:>4}  {}",
            stat.name,
            stat.count,
            paint(&"█".repeat(bar_len), stat.color)
        );
    }
}

fn paint(text: &str, hex: &str) -> ColoredString {
    let channel = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
    };
    match (channel(1), channel(3), channel(5)) {
        (Some(r), Some(g), Some(b)) => text.truecolor(r, g, b),
        _ => text.normal(),
    }
}
