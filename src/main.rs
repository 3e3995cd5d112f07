use anyhow::Context;
use chrono::Utc;
use tracing_subscriber::EnvFilter;

use newsdesk::models::Language;
use newsdesk::services::{build_daily_reminder, ArticleCache, LogScheduler, ReminderScheduler};
use newsdesk::{ApiClient, Config, FetchCoordinator};

/// Headless driver: one full load for the configured (language, category)
/// selection, article listing on stdout, and the daily reminder handed to
/// the logging scheduler. The platform UIs embed the library instead.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load().context("failed to load configuration")?;

    // First CLI argument overrides the configured language, e.g. `newsdesk en`.
    let language = std::env::args()
        .nth(1)
        .map(|arg| Language::parse(&arg))
        .unwrap_or(config.language);

    let client = ApiClient::new(&config.api_base_url).context("failed to build API client")?;
    let cache = ArticleCache::new(&config.cache_dir);
    let coordinator = FetchCoordinator::new(client.clone(), cache, language);

    coordinator.load().await;

    let state = coordinator.state();
    if let Some(error) = &state.error {
        eprintln!("warning: refresh failed ({error}); showing last known articles");
    }

    if state.articles.is_empty() {
        println!("No articles available.");
    } else {
        for article in &state.articles {
            println!(
                "{}  [{}]  {}",
                article.date.format("%Y-%m-%d %H:%M"),
                article.category_name,
                article.title
            );
        }
    }

    if config.notifications_enabled {
        let scheduler = LogScheduler;
        if scheduler.request_permission().await {
            let reminder = build_daily_reminder(
                &client,
                language,
                config.notification_hour,
                config.notification_minute,
                Utc::now(),
            )
            .await;
            scheduler
                .schedule(reminder)
                .await
                .context("failed to schedule daily reminder")?;
        }
    }

    Ok(())
}
