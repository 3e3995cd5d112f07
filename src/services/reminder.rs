use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tracing::{info, warn};

use crate::api::NewsSource;
use crate::error::Result;
use crate::models::{Article, Language};

/// Identifier for the single daily reminder; scheduling under the same
/// id replaces whatever is still pending.
pub const DAILY_REMINDER_ID: &str = "news.daily";

const MAX_BODY_CHARS: usize = 100;

/// One local notification handed off to the platform scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub id: String,
    pub title: String,
    pub body: String,
    pub hour: u8,
    pub minute: u8,
    pub repeats: bool,
}

/// Platform notification delivery, out of scope for this crate beyond
/// the contract: permission is a single async boolean outcome, and
/// scheduling with an existing id replaces the pending reminder.
#[async_trait]
pub trait ReminderScheduler: Send + Sync {
    async fn request_permission(&self) -> bool;
    async fn schedule(&self, reminder: Reminder) -> Result<()>;
    async fn cancel(&self, id: &str) -> Result<()>;
}

/// Reference scheduler that only logs; real delivery belongs to the
/// platform shell embedding this crate.
#[derive(Debug, Clone, Default)]
pub struct LogScheduler;

#[async_trait]
impl ReminderScheduler for LogScheduler {
    async fn request_permission(&self) -> bool {
        true
    }

    async fn schedule(&self, reminder: Reminder) -> Result<()> {
        info!(
            id = %reminder.id,
            hour = reminder.hour,
            minute = reminder.minute,
            title = %reminder.title,
            "scheduled reminder"
        );
        Ok(())
    }

    async fn cancel(&self, id: &str) -> Result<()> {
        info!(id, "cancelled reminder");
        Ok(())
    }
}

/// Today at hour:minute if that is still ahead, otherwise tomorrow.
pub fn next_occurrence(hour: u8, minute: u8, now: DateTime<Utc>) -> DateTime<Utc> {
    let today = now
        .date_naive()
        .and_hms_opt(hour as u32, minute as u32, 0)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or(now);

    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

/// The window [most recent hour:minute occurrence, now], used to count
/// how many articles appeared since the previous reminder fired.
pub fn window_since_last(hour: u8, minute: u8, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let today = now
        .date_naive()
        .and_hms_opt(hour as u32, minute as u32, 0)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or(now);

    let start = if now >= today {
        today
    } else {
        today - Duration::days(1)
    };
    (start, now)
}

fn truncated(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push('…');
    out
}

fn fallback_title(language: Language) -> &'static str {
    match language {
        Language::Nl => "Vancoillie Nieuws",
        Language::En => "Vancoillie News",
    }
}

fn count_body(count: usize, language: Language) -> String {
    match (language, count) {
        (Language::Nl, 1) => "Er is 1 nieuw artikel.".to_string(),
        (Language::Nl, n) => format!("Er zijn {n} nieuwe artikelen."),
        (Language::En, 1) => "There is 1 new article.".to_string(),
        (Language::En, n) => format!("There are {n} new articles."),
    }
}

fn fallback_body(language: Language) -> &'static str {
    match language {
        Language::Nl => "Nieuwe artikels zijn beschikbaar.",
        Language::En => "New articles are available.",
    }
}

/// Dynamic reminder content: the newest article's title (truncated) when
/// one exists, and a localized count of articles published since the
/// previous hour:minute occurrence.
pub fn daily_content(
    articles: &[Article],
    hour: u8,
    minute: u8,
    now: DateTime<Utc>,
    language: Language,
) -> (String, String) {
    let (start, end) = window_since_last(hour, minute, now);
    let count = articles
        .iter()
        .filter(|a| a.date >= start && a.date <= end)
        .count();

    let title = articles
        .iter()
        .max_by_key(|a| a.date)
        .map(|a| truncated(&a.title, MAX_BODY_CHARS))
        .unwrap_or_else(|| fallback_title(language).to_string());

    let body = if count == 0 {
        fallback_body(language).to_string()
    } else {
        count_body(count, language)
    };

    (title, body)
}

/// Build the daily reminder from live data. A failed fetch falls back to
/// static localized content; the reminder path never errors out.
pub async fn build_daily_reminder<S: NewsSource>(
    source: &S,
    language: Language,
    hour: u8,
    minute: u8,
    now: DateTime<Utc>,
) -> Reminder {
    let (title, body) = match source.articles(language, None).await {
        Ok(articles) => daily_content(&articles, hour, minute, now, language),
        Err(e) => {
            warn!(error = %e, "reminder content fetch failed, using fallback text");
            (
                fallback_title(language).to_string(),
                fallback_body(language).to_string(),
            )
        }
    };

    Reminder {
        id: DAILY_REMINDER_ID.to_string(),
        title,
        body,
        hour,
        minute,
        repeats: true,
    }
}
