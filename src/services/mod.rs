mod article_cache;
mod reminder;

pub use article_cache::ArticleCache;
pub use reminder::{
    build_daily_reminder, daily_content, next_occurrence, window_since_last, LogScheduler,
    Reminder, ReminderScheduler, DAILY_REMINDER_ID,
};
