mod article;
mod language;

pub use article::{published_within_days, sort_newest_first, Article, Category};
pub use language::Language;
