mod client;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Article, Category, Language};

pub use client::ApiClient;

/// Read-only gateway to the news backend. The coordinator talks to this
/// trait so tests can substitute a scripted source for the HTTP client.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn categories(&self, language: Language) -> Result<Vec<Category>>;

    async fn articles(
        &self,
        language: Language,
        category_id: Option<i64>,
    ) -> Result<Vec<Article>>;
}
