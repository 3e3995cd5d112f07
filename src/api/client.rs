use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::NewsSource;
use crate::error::{AppError, Result};
use crate::models::{Article, Category, Language};

/// HTTP gateway to the news API. One endpoint (`api.php`), dispatched on
/// the `action` query parameter, JSON response bodies.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("invalid API base URL: {e}")))?;

        // A hung connection must not stall the coordinator: bounded
        // connect and total-request timeouts, surfaced as Network errors.
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(20))
            .timeout(Duration::from_secs(40))
            .user_agent("newsdesk/1.0.2")
            .build()
            .expect("Failed to create HTTP client");

        Ok(Self { client, base_url })
    }

    async fn get_json<T: DeserializeOwned>(&self, query: &[(&str, String)]) -> Result<T> {
        let url = self
            .base_url
            .join("api.php")
            .map_err(|e| AppError::Config(format!("invalid API base URL: {e}")))?;

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(AppError::Network)?;

        let status = response.status();
        let body = response.text().await.map_err(AppError::Network)?;

        if !status.is_success() {
            // Body may hold backend diagnostics; keep it for the log.
            return Err(AppError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

fn categories_query(language: Language) -> Vec<(&'static str, String)> {
    vec![
        ("action", "categories".to_string()),
        ("lang", language.as_param().to_string()),
    ]
}

fn articles_query(language: Language, category_id: Option<i64>) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("action", "articles".to_string()),
        ("lang", language.as_param().to_string()),
    ];
    if let Some(id) = category_id {
        query.push(("category_id", id.to_string()));
    }
    query
}

#[async_trait]
impl NewsSource for ApiClient {
    async fn categories(&self, language: Language) -> Result<Vec<Category>> {
        let categories: Vec<Category> = self.get_json(&categories_query(language)).await?;
        tracing::debug!(lang = %language, "fetched {} categories", categories.len());
        Ok(categories)
    }

    async fn articles(
        &self,
        language: Language,
        category_id: Option<i64>,
    ) -> Result<Vec<Article>> {
        let articles: Vec<Article> = self.get_json(&articles_query(language, category_id)).await?;
        tracing::debug!(lang = %language, ?category_id, "fetched {} articles", articles.len());
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn article_json(id: i64, date: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "title": format!("Article {id}"),
            "description": "body",
            "date": date,
            "categoryID": 1,
            "categoryName": "General"
        })
    }

    // ==================== query building ====================

    #[test]
    fn test_categories_query_params() {
        let q = categories_query(Language::En);
        assert_eq!(
            q,
            vec![
                ("action", "categories".to_string()),
                ("lang", "en".to_string())
            ]
        );
    }

    #[test]
    fn test_articles_query_without_category() {
        let q = articles_query(Language::Nl, None);
        assert_eq!(
            q,
            vec![
                ("action", "articles".to_string()),
                ("lang", "nl".to_string())
            ]
        );
    }

    #[test]
    fn test_articles_query_with_category() {
        let q = articles_query(Language::Nl, Some(5));
        assert!(q.contains(&("category_id", "5".to_string())));
    }

    #[test]
    fn test_normalized_language_yields_identical_queries() {
        // "EN " and "en" must produce the same outbound parameters.
        let a = articles_query(Language::parse("EN "), None);
        let b = articles_query(Language::parse("en"), None);
        assert_eq!(a, b);
        assert_eq!(a[1], ("lang", "en".to_string()));

        // Anything else normalizes to nl.
        let c = articles_query(Language::parse("de"), None);
        assert_eq!(c[1], ("lang", "nl".to_string()));
    }

    // ==================== HTTP behavior ====================

    #[tokio::test]
    async fn test_fetch_articles_decodes_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/news/api.php"))
            .and(query_param("action", "articles"))
            .and(query_param("lang", "nl"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                article_json(1, "2025-10-11T10:00:00Z"),
                article_json(2, "2025-10-10T10:00:00Z"),
            ])))
            .mount(&server)
            .await;

        let client = ApiClient::new(&format!("{}/news/", server.uri())).unwrap();
        let articles = client.articles(Language::Nl, None).await.unwrap();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].id, 1);
        assert_eq!(articles[0].category_name, "General");
    }

    #[tokio::test]
    async fn test_fetch_articles_sends_category_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/news/api.php"))
            .and(query_param("category_id", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&format!("{}/news/", server.uri())).unwrap();
        let articles = client.articles(Language::Nl, Some(3)).await.unwrap();
        assert!(articles.is_empty());
    }

    #[tokio::test]
    async fn test_non_2xx_is_http_error_with_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/news/api.php"))
            .respond_with(ResponseTemplate::new(500).set_body_string("database down"))
            .mount(&server)
            .await;

        let client = ApiClient::new(&format!("{}/news/", server.uri())).unwrap();
        let err = client.categories(Language::Nl).await.unwrap_err();

        match err {
            AppError::Http { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "database down");
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_bad_date_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/news/api.php"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([article_json(1, "next tuesday")])),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(&format!("{}/news/", server.uri())).unwrap();
        let err = client.articles(Language::Nl, None).await.unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        // Nothing listens on this port.
        let client = ApiClient::new("http://127.0.0.1:9/news/").unwrap();
        let err = client.categories(Language::Nl).await.unwrap_err();
        assert!(matches!(err, AppError::Network(_)));
        assert!(err.is_transient());
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(ApiClient::new("not a url").is_err());
    }
}
