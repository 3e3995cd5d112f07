use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// One news article as served by the backend. Immutable value object:
/// a fetch replaces the whole collection, never patches entries in place.
///
/// `id` is unique within a language edition only, not across editions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub description: String,
    #[serde(rename = "imageURL", default)]
    pub image_url: Option<Url>,
    #[serde(rename = "fullURL", default)]
    pub full_url: Option<Url>,
    pub date: DateTime<Utc>,
    #[serde(rename = "categoryID")]
    pub category_id: i64,
    #[serde(rename = "categoryName")]
    pub category_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Sort newest-first, the only display order the app uses.
pub fn sort_newest_first(articles: &mut [Article]) {
    articles.sort_by(|a, b| b.date.cmp(&a.date));
}

/// Articles published within the last `days` days (watch overview shows
/// the last week). Future-dated articles are excluded.
pub fn published_within_days(articles: &[Article], days: i64, now: DateTime<Utc>) -> Vec<Article> {
    let cutoff = now - Duration::days(days);
    articles
        .iter()
        .filter(|a| a.date >= cutoff && a.date <= now)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn article(id: i64, date: DateTime<Utc>) -> Article {
        Article {
            id,
            title: format!("Article {id}"),
            description: "text".to_string(),
            image_url: None,
            full_url: None,
            date,
            category_id: 1,
            category_name: "General".to_string(),
        }
    }

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    // ==================== wire decoding ====================

    #[test]
    fn test_decode_wire_payload() {
        let json = r#"{
            "id": 7,
            "title": "Nieuw artikel",
            "description": "Korte samenvatting",
            "imageURL": "https://example.com/img.jpg",
            "fullURL": "https://example.com/artikel/7",
            "date": "2025-10-11T09:30:00Z",
            "categoryID": 3,
            "categoryName": "Hardware"
        }"#;

        let a: Article = serde_json::from_str(json).unwrap();
        assert_eq!(a.id, 7);
        assert_eq!(a.category_id, 3);
        assert_eq!(a.category_name, "Hardware");
        assert_eq!(
            a.image_url.as_ref().unwrap().as_str(),
            "https://example.com/img.jpg"
        );
        assert_eq!(a.date, Utc.with_ymd_and_hms(2025, 10, 11, 9, 30, 0).unwrap());
    }

    #[test]
    fn test_decode_missing_urls() {
        let json = r#"{
            "id": 1,
            "title": "t",
            "description": "d",
            "date": "2025-01-01T00:00:00Z",
            "categoryID": 2,
            "categoryName": "c"
        }"#;

        let a: Article = serde_json::from_str(json).unwrap();
        assert_eq!(a.image_url, None);
        assert_eq!(a.full_url, None);
    }

    #[test]
    fn test_decode_bad_date_fails() {
        let json = r#"{
            "id": 1,
            "title": "t",
            "description": "d",
            "date": "11 oktober 2025",
            "categoryID": 2,
            "categoryName": "c"
        }"#;

        assert!(serde_json::from_str::<Article>(json).is_err());
    }

    #[test]
    fn test_roundtrip_preserves_timestamp_precision() {
        let a = article(1, ts("2025-10-11T09:30:15.123Z"));
        let json = serde_json::to_string(&a).unwrap();
        let back: Article = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);
        assert_eq!(back.date, a.date);
    }

    // ==================== ordering and filtering ====================

    #[test]
    fn test_sort_newest_first() {
        let mut articles = vec![
            article(1, ts("2025-01-01T00:00:00Z")),
            article(2, ts("2025-03-01T00:00:00Z")),
            article(3, ts("2025-02-01T00:00:00Z")),
        ];
        sort_newest_first(&mut articles);
        let ids: Vec<i64> = articles.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_published_within_days() {
        let now = ts("2025-10-11T12:00:00Z");
        let articles = vec![
            article(1, ts("2025-10-10T12:00:00Z")), // yesterday
            article(2, ts("2025-10-01T12:00:00Z")), // too old
            article(3, ts("2025-10-04T12:00:00Z")), // exactly 7 days ago
            article(4, ts("2025-10-12T12:00:00Z")), // future-dated
        ];

        let recent = published_within_days(&articles, 7, now);
        let ids: Vec<i64> = recent.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
