use std::path::PathBuf;

use tracing::{debug, warn};

use crate::models::{Article, Language};

/// Last-good article lists on disk, one JSON blob per (language, category)
/// key. Strictly an optimization: reads degrade to a miss on any problem
/// and write failures are swallowed. No TTL; entries are overwritten
/// wholesale on every successful fetch.
#[derive(Debug, Clone)]
pub struct ArticleCache {
    dir: PathBuf,
}

impl ArticleCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Distinct category ids and the "all" pseudo-key can never collide.
    fn key(language: Language, category_id: Option<i64>) -> String {
        match category_id {
            Some(id) => format!("articles_{}_cat{}.json", language.as_param(), id),
            None => format!("articles_{}_all.json", language.as_param()),
        }
    }

    fn path(&self, language: Language, category_id: Option<i64>) -> PathBuf {
        self.dir.join(Self::key(language, category_id))
    }

    /// Returns the cached list for the key, or `None` on missing file,
    /// unreadable file, or decode failure. A corrupt entry is a miss,
    /// never an error.
    pub async fn load(&self, language: Language, category_id: Option<i64>) -> Option<Vec<Article>> {
        let path = self.path(language, category_id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(_) => {
                debug!(path = %path.display(), "no cache entry");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(articles) => Some(articles),
            Err(e) => {
                warn!(error = %e, path = %path.display(), "corrupt cache entry, treating as miss");
                None
            }
        }
    }

    /// Best-effort write-through. Writes to a temp file and renames so a
    /// concurrent reader never observes a half-written entry.
    pub async fn save(&self, articles: &[Article], language: Language, category_id: Option<i64>) {
        let path = self.path(language, category_id);

        let bytes = match serde_json::to_vec(articles) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "failed to serialize articles for cache");
                return;
            }
        };

        if let Err(e) = tokio::fs::create_dir_all(&self.dir).await {
            warn!(error = %e, dir = %self.dir.display(), "failed to create cache dir");
            return;
        }

        let tmp = path.with_extension("json.tmp");
        if let Err(e) = tokio::fs::write(&tmp, &bytes).await {
            warn!(error = %e, path = %tmp.display(), "failed to write cache temp file");
            return;
        }
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            warn!(error = %e, path = %path.display(), "failed to persist cache entry");
        }
    }
}
