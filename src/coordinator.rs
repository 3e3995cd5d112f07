use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::api::NewsSource;
use crate::error::AppError;
use crate::models::{sort_newest_first, Article, Category, Language};
use crate::services::ArticleCache;

/// Everything the presentation layer renders. Published through a watch
/// channel; subscribers see whole snapshots, never partial updates.
#[derive(Debug, Clone, Default)]
pub struct ArticlesState {
    pub language: Language,
    pub categories: Vec<Category>,
    /// `None` means "all articles" (no category filter).
    pub selected_category: Option<Category>,
    pub articles: Vec<Article>,
    /// Gates spinners only, never correctness.
    pub is_loading: bool,
    pub error: Option<Arc<AppError>>,
}

/// Orchestrates category and article loads for the current
/// (language, category) selection.
///
/// Every operation takes a token from a monotone counter at start and
/// records it as the latest for the resource classes it touches. A
/// completion is applied only while its token is still the latest for
/// that class; anything else is dropped silently. That is the whole
/// cancellation story: in-flight HTTP calls are never aborted, their
/// results just stop mattering. Stale data can therefore never overwrite
/// fresher data, and a superseded request never surfaces an error.
///
/// All state mutation funnels through `watch::Sender::send_modify`, which
/// serializes writers, so the token check and the apply are one step.
pub struct FetchCoordinator<S> {
    source: S,
    cache: ArticleCache,
    state_tx: watch::Sender<ArticlesState>,
    next_token: AtomicU64,
    latest_categories: AtomicU64,
    latest_articles: AtomicU64,
}

impl<S: NewsSource> FetchCoordinator<S> {
    pub fn new(source: S, cache: ArticleCache, language: Language) -> Self {
        let (state_tx, _) = watch::channel(ArticlesState {
            language,
            ..ArticlesState::default()
        });
        Self {
            source,
            cache,
            state_tx,
            next_token: AtomicU64::new(0),
            latest_categories: AtomicU64::new(0),
            latest_articles: AtomicU64::new(0),
        }
    }

    /// Observe state changes without polling.
    pub fn subscribe(&self) -> watch::Receiver<ArticlesState> {
        self.state_tx.subscribe()
    }

    /// Current state snapshot.
    pub fn state(&self) -> ArticlesState {
        self.state_tx.borrow().clone()
    }

    fn issue_token(&self) -> u64 {
        self.next_token.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn selection(&self) -> (Language, Option<i64>) {
        let state = self.state_tx.borrow();
        (
            state.language,
            state.selected_category.as_ref().map(|c| c.id),
        )
    }

    /// Full load: categories first, then articles for the (possibly
    /// corrected) selection. On the first call the last-good cache entry
    /// is surfaced immediately as provisional data while the network
    /// request is still in flight; a pending request never clears it.
    pub async fn load(&self) {
        let token = self.issue_token();
        self.latest_categories.store(token, Ordering::SeqCst);
        self.latest_articles.store(token, Ordering::SeqCst);
        self.state_tx.send_modify(|s| s.is_loading = true);

        let (language, selection) = self.selection();

        let nothing_shown = { self.state_tx.borrow().articles.is_empty() };
        if nothing_shown {
            if let Some(cached) = self.cache.load(language, selection).await {
                debug!(
                    lang = %language,
                    ?selection,
                    "surfacing {} cached articles while refresh is in flight",
                    cached.len()
                );
                self.state_tx.send_modify(|s| {
                    if self.latest_articles.load(Ordering::SeqCst) == token
                        && s.articles.is_empty()
                    {
                        s.articles = cached;
                    }
                });
            }
        }

        let categories = match self.source.categories(language).await {
            Ok(categories) => categories,
            Err(e) => {
                self.apply_error(token, e);
                return;
            }
        };

        self.state_tx.send_modify(|s| {
            if self.latest_categories.load(Ordering::SeqCst) != token {
                debug!(token, "discarding superseded category fetch");
                return;
            }
            s.categories = categories;
            // The selection must never reference an id absent from the
            // fresh list; reset to "all" before the article fetch runs.
            if let Some(selected) = &s.selected_category {
                if !s.categories.iter().any(|c| c.id == selected.id) {
                    debug!(id = selected.id, "selected category vanished, resetting to all");
                    s.selected_category = None;
                }
            }
        });

        self.fetch_articles(token).await;
    }

    /// Re-fetch articles only, for the current selection. Also the
    /// pull-to-refresh path.
    pub async fn reload_articles(&self) {
        let token = self.issue_token();
        self.latest_articles.store(token, Ordering::SeqCst);
        self.state_tx.send_modify(|s| s.is_loading = true);
        self.fetch_articles(token).await;
    }

    /// `None` selects "all articles". A no-op when the selection is
    /// unchanged; otherwise triggers an article reload.
    pub async fn set_selected_category(&self, category: Option<Category>) {
        let changed = {
            let state = self.state_tx.borrow();
            state.selected_category.as_ref().map(|c| c.id) != category.as_ref().map(|c| c.id)
        };
        if !changed {
            return;
        }
        self.state_tx.send_modify(|s| s.selected_category = category);
        self.reload_articles().await;
    }

    /// Categories legitimately differ per language, so this is a full load.
    pub async fn set_language(&self, language: Language) {
        self.state_tx.send_modify(|s| s.language = language);
        self.load().await;
    }

    async fn fetch_articles(&self, token: u64) {
        let (language, selection) = self.selection();

        match self.source.articles(language, selection).await {
            Ok(mut articles) => {
                sort_newest_first(&mut articles);
                let mut applied = false;
                self.state_tx.send_modify(|s| {
                    if self.latest_articles.load(Ordering::SeqCst) != token {
                        debug!(token, "discarding superseded article fetch");
                        return;
                    }
                    s.articles = articles.clone();
                    s.error = None;
                    s.is_loading = false;
                    applied = true;
                });
                // Write-through for the exact key that was fetched. Only
                // the freshest completion ever reaches this point.
                if applied {
                    self.cache.save(&articles, language, selection).await;
                }
            }
            Err(e) => self.apply_error(token, e),
        }
    }

    /// Errors only ever sit beside whatever is already shown; the last
    /// good article list is never cleared. A superseded operation's
    /// failure is dropped without touching anything, including the
    /// loading flag, which belongs to its successor by then.
    fn apply_error(&self, token: u64, error: AppError) {
        let error = Arc::new(error);
        self.state_tx.send_modify(|s| {
            if self.latest_articles.load(Ordering::SeqCst) != token {
                debug!(token, "discarding error from superseded fetch");
                return;
            }
            warn!(error = %error, "fetch failed, keeping last good data");
            s.error = Some(Arc::clone(&error));
            s.is_loading = false;
        });
    }
}
