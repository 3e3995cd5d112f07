pub mod api;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod models;
pub mod services;

pub use api::{ApiClient, NewsSource};
pub use config::Config;
pub use coordinator::{ArticlesState, FetchCoordinator};
pub use error::{AppError, Result};
pub use models::{Article, Category, Language};
pub use services::ArticleCache;
