use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Connectivity failure or timeout. Transient; worth retrying.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Non-2xx response. The body often carries backend diagnostics,
    /// kept verbatim for logging/display only.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Malformed JSON or an unparseable date. A single bad article
    /// rejects the whole response; there is no partial-success mode.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Whether a retry without any other change could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::Network(_) => true,
            AppError::Http { status, .. } => *status >= 500,
            AppError::Decode(_) | AppError::Config(_) | AppError::Io(_) => false,
        }
    }
}

impl From<toml::de::Error> for AppError {
    fn from(e: toml::de::Error) -> Self {
        AppError::Config(e.to_string())
    }
}
