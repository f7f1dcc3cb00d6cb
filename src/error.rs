use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The search page answered with anything other than 200.
    #[error("failed to load page {url} (status {status})")]
    Fetch { url: String, status: u16 },

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid selector `{0}`")]
    Selector(String),

    #[error("listing {uid}: cannot coerce {field} value {value:?}")]
    Coerce {
        uid: String,
        field: &'static str,
        value: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("document store error: {0}")]
    Store(#[from] mongodb::error::Error),

    #[error("missing env var {0}")]
    MissingEnv(&'static str),
}

impl ScrapeError {
    pub(crate) fn coerce(uid: &str, field: &'static str, value: &str) -> Self {
        Self::Coerce {
            uid: uid.to_string(),
            field,
            value: value.to_string(),
        }
    }
}
