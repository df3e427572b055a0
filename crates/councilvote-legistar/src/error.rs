use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    #[cfg(feature = "http")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Every attempt failed; the run treats this as the source being down.
    #[error("source unavailable after {attempts} attempts: {url}: {last_error}")]
    Unavailable {
        url: String,
        attempts: u32,
        last_error: String,
    },
}

impl SourceError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}
