use thiserror::Error;

/// Failure of a single browser primitive.
#[derive(Error, Debug)]
pub enum PageError {
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("timed out after {millis} ms waiting for {what}")]
    Timeout { what: String, millis: u64 },

    #[error("no dialog is open")]
    NoDialog,

    #[error("action control {index} has no popup target")]
    NoPopupTarget { index: usize },

    #[error("page driver error: {0}")]
    Driver(String),
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for PageError {
    fn from(e: reqwest::Error) -> Self {
        match e.url() {
            Some(url) => Self::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            },
            None => Self::Driver(e.to_string()),
        }
    }
}
