use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::SourceError;

/// Fixed-count, fixed-delay retry for API fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
    pub request_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(1),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Run `op` until it succeeds or the attempts are used up.
    ///
    /// The delay is only slept between attempts, not after the last one.
    /// Exhaustion yields [`SourceError::Unavailable`] carrying the last error.
    pub async fn run<T, E, F, Fut>(&self, url: &str, mut op: F) -> Result<T, SourceError>
    where
        E: Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let attempts = self.attempts.max(1);
        let mut last_error = String::new();
        for attempt in 1..=attempts {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!(url, attempt, attempts, error = %e, "fetch attempt failed");
                    last_error = e.to_string();
                }
            }
            if attempt < attempts {
                tokio::time::sleep(self.delay).await;
            }
        }
        Err(SourceError::Unavailable {
            url: url.to_string(),
            attempts,
            last_error,
        })
    }
}
