//! Retry with backoff for model endpoints.
//!
//! Two transient conditions are retried with different schedules:
//!
//! - [`InferenceError::ModelLoading`] (HTTP 503): exponential,
//!   `model_loading_backoff_secs * 2^(n-1)` after attempt `n`.
//! - [`InferenceError::Network`] (timeout, connect, body read): linear,
//!   `network_backoff_secs * n` after attempt `n`.
//!
//! Everything else is returned immediately. When 503s exhaust the attempt
//! budget the caller gets [`InferenceError::Unavailable`] instead of the
//! last loading error.
//!
//! | Attempt | 503 delay (base 5) | network delay (base 2) |
//! |---------|--------------------|------------------------|
//! | 1 | 5 s | 2 s |
//! | 2 | 10 s | 4 s |
//! | 3 | 20 s | 6 s |
//! | 4 | none, give up | none, give up |

use std::future::Future;
use std::time::Duration;

use biaslens_core::AppConfig;

use crate::error::InferenceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first. Always at least 1.
    pub max_attempts: u32,
    pub model_loading_backoff_secs: u64,
    pub network_backoff_secs: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            model_loading_backoff_secs: 5,
            network_backoff_secs: 2,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_attempts: config.inference_max_attempts.max(1),
            model_loading_backoff_secs: config.model_loading_backoff_secs,
            network_backoff_secs: config.network_backoff_secs,
        }
    }

    /// Same attempt budget, no sleeping. For tests.
    #[must_use]
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            model_loading_backoff_secs: 0,
            network_backoff_secs: 0,
        }
    }

    /// Delay after failed attempt `attempt` (1-based), or `None` if `err` is
    /// not retriable.
    fn delay_after(&self, err: &InferenceError, attempt: u32) -> Option<Duration> {
        if !err.is_retriable() {
            return None;
        }
        let secs = if matches!(err, InferenceError::ModelLoading { .. }) {
            self.model_loading_backoff_secs
                .saturating_mul(1u64 << attempt.saturating_sub(1).min(62))
        } else {
            self.network_backoff_secs.saturating_mul(u64::from(attempt))
        };
        Some(Duration::from_secs(secs))
    }

    /// Run `operation` until it succeeds, fails terminally, or the attempt
    /// budget runs out.
    ///
    /// # Errors
    ///
    /// Returns the first non-retriable error, [`InferenceError::Unavailable`]
    /// when the final attempt was a 503, or the last network error.
    pub async fn run<T, F, Fut>(&self, endpoint: &str, mut operation: F) -> Result<T, InferenceError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, InferenceError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1u32;

        loop {
            let err = match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            let Some(delay) = self.delay_after(&err, attempt) else {
                return Err(err);
            };

            if attempt >= max_attempts {
                return Err(match err {
                    InferenceError::ModelLoading { endpoint } => InferenceError::Unavailable {
                        endpoint,
                        attempts: max_attempts,
                    },
                    other => other,
                });
            }

            tracing::warn!(
                endpoint,
                attempt,
                max_attempts,
                delay_secs = delay.as_secs(),
                error = %err,
                "transient inference error, retrying after backoff"
            );
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            attempt += 1;
        }
    }
}
