//! Bounded linear retry for remote lookups
//!
//! Only transport failures are retried. A service that answers "no such
//! title" gets asked exactly once.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::api::{LookupError, TransportKind};

/// Retry bound and fixed backoff for one kind of operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Wait before each retry
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Title search: 3 retries, 2s apart
    pub const SEARCH: Self = Self {
        max_retries: 3,
        backoff: Duration::from_secs(2),
    };

    /// Detail fetch: 3 retries, 1.5s apart
    pub const DETAIL: Self = Self {
        max_retries: 3,
        backoff: Duration::from_millis(1500),
    };

    pub fn new(max_retries: u32, backoff: Duration) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    /// Total calls made before giving up
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Drive `op` until it succeeds, fails terminally, or runs out of retries.
    ///
    /// `on_retry` is told the failure kind and the retry number (1-based)
    /// before each backoff; returning `false` abandons the loop.
    pub async fn run<T, Op, Fut, Progress>(
        &self,
        mut op: Op,
        mut on_retry: Progress,
    ) -> Result<T, RetryError>
    where
        Op: FnMut() -> Fut,
        Fut: Future<Output = Result<T, LookupError>>,
        Progress: FnMut(TransportKind, u32) -> bool,
    {
        let mut retries = 0;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(LookupError::Transport { kind, message }) => {
                    if retries >= self.max_retries {
                        return Err(RetryError::Exhausted {
                            kind,
                            message,
                            attempts: retries + 1,
                        });
                    }
                    retries += 1;
                    debug!(%kind, retry = retries, max = self.max_retries, "transport failure, backing off");

                    if !on_retry(kind, retries) {
                        return Err(RetryError::Abandoned);
                    }
                    tokio::time::sleep(self.backoff).await;
                }
                Err(other) => return Err(RetryError::Terminal(other)),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::SEARCH
    }
}

/// Why a retried operation stopped without a value
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RetryError {
    /// Non-retryable failure (remote rejection or unexpected error)
    #[error(transparent)]
    Terminal(LookupError),

    #[error("all {attempts} attempts failed: {message}")]
    Exhausted {
        kind: TransportKind,
        message: String,
        attempts: u32,
    },

    /// The progress callback asked to stop
    #[error("retry abandoned")]
    Abandoned,
}
