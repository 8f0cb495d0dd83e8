//! Bounded retry executor
//!
//! Runs a fallible async operation sequentially until it succeeds or the
//! attempt budget is spent. `max_attempts` bounds the TOTAL number of
//! invocations, first try included.

use crate::telemetry::{self, CounterMetric, LatencyMetric};
use std::future::Future;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Default total attempt budget
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Retry error
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// Every attempt failed; carries the last failure
    #[error("Fetch failed after {attempts} attempts: {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: E,
    },
}

impl<E> RetryError<E> {
    /// The last error observed before giving up
    pub fn last_error(&self) -> &E {
        match self {
            RetryError::Exhausted { source, .. } => source,
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Exhausted { attempts, .. } => *attempts,
        }
    }

    pub fn into_last_error(self) -> E {
        match self {
            RetryError::Exhausted { source, .. } => source,
        }
    }
}

/// Retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,
    /// Pause between a failed attempt and the next one
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: Duration::ZERO,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Attempts that will actually be made
    pub fn effective_attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Invoke `op` until it succeeds or `policy` runs out of attempts
///
/// Attempts never overlap. On success the result is returned at once; on
/// exhaustion the last error is returned inside [`RetryError::Exhausted`].
/// There is no sleep after the final failed attempt.
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let max_attempts = policy.effective_attempts();
    let started = Instant::now();
    let mut attempt = 1;

    loop {
        telemetry::increment(CounterMetric::FetchAttempts);
        let attempt_started = Instant::now();
        let result = op().await;
        telemetry::record_latency(LatencyMetric::FetchAttempt, attempt_started.elapsed());

        match result {
            Ok(value) => {
                telemetry::record_latency(LatencyMetric::FetchTotal, started.elapsed());
                if attempt > 1 {
                    tracing::info!(attempt, "Fetch succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) => {
                telemetry::increment(CounterMetric::FetchFailures);

                if attempt >= max_attempts {
                    telemetry::increment(CounterMetric::FetchExhausted);
                    telemetry::record_latency(LatencyMetric::FetchTotal, started.elapsed());
                    tracing::warn!(attempt, max_attempts, error = %err, "Attempt failed, giving up");
                    return Err(RetryError::Exhausted {
                        attempts: attempt,
                        source: err,
                    });
                }

                tracing::warn!(attempt, max_attempts, error = %err, "Attempt failed, retrying");

                if !policy.delay.is_zero() {
                    tokio::time::sleep(policy.delay).await;
                }
                attempt += 1;
            }
        }
    }
}
