//! Bounded retry with exponential backoff and jitter.
//!
//! The delay source is injectable so unit tests run the full retry loop
//! without real sleeps.

use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tracing::warn;

use gapscan_core::config::{RETRY_BASE_DELAY, RETRY_JITTER_MAX, RETRY_MAX_ATTEMPTS};
use gapscan_core::error::CompletionError;

use crate::completion::{CompletionAgent, CompletionTuning};

/// Source of backoff delays.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer.
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Zero-delay sleeper for deterministic tests.
pub struct NoSleep;

#[async_trait]
impl Sleeper for NoSleep {
    async fn sleep(&self, _duration: Duration) {}
}

/// Retry schedule: `max_attempts` total calls, waiting
/// `base_delay * 2^attempt` plus up to `jitter_max` of random jitter
/// between them.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub jitter_max: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: RETRY_MAX_ATTEMPTS,
            base_delay: RETRY_BASE_DELAY,
            jitter_max: RETRY_JITTER_MAX,
        }
    }
}

impl RetryPolicy {
    /// Delay before the retry following the given zero-based attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let backoff = self.base_delay * 2u32.saturating_pow(attempt);
        let jitter_ms = if self.jitter_max.is_zero() {
            0
        } else {
            rand::thread_rng().gen_range(0..=self.jitter_max.as_millis() as u64)
        };
        backoff + Duration::from_millis(jitter_ms)
    }
}

/// Calls the agent until it succeeds, a terminal failure occurs, or the
/// attempt budget is spent. Only transient failures are retried.
pub async fn complete_with_retry(
    agent: &dyn CompletionAgent,
    sleeper: &dyn Sleeper,
    policy: &RetryPolicy,
    system_prompt: &str,
    user_prompt: &str,
    tuning: CompletionTuning,
) -> Result<String, CompletionError> {
    let mut attempt = 0u32;
    loop {
        match agent.complete(system_prompt, user_prompt, tuning).await {
            Ok(text) => return Ok(text),
            Err(err) if err.is_transient() && attempt + 1 < policy.max_attempts => {
                let delay = policy.delay_for(attempt);
                warn!(
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    "transient completion failure, retrying: {err}"
                );
                sleeper.sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
