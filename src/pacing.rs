//! Request pacing between LLM calls.
//!
//! The pipeline issues one model call per chunk pair, strictly sequentially,
//! and inserts a pause before each call so a long document does not arrive at
//! the provider as a request burst. The pause is a constant delay — it is not
//! adaptive and it is not retry-with-backoff; a failed call is recorded and
//! the pipeline moves on.
//!
//! The policy is a trait so tests (and callers with their own rate limiting)
//! can swap in [`NoPacing`] without touching pipeline code.

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;

/// Decides how long to wait before each LLM call.
#[async_trait]
pub trait RateLimitPolicy: Send + Sync {
    /// Called by the orchestrator immediately before every model call.
    async fn pause(&self);
}

/// Fixed pause before every call. The default policy.
#[derive(Debug, Clone, Copy)]
pub struct ConstantPacing {
    delay: Duration,
}

impl ConstantPacing {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Convenience constructor from milliseconds.
    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for ConstantPacing {
    /// One second between calls.
    fn default() -> Self {
        Self::from_millis(1000)
    }
}

#[async_trait]
impl RateLimitPolicy for ConstantPacing {
    async fn pause(&self) {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }
}

/// No pause at all. For tests and providers with client-side rate limiting.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacing;

#[async_trait]
impl RateLimitPolicy for NoPacing {
    async fn pause(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn constant_pacing_waits() {
        let policy = ConstantPacing::from_millis(30);
        let start = Instant::now();
        policy.pause().await;
        assert!(start.elapsed() >= Duration::from_millis(25));
    }

    #[tokio::test]
    async fn no_pacing_returns_immediately() {
        let start = Instant::now();
        NoPacing.pause().await;
        assert!(start.elapsed() < Duration::from_millis(20));
    }

    #[test]
    fn default_is_one_second() {
        assert_eq!(ConstantPacing::default().delay(), Duration::from_secs(1));
    }
}
