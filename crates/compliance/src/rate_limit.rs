//! Per-domain rate limiter. One mutable record per domain, serialised by the
//! `dashmap` shard lock the record lives under — fetches to distinct domains
//! never block each other.

use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Tracks the last successful fetch per domain so the evaluator can compute
/// whether a new fetch must wait out the required delay.
pub struct DomainRateLimiter {
    last_fetch: DashMap<String, Instant>,
}

impl Default for DomainRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainRateLimiter {
    pub fn new() -> Self {
        Self {
            last_fetch: DashMap::new(),
        }
    }

    /// Returns `Some(remaining)` if `domain` was last fetched less than
    /// `required_delay` ago, `None` if the domain may be fetched now.
    pub fn check(&self, domain: &str, required_delay: Duration) -> Option<Duration> {
        let last = self.last_fetch.get(domain)?;
        let elapsed = last.elapsed();
        if elapsed < required_delay {
            Some(required_delay - elapsed)
        } else {
            None
        }
    }

    /// Records a fetch against `domain` as having happened now. Call this
    /// after every permitted fetch, not before — a rejected fetch never
    /// occupies the slot.
    pub fn record_fetch(&self, domain: &str) {
        self.last_fetch.insert(domain.to_string(), Instant::now());
    }

    /// Waits out the remaining delay for `domain`, if any, then records the
    /// fetch. Used by the orchestrator's retry-on-`rate_limited` path.
    pub async fn wait_then_record(&self, domain: &str, required_delay: Duration) {
        if let Some(remaining) = self.check(domain, required_delay) {
            tokio::time::sleep(remaining).await;
        }
        self.record_fetch(domain);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_fetch_is_never_limited() {
        let limiter = DomainRateLimiter::new();
        assert!(limiter.check("example.com", Duration::from_secs(5)).is_none());
    }

    #[test]
    fn fetch_within_delay_is_limited() {
        let limiter = DomainRateLimiter::new();
        limiter.record_fetch("example.com");
        assert!(limiter.check("example.com", Duration::from_secs(60)).is_some());
    }

    #[test]
    fn distinct_domains_are_independent() {
        let limiter = DomainRateLimiter::new();
        limiter.record_fetch("a.com");
        assert!(limiter.check("b.com", Duration::from_secs(60)).is_none());
    }

    #[tokio::test]
    async fn wait_then_record_blocks_for_remaining_delay() {
        let limiter = DomainRateLimiter::new();
        limiter.record_fetch("example.com");
        let start = Instant::now();
        limiter
            .wait_then_record("example.com", Duration::from_millis(50))
            .await;
        assert!(start.elapsed() >= Duration::from_millis(40));
    }
}
