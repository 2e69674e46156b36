//! The compliance gate itself (§4.1): decides whether a URL may be fetched
//! and whether a fetched candidate may be stored, against a Source's current
//! policy and the shared robots/rate-limit/SSRF/legal-notice state.

use crate::legal_notice::LegalNoticeRepository;
use crate::rate_limit::DomainRateLimiter;
use crate::robots::RobotsCache;
use crate::ssrf::{is_blocked_host, resolves_to_blocked_range};
use chrono::{DateTime, Utc};
use preventia_core::config::ComplianceConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Lifecycle state of a Source, as relevant to the compliance gate. The full
/// Source aggregate (C3) lives in the domain crate; this is the slice the
/// evaluator needs to make a decision without depending on persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    Active,
    Inactive,
    Suspended,
    UnderReview,
    Deleted,
}

/// Declared retained-content level for a Source (§3 policy fields).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    MetadataOnly,
    SummaryOnly,
    Full,
}

/// The subset of `Source` the evaluator reads. Callers (the orchestrator)
/// project the persisted Source into this view.
#[derive(Debug, Clone)]
pub struct SourceSnapshot {
    pub id: i64,
    pub base_url: String,
    pub status: SourceStatus,
    pub crawl_delay_seconds: f64,
    pub content_type: ContentType,
    pub data_retention_days: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchReason {
    Allowed,
    SourceInactive,
    RobotsUnavailable,
    RobotsDisallow,
    RateLimited,
    BlockedHost,
}

#[derive(Debug, Clone)]
pub struct FetchDecision {
    pub allowed: bool,
    pub reason: FetchReason,
    pub required_delay_seconds: f64,
    pub robots_txt_age: Option<Duration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreReason {
    Allowed,
    LegalNoticeActive,
}

#[derive(Debug, Clone)]
pub struct StoreDecision {
    pub allowed: bool,
    pub reason: StoreReason,
    pub content_level: ContentType,
    pub retention_expires_at: DateTime<Utc>,
}

/// Ties together the robots cache, rate limiter, SSRF guard, and legal
/// notice lookups behind the two decision operations §4.1 specifies.
pub struct ComplianceEvaluator {
    robots: RobotsCache,
    rate_limiter: DomainRateLimiter,
    legal_notices: Arc<dyn LegalNoticeRepository>,
    config: ComplianceConfig,
}

impl ComplianceEvaluator {
    pub fn new(config: ComplianceConfig, legal_notices: Arc<dyn LegalNoticeRepository>) -> Self {
        let robots = RobotsCache::new(
            Duration::from_secs(config.robots_cache_ttl_seconds),
            config.user_agent.clone(),
        );
        Self {
            robots,
            rate_limiter: DomainRateLimiter::new(),
            legal_notices,
            config,
        }
    }

    fn domain_of(url: &Url) -> String {
        format!(
            "{}://{}",
            url.scheme(),
            url.host_str().unwrap_or_default()
        )
    }

    /// §4.1 `evaluate_fetch`.
    pub async fn evaluate_fetch(&self, url: &str, source: &SourceSnapshot) -> FetchDecision {
        if source.status != SourceStatus::Active && source.status != SourceStatus::UnderReview {
            return FetchDecision {
                allowed: false,
                reason: FetchReason::SourceInactive,
                required_delay_seconds: 0.0,
                robots_txt_age: None,
            };
        }

        let Ok(parsed) = Url::parse(url) else {
            return FetchDecision {
                allowed: false,
                reason: FetchReason::RobotsUnavailable,
                required_delay_seconds: 0.0,
                robots_txt_age: None,
            };
        };

        let host = parsed.host_str().unwrap_or_default();
        if is_blocked_host(host, &self.config.blocked_hosts) {
            return FetchDecision {
                allowed: false,
                reason: FetchReason::BlockedHost,
                required_delay_seconds: 0.0,
                robots_txt_age: None,
            };
        }

        // `is_blocked_host` only catches literal IPs and known loopback
        // names; a hostname that resolves to a private/loopback range via
        // DNS (rebinding) is caught here instead.
        let port = parsed.port_or_known_default().unwrap_or(80);
        if resolves_to_blocked_range(host, port).await {
            return FetchDecision {
                allowed: false,
                reason: FetchReason::BlockedHost,
                required_delay_seconds: 0.0,
                robots_txt_age: None,
            };
        }

        let domain = Self::domain_of(&parsed);
        let (rules, robots_age) = match self.robots.get(&domain).await {
            Ok(result) => result,
            Err(_) => {
                return FetchDecision {
                    allowed: false,
                    reason: FetchReason::RobotsUnavailable,
                    required_delay_seconds: 0.0,
                    robots_txt_age: None,
                };
            }
        };

        if rules.is_disallowed(parsed.path()) {
            return FetchDecision {
                allowed: false,
                reason: FetchReason::RobotsDisallow,
                required_delay_seconds: 0.0,
                robots_txt_age: Some(robots_age),
            };
        }

        let required_delay = rules
            .crawl_delay
            .unwrap_or(0.0)
            .max(source.crawl_delay_seconds)
            .max(1.0);

        if self
            .rate_limiter
            .check(&domain, Duration::from_secs_f64(required_delay))
            .is_some()
        {
            return FetchDecision {
                allowed: false,
                reason: FetchReason::RateLimited,
                required_delay_seconds: required_delay,
                robots_txt_age: Some(robots_age),
            };
        }

        self.rate_limiter.record_fetch(&domain);

        FetchDecision {
            allowed: true,
            reason: FetchReason::Allowed,
            required_delay_seconds: required_delay,
            robots_txt_age: Some(robots_age),
        }
    }

    /// §4.1 `evaluate_store`.
    pub async fn evaluate_store(
        &self,
        article_url: &str,
        scraped_at: DateTime<Utc>,
        source: &SourceSnapshot,
    ) -> preventia_core::error::Result<StoreDecision> {
        let domain = Url::parse(article_url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
            .unwrap_or_default();

        let retention_expires_at =
            scraped_at + chrono::Duration::days(source.data_retention_days as i64);

        if self.legal_notices.has_blocking_notice(&domain).await? {
            return Ok(StoreDecision {
                allowed: false,
                reason: StoreReason::LegalNoticeActive,
                content_level: source.content_type,
                retention_expires_at,
            });
        }

        Ok(StoreDecision {
            allowed: true,
            reason: StoreReason::Allowed,
            content_level: source.content_type,
            retention_expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use uuid::Uuid;

    struct NoNotices;

    #[async_trait]
    impl LegalNoticeRepository for NoNotices {
        async fn has_blocking_notice(&self, _domain: &str) -> preventia_core::error::Result<bool> {
            Ok(false)
        }
        async fn create(
            &self,
            _notice: &crate::legal_notice::LegalNotice,
        ) -> preventia_core::error::Result<()> {
            Ok(())
        }
        async fn set_status(
            &self,
            _id: Uuid,
            _status: crate::legal_notice::LegalNoticeStatus,
        ) -> preventia_core::error::Result<()> {
            Ok(())
        }
        async fn list_for_domain(
            &self,
            _domain: &str,
        ) -> preventia_core::error::Result<Vec<crate::legal_notice::LegalNotice>> {
            Ok(vec![])
        }
    }

    struct AlwaysBlocked;

    #[async_trait]
    impl LegalNoticeRepository for AlwaysBlocked {
        async fn has_blocking_notice(&self, _domain: &str) -> preventia_core::error::Result<bool> {
            Ok(true)
        }
        async fn create(
            &self,
            _notice: &crate::legal_notice::LegalNotice,
        ) -> preventia_core::error::Result<()> {
            Ok(())
        }
        async fn set_status(
            &self,
            _id: Uuid,
            _status: crate::legal_notice::LegalNoticeStatus,
        ) -> preventia_core::error::Result<()> {
            Ok(())
        }
        async fn list_for_domain(
            &self,
            _domain: &str,
        ) -> preventia_core::error::Result<Vec<crate::legal_notice::LegalNotice>> {
            Ok(vec![])
        }
    }

    fn config() -> ComplianceConfig {
        ComplianceConfig {
            user_agent: "PreventIABot/1.0 (+https://preventia.example/bot)".to_string(),
            robots_cache_ttl_seconds: 86400,
            default_crawl_delay_ms: 1000,
            max_crawl_delay_ms: 60_000,
            blocked_hosts: vec![],
            require_legal_review_by_default: true,
        }
    }

    fn source(status: SourceStatus) -> SourceSnapshot {
        SourceSnapshot {
            id: 1,
            base_url: "https://example.com".to_string(),
            status,
            crawl_delay_seconds: 1.0,
            content_type: ContentType::MetadataOnly,
            data_retention_days: 365,
        }
    }

    #[tokio::test]
    async fn inactive_source_is_rejected_before_any_fetch() {
        let evaluator = ComplianceEvaluator::new(config(), Arc::new(NoNotices));
        let decision = evaluator
            .evaluate_fetch("https://example.com/a", &source(SourceStatus::Suspended))
            .await;
        assert!(!decision.allowed);
        assert_eq!(decision.reason, FetchReason::SourceInactive);
    }

    #[tokio::test]
    async fn loopback_host_is_blocked_before_robots_fetch() {
        let evaluator = ComplianceEvaluator::new(config(), Arc::new(NoNotices));
        let decision = evaluator
            .evaluate_fetch("http://127.0.0.1/a", &source(SourceStatus::Active))
            .await;
        assert!(!decision.allowed);
        assert_eq!(decision.reason, FetchReason::BlockedHost);
    }

    #[tokio::test]
    async fn legal_notice_blocks_store_regardless_of_content_level() {
        let evaluator = ComplianceEvaluator::new(config(), Arc::new(AlwaysBlocked));
        let decision = evaluator
            .evaluate_store(
                "https://example.com/a",
                Utc::now(),
                &source(SourceStatus::Active),
            )
            .await
            .unwrap();
        assert!(!decision.allowed);
        assert_eq!(decision.reason, StoreReason::LegalNoticeActive);
    }

    #[tokio::test]
    async fn store_retention_expiry_is_scraped_at_plus_retention_days() {
        let evaluator = ComplianceEvaluator::new(config(), Arc::new(NoNotices));
        let scraped_at = Utc::now();
        let decision = evaluator
            .evaluate_store("https://example.com/a", scraped_at, &source(SourceStatus::Active))
            .await
            .unwrap();
        assert!(decision.allowed);
        assert_eq!(decision.retention_expires_at, scraped_at + chrono::Duration::days(365));
    }
}
