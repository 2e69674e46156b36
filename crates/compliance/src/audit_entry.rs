//! Compliance-specific audit entry construction on top of `preventia_core::audit`.
//!
//! The append-only audit log itself (table, backend trait, transactional
//! write path) lives in `preventia_core::audit` — this module only builds
//! the compliance-flavored payloads (`validate`, `robots_check`,
//! `copyright_review`) that C1 and C3 emit, carrying the score/risk-level
//! pair that the generic `AuditEvent` has no dedicated column for.

use crate::scoring::RiskTier;
use preventia_core::audit::{AuditAction, AuditEvent, EventOutcome};
use serde_json::json;

/// Builds the `validate` audit entry emitted by `score_source` (§4.1),
/// carrying the before/after compliance score and risk tier in `metadata`
/// since those are specific to source scoring, not general audit shape.
pub fn source_validated(
    source_id: i64,
    score_before: Option<f64>,
    score_after: f64,
    risk_level: RiskTier,
) -> AuditEvent {
    AuditEvent::builder(
        AuditAction::Validate,
        format!(
            "compliance score recomputed: {:?} -> {:.1}",
            score_before, score_after
        ),
    )
    .resource("sources", source_id.to_string())
    .outcome(EventOutcome::Success)
    .metadata("compliance_score_before", json!(score_before))
    .metadata("compliance_score_after", json!(score_after))
    .metadata("risk_level", json!(risk_level))
    .build()
}

/// Builds a `robots_check` audit entry for a fetch decision — `status` maps
/// onto `EventOutcome::Success`/`Failure` depending on whether the fetch was
/// allowed, and `reason` is carried verbatim for later querying.
pub fn robots_checked(source_id: i64, url: &str, allowed: bool, reason: &str) -> AuditEvent {
    AuditEvent::builder(
        AuditAction::RobotsCheck,
        format!("fetch decision for {}: {}", url, reason),
    )
    .resource("sources", source_id.to_string())
    .outcome(if allowed {
        EventOutcome::Success
    } else {
        EventOutcome::Failure
    })
    .metadata("url", json!(url))
    .metadata("reason", json!(reason))
    .build()
}

/// Builds a `copyright_review` audit entry for a legal-notice-driven store
/// refusal (§4.1 `evaluate_store` / §4.2's legal-action logging).
pub fn legal_notice_blocked(article_url: &str, source_domain: &str) -> AuditEvent {
    AuditEvent::builder(
        AuditAction::CopyrightReview,
        format!(
            "ingestion blocked by active legal notice for domain {}",
            source_domain
        ),
    )
    .resource("articles", article_url.to_string())
    .outcome(EventOutcome::Failure)
    .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_validated_carries_score_and_risk_in_metadata() {
        let event = source_validated(1, Some(0.6), 0.8, RiskTier::Low);
        assert_eq!(event.action, AuditAction::Validate);
        assert_eq!(
            event.metadata["compliance_score_after"].as_f64(),
            Some(0.8)
        );
    }

    #[test]
    fn robots_checked_maps_allowed_to_success_outcome() {
        let event = robots_checked(1, "https://example.com/a", true, "allowed");
        assert_eq!(event.outcome, EventOutcome::Success);
    }

    #[test]
    fn robots_checked_maps_blocked_to_failure_outcome() {
        let event = robots_checked(1, "https://example.com/a", false, "robots_disallow");
        assert_eq!(event.outcome, EventOutcome::Failure);
    }
}
