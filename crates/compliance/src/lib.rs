//! Compliance gate (C1) and append-only audit trail (C2) for the ingestion
//! pipeline: robots.txt evaluation, per-domain rate limiting, an SSRF guard,
//! source trust scoring, and legal-notice enforcement.

pub mod audit_entry;
pub mod evaluator;
pub mod legal_notice;
pub mod rate_limit;
pub mod robots;
pub mod scoring;
pub mod ssrf;

pub use audit_entry::{legal_notice_blocked, robots_checked, source_validated};
pub use evaluator::{
    ComplianceEvaluator, ContentType, FetchDecision, FetchReason, SourceSnapshot, SourceStatus,
    StoreDecision, StoreReason,
};
pub use legal_notice::{LegalNotice, LegalNoticeRepository, LegalNoticeStatus, NoticeType};
pub use rate_limit::DomainRateLimiter;
pub use robots::{RobotsCache, RobotsRules};
pub use scoring::{score_source, ComplianceInputs, RiskTier};
pub use ssrf::{is_blocked_host, resolves_to_blocked_range};
