//! Scraper Orchestrator (C5, §4.5): drives one source's run end to end —
//! list, fetch (through the Compliance Evaluator), dedupe, persist, enqueue
//! for NLP — and reports what happened.

use crate::extractor::{ExtractionFailure, ExtractorRegistry};
use preventia_compliance::{ComplianceEvaluator, FetchReason, SourceSnapshot, StoreReason};
use preventia_core::audit::{AuditAction, AuditEvent, AuditLogger, EventOutcome};
use preventia_core::error::Result;
use preventia_core::PipelineMetrics;
use preventia_domain::article::model::{
    CopyrightStatus, LegalReviewStatus, NewArticle, RobotsCompliantState,
};
use preventia_domain::article::repository::{ArticleRepository, InsertOutcome};
use preventia_domain::source::repository::SourceRepository;
use preventia_domain::SourceStatusColumn;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// §4.5 step 7 output: what happened during one `run_source` call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub source_id: i64,
    pub articles_found: u32,
    pub new: u32,
    pub duplicates: u32,
    pub skipped_compliance: u32,
    pub errors: u32,
}

const MAX_RATE_LIMIT_RETRIES: u32 = 3;
const INITIAL_BACKOFF: Duration = Duration::from_secs(2);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

pub struct ScraperOrchestrator {
    compliance: Arc<ComplianceEvaluator>,
    sources: Arc<dyn SourceRepository>,
    articles: Arc<dyn ArticleRepository>,
    extractors: Arc<ExtractorRegistry>,
    audit: Arc<AuditLogger>,
    metrics: Arc<PipelineMetrics>,
    http: reqwest::Client,
}

impl ScraperOrchestrator {
    pub fn new(
        compliance: Arc<ComplianceEvaluator>,
        sources: Arc<dyn SourceRepository>,
        articles: Arc<dyn ArticleRepository>,
        extractors: Arc<ExtractorRegistry>,
        audit: Arc<AuditLogger>,
        metrics: Arc<PipelineMetrics>,
    ) -> Self {
        Self {
            compliance,
            sources,
            articles,
            extractors,
            audit,
            metrics,
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("reqwest client with static config never fails to build"),
        }
    }

    /// Runs §4.5's seven steps for one Source.
    pub async fn run_source(&self, source_id: i64, max_articles_override: Option<i32>) -> Result<RunReport> {
        let mut report = RunReport { source_id, ..Default::default() };
        let started_at = Instant::now();
        let result = self.run_source_inner(source_id, max_articles_override, &mut report).await;
        self.metrics
            .scrape_duration_seconds
            .with_label_values(&[&source_id.to_string()])
            .observe(started_at.elapsed().as_secs_f64());
        result.map(|_| report)
    }

    async fn run_source_inner(
        &self,
        source_id: i64,
        max_articles_override: Option<i32>,
        report: &mut RunReport,
    ) -> Result<()> {

        let source = match self.sources.find_by_id(source_id).await? {
            Some(source) if source.status == SourceStatusColumn::Active => source,
            _ => {
                self.audit
                    .log_event(
                        AuditEvent::builder(AuditAction::Review, "run_source aborted: source not active")
                            .resource("sources", source_id.to_string())
                            .outcome(EventOutcome::Failure)
                            .build(),
                    )
                    .await?;
                return Ok(());
            }
        };

        let snapshot = source.to_snapshot();

        let root_decision = self.compliance.evaluate_fetch(&source.base_url, &snapshot).await;
        self.metrics
            .compliance_decisions_total
            .with_label_values(&[&format!("{:?}", root_decision.reason)])
            .inc();
        if !root_decision.allowed {
            self.audit
                .log_event(
                    AuditEvent::builder(AuditAction::RobotsCheck, "run_source aborted: root fetch disallowed")
                        .resource("sources", source_id.to_string())
                        .outcome(EventOutcome::Failure)
                        .build(),
                )
                .await?;
            return Ok(());
        }

        let listing_body = match retry_transient(|| self.fetch_body(&source.base_url)).await {
            Ok(body) => body,
            Err(_) => return Ok(()),
        };

        let extractor = self.extractors.resolve(&source.base_url);
        let candidates = match extractor.list_articles(&listing_body, &source.base_url) {
            Ok(links) => links,
            Err(_) => return Ok(()),
        };

        let max_articles = max_articles_override.unwrap_or(source.max_articles_per_run).max(0) as usize;

        for candidate in candidates.into_iter().take(max_articles) {
            report.articles_found += 1;

            if !self.fetch_with_rate_limit_retry(&snapshot, &candidate.url, report).await {
                continue;
            }

            let article_html = match retry_transient(|| self.fetch_body(&candidate.url)).await {
                Ok(body) => body,
                Err(_) => {
                    report.errors += 1;
                    continue;
                }
            };

            let record = match extractor.parse_article(&article_html, &candidate.url) {
                Ok(record) => record,
                Err(ExtractionFailure::NonMedical) => continue,
                Err(_) => {
                    report.errors += 1;
                    continue;
                }
            };

            if self.articles.find_by_url(&record.url).await?.is_some() {
                report.duplicates += 1;
                continue;
            }

            let scraped_at = chrono::Utc::now();
            let store_decision = self
                .compliance
                .evaluate_store(&record.url, scraped_at, &snapshot)
                .await?;
            self.metrics
                .compliance_decisions_total
                .with_label_values(&[&format!("{:?}", store_decision.reason)])
                .inc();

            if !store_decision.allowed {
                if store_decision.reason == StoreReason::LegalNoticeActive {
                    self.audit
                        .log_event(preventia_compliance::legal_notice_blocked(
                            &record.url,
                            &source.base_url,
                        ))
                        .await?;
                }
                report.skipped_compliance += 1;
                continue;
            }

            let new_article = NewArticle {
                url: record.url,
                content_hash: record.content_hash,
                source_id,
                title: record.title,
                summary: Some(record.summary),
                content: record.content,
                word_count: Some(record.word_count),
                language: record.language,
                published_at: record.published_at,
                scraped_at,
                author: record.author,
                robots_txt_compliant: RobotsCompliantState::True,
                copyright_status: CopyrightStatus::FairUse,
                fair_use_basis: Some(source.fair_use_basis.clone()),
                scraping_permission: Some("robots_txt_allowed".to_string()),
                legal_review_status: LegalReviewStatus::Pending,
                data_retention_expires_at: store_decision.retention_expires_at,
            };

            match self.articles.insert_with_audit(&new_article, &self.audit).await? {
                InsertOutcome::Inserted(_) => {
                    report.new += 1;
                    self.metrics
                        .articles_ingested_total
                        .with_label_values(&[&source_id.to_string()])
                        .inc();
                }
                InsertOutcome::Duplicate => report.duplicates += 1,
            }
        }

        Ok(())
    }

    /// §4.5 step 4: on `rate_limited`, sleep for the required delay and
    /// retry up to `MAX_RATE_LIMIT_RETRIES` times; any other negative
    /// decision is a skip, not a retry.
    async fn fetch_with_rate_limit_retry(&self, snapshot: &SourceSnapshot, url: &str, report: &mut RunReport) -> bool {
        let mut attempt = 0;
        loop {
            let decision = self.compliance.evaluate_fetch(url, snapshot).await;
            self.metrics
                .compliance_decisions_total
                .with_label_values(&[&format!("{:?}", decision.reason)])
                .inc();
            if decision.allowed {
                return true;
            }
            if decision.reason == FetchReason::RateLimited && attempt < MAX_RATE_LIMIT_RETRIES {
                attempt += 1;
                tokio::time::sleep(Duration::from_secs_f64(decision.required_delay_seconds)).await;
                continue;
            }

            let _ = self
                .audit
                .log_event(preventia_compliance::robots_checked(
                    snapshot.id,
                    url,
                    false,
                    &format!("{:?}", decision.reason),
                ))
                .await;

            report.skipped_compliance += 1;
            return false;
        }
    }

    /// Fetches `url`'s body, translating non-2xx/transport failures into the
    /// `ExtractionFailure` shape `retry_transient` knows how to retry.
    async fn fetch_body(&self, url: &str) -> crate::extractor::ExtractResult<String> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ExtractionFailure::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let retry_after_seconds = resp
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());
            return Err(ExtractionFailure::Http { status, retry_after_seconds });
        }

        resp.text().await.map_err(|e| ExtractionFailure::Network(e.to_string()))
    }
}

/// Exponential backoff for transient network errors (§4.5): 2s, 4s, 8s, ...
/// capped at 60s, at most 3 attempts.
pub async fn retry_transient<F, Fut, T>(mut attempt_fn: F) -> std::result::Result<T, ExtractionFailure>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = std::result::Result<T, ExtractionFailure>>,
{
    let mut delay = INITIAL_BACKOFF;
    let mut attempts = 0;

    loop {
        match attempt_fn().await {
            Ok(value) => return Ok(value),
            Err(failure) if failure.is_transient() && attempts < 3 => {
                attempts += 1;
                tokio::time::sleep(failure.retry_after().unwrap_or(delay)).await;
                delay = (delay * 2).min(MAX_BACKOFF);
            }
            Err(failure) => return Err(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn retry_transient_gives_up_after_three_attempts() {
        let mut calls = 0;
        let result: std::result::Result<(), ExtractionFailure> = retry_transient(|| {
            calls += 1;
            async { Err(ExtractionFailure::Network("timeout".to_string())) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls, 4);
    }

    #[tokio::test]
    async fn retry_transient_does_not_retry_non_transient_failures() {
        let mut calls = 0;
        let result: std::result::Result<(), ExtractionFailure> = retry_transient(|| {
            calls += 1;
            async { Err(ExtractionFailure::NonMedical) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls, 1);
    }
}
