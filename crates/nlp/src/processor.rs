//! Drains `processing_status = pending` Articles through the pipeline
//! (§4.6), applying a result or a failure per article, never partially.

use crate::pipeline::{NlpFailure, NlpPipeline};
use preventia_core::audit::AuditLogger;
use preventia_core::error::Result;
use preventia_core::PipelineMetrics;
use preventia_domain::article::repository::ArticleRepository;
use std::sync::Arc;
use std::time::Instant;

pub struct NlpProcessor {
    pipeline: NlpPipeline,
    articles: Arc<dyn ArticleRepository>,
    audit: Arc<AuditLogger>,
    metrics: Arc<PipelineMetrics>,
}

#[derive(Debug, Clone, Default)]
pub struct ProcessorReport {
    pub completed: u32,
    pub failed: u32,
    pub retried_later: u32,
}

impl NlpProcessor {
    pub fn new(
        pipeline: NlpPipeline,
        articles: Arc<dyn ArticleRepository>,
        audit: Arc<AuditLogger>,
        metrics: Arc<PipelineMetrics>,
    ) -> Self {
        Self { pipeline, articles, audit, metrics }
    }

    /// Processes up to `batch_size` pending Articles in FIFO (scraped_at)
    /// order, applying each result/failure independently so one bad article
    /// never blocks the rest of the batch.
    pub async fn run_once(&self, batch_size: i64) -> Result<ProcessorReport> {
        let mut report = ProcessorReport::default();
        let pending = self.articles.list_pending_nlp(batch_size).await?;

        for article in pending {
            let started_at = Instant::now();
            let summary = article.summary.as_deref();
            match self.pipeline.analyze(&article.title, summary) {
                Ok(outcome) => {
                    self.articles
                        .apply_nlp_result(article.article_id, &outcome.into(), &self.audit)
                        .await?;
                    report.completed += 1;
                    self.metrics.nlp_processed_total.with_label_values(&["completed"]).inc();
                }
                Err(NlpFailure::ContentTooShort) => {
                    self.articles
                        .mark_nlp_failed(article.article_id, "content_too_short", &self.audit)
                        .await?;
                    report.failed += 1;
                    self.metrics.nlp_processed_total.with_label_values(&["failed"]).inc();
                }
                Err(NlpFailure::EmptyInput) => {
                    // Preprocessing error, not a content judgement — leave
                    // `pending` for a later retry (§4.6 failure semantics).
                    tracing::warn!(article_id = article.article_id, "empty NLP input, retrying later");
                    report.retried_later += 1;
                }
            }
            self.metrics.nlp_duration_seconds.with_label_values(&[]).observe(started_at.elapsed().as_secs_f64());
        }

        Ok(report)
    }
}
