use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

use super::registry::MetricsRegistry;

/// PreventIA pipeline metrics (§10.1): ingestion, compliance decisions, and
/// NLP throughput/latency. Names are registered bare and get the registry's
/// configured namespace (`preventia`) prepended on gather.
#[derive(Debug, Clone)]
pub struct PipelineMetrics {
    pub articles_ingested_total: IntCounterVec,
    pub compliance_decisions_total: IntCounterVec,
    pub nlp_processed_total: IntCounterVec,
    pub scrape_duration_seconds: HistogramVec,
    pub nlp_duration_seconds: HistogramVec,
}

impl PipelineMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let articles_ingested_total = IntCounterVec::new(
            Opts::new("articles_ingested_total", "Total number of articles ingested"),
            &["source_id"],
        )?;

        let compliance_decisions_total = IntCounterVec::new(
            Opts::new(
                "compliance_decisions_total",
                "Total number of fetch/store compliance decisions, by reason",
            ),
            &["reason"],
        )?;

        let nlp_processed_total = IntCounterVec::new(
            Opts::new("nlp_processed_total", "Total number of articles run through the NLP pipeline, by outcome"),
            &["status"],
        )?;

        let scrape_duration_seconds = HistogramVec::new(
            HistogramOpts::new("scrape_duration_seconds", "Time spent running one source scrape")
                .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0]),
            &["source_id"],
        )?;

        let nlp_duration_seconds = HistogramVec::new(
            HistogramOpts::new("nlp_duration_seconds", "Time spent running one NLP batch")
                .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
            &[],
        )?;

        Ok(Self {
            articles_ingested_total,
            compliance_decisions_total,
            nlp_processed_total,
            scrape_duration_seconds,
            nlp_duration_seconds,
        })
    }

    pub fn register_all(&self, registry: &MetricsRegistry) -> Result<(), prometheus::Error> {
        registry.register(self.articles_ingested_total.clone())?;
        registry.register(self.compliance_decisions_total.clone())?;
        registry.register(self.nlp_processed_total.clone())?;
        registry.register(self.scrape_duration_seconds.clone())?;
        registry.register(self.nlp_duration_seconds.clone())?;
        Ok(())
    }
}
