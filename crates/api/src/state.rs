use preventia_compliance::ComplianceEvaluator;
use preventia_core::audit::AuditLogger;
use preventia_core::error::ErrorMetrics;
use preventia_core::{Config, DatabasePool, MetricsRegistry, MetricsService, PipelineMetrics};
use preventia_domain::source::repository::{PostgresSourceRepository, SourceRepository};
use preventia_domain::source::service::{DefaultSourceService, SourceService};
use preventia_domain::{ArticleRepository, PostgresArticleRepository};
use preventia_nlp::{NlpPipeline, NlpProcessor, SentimentThresholds};
use preventia_scraper::{ExtractorRegistry, ScraperOrchestrator};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: DatabasePool,
    pub audit: Arc<AuditLogger>,
    pub sources: Arc<dyn SourceRepository>,
    pub articles: Arc<dyn ArticleRepository>,
    pub source_service: Arc<dyn SourceService>,
    pub orchestrator: Arc<ScraperOrchestrator>,
    pub nlp_processor: Arc<NlpProcessor>,
    pub metrics_service: Arc<MetricsService>,
}

impl AppState {
    pub async fn new(config: Config, db: DatabasePool) -> preventia_core::error::Result<Self> {
        let pool = db.pool.clone();

        let audit_backend = Arc::new(preventia_core::audit::DatabaseAuditRepository::new(Arc::new(
            pool.clone(),
        )));
        let error_metrics = Arc::new(ErrorMetrics::new());
        let audit = Arc::new(AuditLogger::new(audit_backend, error_metrics));

        let legal_notices = Arc::new(preventia_compliance::legal_notice::PostgresLegalNoticeRepository::new(
            pool.clone(),
        ));
        let compliance = Arc::new(ComplianceEvaluator::new(config.compliance.clone(), legal_notices));

        let sources: Arc<dyn SourceRepository> = Arc::new(PostgresSourceRepository::new(pool.clone()));
        let articles: Arc<dyn ArticleRepository> = Arc::new(PostgresArticleRepository::new(pool.clone()));
        let source_service: Arc<dyn SourceService> =
            Arc::new(DefaultSourceService::new(pool.clone(), audit.clone()));

        let metrics_registry = MetricsRegistry::new(config.metrics.clone());
        let pipeline_metrics = Arc::new(PipelineMetrics::new().map_err(|e| {
            preventia_core::error::Error::new(
                preventia_core::error::ErrorCode::InternalServerError,
                format!("failed to construct pipeline metrics: {}", e),
            )
        })?);
        pipeline_metrics.register_all(&metrics_registry).map_err(|e| {
            preventia_core::error::Error::new(
                preventia_core::error::ErrorCode::InternalServerError,
                format!("failed to register pipeline metrics: {}", e),
            )
        })?;
        let metrics_service = Arc::new(MetricsService::new(metrics_registry));

        let extractors = Arc::new(ExtractorRegistry::new());
        let orchestrator = Arc::new(ScraperOrchestrator::new(
            compliance,
            sources.clone(),
            articles.clone(),
            extractors,
            audit.clone(),
            pipeline_metrics.clone(),
        ));

        let nlp_pipeline = NlpPipeline::new(
            SentimentThresholds {
                positive_at_or_above: config.nlp.positive_threshold,
                negative_at_or_below: config.nlp.negative_threshold,
            },
            config.nlp.max_keywords,
        );
        let nlp_processor = Arc::new(NlpProcessor::new(
            nlp_pipeline,
            articles.clone(),
            audit.clone(),
            pipeline_metrics,
        ));

        Ok(Self {
            config,
            db,
            audit,
            sources,
            articles,
            source_service,
            orchestrator,
            nlp_processor,
            metrics_service,
        })
    }
}
