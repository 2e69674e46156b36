//! PreventIA HTTP server: REST surface over the Source Registry, Scraper
//! Orchestrator, NLP Pipeline and Analytics Query Layer (§6).
//!
//! Middleware stack, request order:
//! 1. Security headers (HSTS, CSP, X-Frame-Options)
//! 2. Request ID (distributed tracing correlation)
//! 3. Tracing (structured request/response logs)
//! 4. Compression
//! 5. CORS
//!
//! Authentication and RBAC are applied by an external wrapper in front of
//! this service (§6); this binary has no JWT or session handling of its own.

use axum::{
    http::{HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    Json, Router,
};
use chrono::Utc;
use preventia_core::audit::{AuditAction, AuditEvent};
use preventia_core::config::CorsConfig;
use preventia_core::{Config, DatabasePool};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api_middleware;
mod error;
mod error_handler;
mod handlers;
mod health;
mod response;
mod state;

use crate::state::AppState;

fn build_cors_layer(cors_config: &CorsConfig) -> Result<CorsLayer, Box<dyn std::error::Error>> {
    let mut cors = CorsLayer::new();

    if cors_config.allowed_origins.contains(&"*".to_string()) {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Result<Vec<HeaderValue>, _> =
            cors_config.allowed_origins.iter().map(|origin| origin.parse()).collect();
        cors = cors.allow_origin(origins?);
    }

    if cors_config.allowed_methods.contains(&"*".to_string()) {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Result<Vec<Method>, _> =
            cors_config.allowed_methods.iter().map(|method| method.parse()).collect();
        cors = cors.allow_methods(methods?);
    }

    if cors_config.allowed_headers.contains(&"*".to_string()) {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Result<Vec<HeaderName>, _> =
            cors_config.allowed_headers.iter().map(|header| header.parse()).collect();
        cors = cors.allow_headers(headers?);
    }

    if !cors_config.expose_headers.is_empty() {
        let expose_headers: Result<Vec<HeaderName>, _> =
            cors_config.expose_headers.iter().map(|header| header.parse()).collect();
        cors = cors.expose_headers(expose_headers?);
    }

    cors = cors.allow_credentials(cors_config.allow_credentials);

    if let Some(max_age) = cors_config.max_age {
        cors = cors.max_age(Duration::from_secs(max_age));
    }

    Ok(cors)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting PreventIA server...");

    let config = Config::load()?;
    info!("Configuration loaded successfully");

    let db = DatabasePool::new(config.database.clone()).await?;
    info!("Database pool initialized");

    db.run_migrations().await?;
    info!("Database migrations completed");

    let state = AppState::new(config.clone(), db).await?;
    info!("Application state initialized");

    spawn_nlp_worker(state.clone());
    spawn_retention_worker(state.clone());

    let app = create_app(state)?;

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>().unwrap_or([0, 0, 0, 0].into()),
        config.server.port,
    ));
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Drains pending NLP work in the background (§5: the NLP pipeline is not
/// triggered from any REST endpoint, it runs as a standing batch loop).
fn spawn_nlp_worker(state: AppState) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(30));
        loop {
            ticker.tick().await;
            match state.nlp_processor.run_once(50).await {
                Ok(report) => {
                    if report.completed > 0 || report.failed > 0 {
                        info!(
                            completed = report.completed,
                            failed = report.failed,
                            retried_later = report.retried_later,
                            "NLP batch processed"
                        );
                    }
                }
                Err(e) => error!("NLP batch processing failed: {}", e),
            }
        }
    });
}

/// Clears content/summary on Articles past `data_retention_expires_at` once a
/// day (§3/§8 scenario 5), auditing each purge individually.
fn spawn_retention_worker(state: AppState) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(24 * 60 * 60));
        loop {
            ticker.tick().await;
            match state.articles.purge_expired(Utc::now()).await {
                Ok(purged_ids) if purged_ids.is_empty() => {}
                Ok(purged_ids) => {
                    info!(count = purged_ids.len(), "retention purge completed");
                    for article_id in purged_ids {
                        let event = AuditEvent::builder(
                            AuditAction::Delete,
                            format!("article {} purged on retention expiry", article_id),
                        )
                        .resource("articles", article_id.to_string())
                        .build();
                        if let Err(e) = state.audit.log_event(event).await {
                            error!("failed to audit retention purge for article {}: {}", article_id, e);
                        }
                    }
                }
                Err(e) => error!("retention purge failed: {}", e),
            }
        }
    });
}

async fn metrics_endpoint(axum::extract::State(state): axum::extract::State<AppState>) -> impl IntoResponse {
    (
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics_service.get_metrics(),
    )
}

fn create_app(state: AppState) -> Result<Router, Box<dyn std::error::Error>> {
    let router = Router::new()
        .nest("/api/v1", create_api_routes())
        .route("/health", axum::routing::get(health::health_check))
        .route("/ready", axum::routing::get(health::readiness_check))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(
                    api_middleware::security_headers::security_headers_middleware,
                ))
                .layer(axum::middleware::from_fn(api_middleware::request_id::request_id_middleware))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_request(DefaultOnRequest::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(CompressionLayer::new())
                .layer(build_cors_layer(&state.config.cors)?),
        )
        .with_state(state)
        .fallback(handler_404);

    Ok(router)
}

fn create_api_routes() -> Router<AppState> {
    Router::new()
        .nest("/sources", handlers::sources::source_routes())
        .nest("/articles", handlers::articles::article_routes())
        .nest("/analytics", handlers::analytics::analytics_routes())
        .nest("/compliance", handlers::compliance::compliance_routes())
        .nest("/scrapers", handlers::scrapers::scraper_routes())
}

async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "status": "error",
            "errors": [{"code": "not_found", "message": "resource not found"}],
        })),
    )
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "preventia_api=debug,preventia_scraper=debug,preventia_nlp=debug,preventia_core=debug,tower_http=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }
}
