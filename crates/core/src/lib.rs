pub mod audit;
pub mod config;
pub mod database;
pub mod error;
pub mod metrics;
pub mod types;
pub mod utils;

pub use audit::{AuditBackend, AuditEvent, AuditLogger, DatabaseAuditRepository};
pub use config::Config;
pub use database::DatabasePool;
pub use error::{Error, ErrorCode, ErrorContext, ErrorMetrics, Result};
pub use metrics::{MetricsRegistry, MetricsService, PipelineMetrics};
pub use types::Permission;

#[cfg(test)]
mod tests;

// Re-export commonly used types from dependencies
pub use chrono::{DateTime, Utc};
pub use uuid::Uuid;
