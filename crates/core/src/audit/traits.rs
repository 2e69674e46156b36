use super::AuditEvent;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{Postgres, Transaction};

/// Trait for audit backends (database, file, remote, etc.)
#[async_trait]
pub trait AuditBackend: Send + Sync {
    /// Store an audit event on its own connection.
    async fn store_event(&self, event: &AuditEvent) -> Result<()>;

    /// Store an audit event using the caller's transaction, so the event
    /// commits or rolls back atomically with the action it describes.
    async fn store_event_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event: &AuditEvent,
    ) -> Result<()>;

    async fn retrieve_events(&self, filter: &AuditFilter) -> Result<Vec<AuditEvent>>;

    async fn count_events(&self, filter: &AuditFilter) -> Result<u64>;

    async fn health_check(&self) -> Result<BackendHealth>;

    /// Clean up events older than the retention cutoff, returning the
    /// number of rows removed.
    async fn cleanup_old_events(&self, older_than: DateTime<Utc>) -> Result<u64>;
}

/// Health status of audit backend
#[derive(Debug, Clone)]
pub struct BackendHealth {
    pub is_healthy: bool,
    pub message: Option<String>,
    pub last_write: Option<DateTime<Utc>>,
    pub events_stored_today: Option<u64>,
}

/// Filter for querying audit events
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub actor_id: Option<String>,
    pub actions: Option<Vec<String>>,
    pub severities: Option<Vec<String>>,
    pub resource_type: Option<String>,
    pub resource_id: Option<String>,
    pub outcomes: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub description_contains: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub sort_order: SortOrder,
}

/// Sort order for audit events
#[derive(Debug, Clone)]
pub enum SortOrder {
    TimestampAsc,
    TimestampDesc,
    SeverityDesc,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::TimestampDesc
    }
}

/// Trait for types that can be audited
pub trait Auditable {
    fn resource_type() -> &'static str;
    fn resource_id(&self) -> String;
    fn to_audit_json(&self) -> Value;
}

/// Builder for audit filters
pub struct AuditFilterBuilder {
    filter: AuditFilter,
}

impl AuditFilterBuilder {
    pub fn new() -> Self {
        Self {
            filter: AuditFilter::default(),
        }
    }

    pub fn time_range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.filter.start_time = Some(start);
        self.filter.end_time = Some(end);
        self
    }

    pub fn actor_id(mut self, actor_id: impl Into<String>) -> Self {
        self.filter.actor_id = Some(actor_id.into());
        self
    }

    pub fn actions(mut self, actions: Vec<String>) -> Self {
        self.filter.actions = Some(actions);
        self
    }

    pub fn severities(mut self, severities: Vec<String>) -> Self {
        self.filter.severities = Some(severities);
        self
    }

    pub fn resource_type(mut self, resource_type: impl Into<String>) -> Self {
        self.filter.resource_type = Some(resource_type.into());
        self
    }

    pub fn resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.filter.resource_id = Some(resource_id.into());
        self
    }

    pub fn outcomes(mut self, outcomes: Vec<String>) -> Self {
        self.filter.outcomes = Some(outcomes);
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.filter.tags = Some(tags);
        self
    }

    pub fn description_contains(mut self, text: impl Into<String>) -> Self {
        self.filter.description_contains = Some(text.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.filter.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.filter.offset = Some(offset);
        self
    }

    pub fn sort_order(mut self, sort_order: SortOrder) -> Self {
        self.filter.sort_order = sort_order;
        self
    }

    pub fn build(self) -> AuditFilter {
        self.filter
    }
}

impl Default for AuditFilterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditFilter {
    pub fn builder() -> AuditFilterBuilder {
        AuditFilterBuilder::new()
    }
}
