use super::{
    event::{AuditAction, AuditEvent, EventSeverity},
    traits::AuditBackend,
};
use crate::error::{Error, ErrorCode, ErrorMetrics, Result};
use sqlx::{Postgres, Transaction};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

/// High-level audit logger sitting in front of an `AuditBackend`.
#[derive(Clone)]
pub struct AuditLogger {
    backend: Arc<dyn AuditBackend>,
    error_metrics: Arc<ErrorMetrics>,
    context: Arc<RwLock<AuditContext>>,
}

/// Context that persists across audit operations in a request.
#[derive(Debug, Clone, Default)]
pub struct AuditContext {
    pub actor_id: Option<String>,
    pub request_id: Option<String>,
    pub source_ip: Option<String>,
    pub user_agent: Option<String>,
}

impl AuditLogger {
    pub fn new(backend: Arc<dyn AuditBackend>, error_metrics: Arc<ErrorMetrics>) -> Self {
        Self {
            backend,
            error_metrics,
            context: Arc::new(RwLock::new(AuditContext::default())),
        }
    }

    pub async fn set_context(&self, context: AuditContext) {
        let mut ctx = self.context.write().await;
        *ctx = context;
    }

    pub async fn update_context<F>(&self, updater: F)
    where
        F: FnOnce(&mut AuditContext),
    {
        let mut ctx = self.context.write().await;
        updater(&mut *ctx);
    }

    async fn fill_context(&self, mut event: AuditEvent) -> AuditEvent {
        let ctx = self.context.read().await;
        if event.actor_id.is_none() {
            event.actor_id = ctx.actor_id.clone();
        }
        if event.request_id.is_none() {
            event.request_id = ctx.request_id.clone();
        }
        if event.source_ip.is_none() {
            event.source_ip = ctx.source_ip.clone();
        }
        if event.user_agent.is_none() {
            event.user_agent = ctx.user_agent.clone();
        }
        event
    }

    fn log_structured(&self, event: &AuditEvent) {
        match event.severity {
            EventSeverity::Info => {
                info!(
                    event_id = %event.id,
                    action = %event.action,
                    actor_id = ?event.actor_id,
                    resource = ?event.resource_type,
                    description = %event.description,
                    "Audit event"
                );
            }
            EventSeverity::Warning => {
                warn!(
                    event_id = %event.id,
                    action = %event.action,
                    actor_id = ?event.actor_id,
                    resource = ?event.resource_type,
                    description = %event.description,
                    "Audit event (warning)"
                );
            }
            EventSeverity::Critical => {
                error!(
                    event_id = %event.id,
                    action = %event.action,
                    actor_id = ?event.actor_id,
                    resource = ?event.resource_type,
                    description = %event.description,
                    metadata = ?event.metadata,
                    "Critical audit event"
                );
            }
        }
    }

    /// Log an event on its own connection, independent of any caller transaction.
    pub async fn log_event(&self, event: AuditEvent) -> Result<()> {
        let event = self.fill_context(event).await;
        self.log_structured(&event);

        match self.backend.store_event(&event).await {
            Ok(_) => Ok(()),
            Err(e) => {
                let audit_error =
                    Error::new(ErrorCode::StorageError, format!("Failed to store audit event: {}", e));
                self.error_metrics.record_error(&audit_error).await;
                error!(event_id = %event.id, error = %e, "Failed to store audit event");
                Err(e)
            }
        }
    }

    /// Log an event inside the caller's transaction, so it commits or rolls
    /// back atomically with the action it describes (source/article writes).
    pub async fn log_event_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event: AuditEvent,
    ) -> Result<()> {
        let event = self.fill_context(event).await;
        self.log_structured(&event);
        self.backend.store_event_tx(tx, &event).await
    }

    /// Log a source or article lifecycle mutation (create/update/delete/suspend/activate).
    pub async fn log_resource_mutation_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        action: AuditAction,
        resource_type: &str,
        resource_id: &str,
        previous_values: Option<serde_json::Value>,
        new_values: Option<serde_json::Value>,
    ) -> Result<()> {
        let description = format!("{} {} {}", action, resource_type, resource_id);
        let mut event = AuditEvent::builder(action, description).resource(resource_type, resource_id);

        if let Some(prev) = previous_values {
            event = event.previous_values(prev);
        }
        if let Some(new) = new_values {
            event = event.new_values(new);
        }

        self.log_event_tx(tx, event.build()).await
    }

    /// Log a robots.txt evaluation against a source.
    pub async fn log_compliance_check(
        &self,
        source_id: &str,
        description: impl Into<String>,
        outcome: super::event::EventOutcome,
    ) -> Result<()> {
        let event = AuditEvent::builder(AuditAction::RobotsCheck, description)
            .resource("source", source_id)
            .outcome(outcome)
            .build();

        self.log_event(event).await
    }

    /// Log a takedown / copyright review decision, always critical.
    pub async fn log_legal_action(
        &self,
        action: AuditAction,
        article_id: &str,
        reason: impl Into<String>,
    ) -> Result<()> {
        let event = AuditEvent::builder(action, reason)
            .severity(EventSeverity::Critical)
            .resource("article", article_id)
            .build();

        self.log_event(event).await
    }
}

impl AuditContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_actor_id(mut self, actor_id: impl Into<String>) -> Self {
        self.actor_id = Some(actor_id.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn with_source_ip(mut self, source_ip: impl Into<String>) -> Self {
        self.source_ip = Some(source_ip.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}
