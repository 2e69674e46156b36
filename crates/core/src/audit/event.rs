use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Severity levels for audit events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSeverity {
    Info,
    Warning,
    Critical,
}

/// Actions an audit event can record. Mirrors the fixed action vocabulary
/// the compliance and domain layers emit against; `Custom` covers anything
/// outside that set without forcing a schema change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Validate,
    Review,
    Suspend,
    Activate,
    RobotsCheck,
    CopyrightReview,
    ContentRemoval,
    MigrationBaseline,
    Custom(String),
}

/// Core audit event structure. Every mutation to a `Source` or `Article`
/// produces one of these, and it is written in the same transaction as the
/// mutation it describes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: String,
    pub action: AuditAction,
    pub severity: EventSeverity,
    pub timestamp: DateTime<Utc>,
    pub actor_id: Option<String>,
    pub request_id: Option<String>,
    pub resource_type: Option<String>,
    pub resource_id: Option<String>,
    pub source_ip: Option<String>,
    pub user_agent: Option<String>,
    pub description: String,
    pub metadata: HashMap<String, serde_json::Value>,
    pub previous_values: Option<serde_json::Value>,
    pub new_values: Option<serde_json::Value>,
    pub outcome: EventOutcome,
    pub tags: Vec<String>,
}

/// Event outcome enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventOutcome {
    Success,
    Failure,
    Partial,
    Unknown,
}

impl std::fmt::Display for EventOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventOutcome::Success => write!(f, "success"),
            EventOutcome::Failure => write!(f, "failure"),
            EventOutcome::Partial => write!(f, "partial"),
            EventOutcome::Unknown => write!(f, "unknown"),
        }
    }
}

/// Builder for creating audit events
pub struct AuditEventBuilder {
    event: AuditEvent,
}

impl AuditEventBuilder {
    pub fn new(action: AuditAction, description: impl Into<String>) -> Self {
        Self {
            event: AuditEvent {
                id: Uuid::new_v4().to_string(),
                action,
                severity: EventSeverity::Info,
                timestamp: Utc::now(),
                actor_id: None,
                request_id: None,
                resource_type: None,
                resource_id: None,
                source_ip: None,
                user_agent: None,
                description: description.into(),
                metadata: HashMap::new(),
                previous_values: None,
                new_values: None,
                outcome: EventOutcome::Success,
                tags: Vec::new(),
            },
        }
    }

    pub fn severity(mut self, severity: EventSeverity) -> Self {
        self.event.severity = severity;
        self
    }

    pub fn actor_id(mut self, actor_id: impl Into<String>) -> Self {
        self.event.actor_id = Some(actor_id.into());
        self
    }

    pub fn request_id(mut self, request_id: impl Into<String>) -> Self {
        self.event.request_id = Some(request_id.into());
        self
    }

    pub fn resource(mut self, resource_type: impl Into<String>, resource_id: impl Into<String>) -> Self {
        self.event.resource_type = Some(resource_type.into());
        self.event.resource_id = Some(resource_id.into());
        self
    }

    pub fn source_ip(mut self, source_ip: impl Into<String>) -> Self {
        self.event.source_ip = Some(source_ip.into());
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.event.user_agent = Some(user_agent.into());
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.event.metadata.insert(key.into(), value);
        self
    }

    pub fn previous_values(mut self, values: serde_json::Value) -> Self {
        self.event.previous_values = Some(values);
        self
    }

    pub fn new_values(mut self, values: serde_json::Value) -> Self {
        self.event.new_values = Some(values);
        self
    }

    pub fn outcome(mut self, outcome: EventOutcome) -> Self {
        self.event.outcome = outcome;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.event.tags.push(tag.into());
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.event.tags.extend(tags);
        self
    }

    pub fn build(self) -> AuditEvent {
        self.event
    }
}

impl AuditEvent {
    pub fn builder(action: AuditAction, description: impl Into<String>) -> AuditEventBuilder {
        AuditEventBuilder::new(action, description)
    }

    /// Whether this event warrants operator attention beyond the audit trail.
    pub fn should_alert(&self) -> bool {
        matches!(self.severity, EventSeverity::Critical)
            || matches!(self.outcome, EventOutcome::Failure)
            || matches!(self.action, AuditAction::ContentRemoval)
    }

    pub fn category(&self) -> &'static str {
        match &self.action {
            AuditAction::Create | AuditAction::Update | AuditAction::Delete => "resource",
            AuditAction::Validate | AuditAction::Review => "review",
            AuditAction::Suspend | AuditAction::Activate => "lifecycle",
            AuditAction::RobotsCheck | AuditAction::CopyrightReview | AuditAction::ContentRemoval => {
                "compliance"
            }
            AuditAction::MigrationBaseline => "system",
            AuditAction::Custom(_) => "custom",
        }
    }

    pub fn to_log_format(&self) -> String {
        format!(
            "[{}] {} by {} on {}: {}",
            self.severity,
            self.action,
            self.actor_id.as_deref().unwrap_or("system"),
            self.resource_type.as_deref().unwrap_or("unknown"),
            self.description
        )
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditAction::Custom(name) => write!(f, "CUSTOM_{}", name.to_uppercase()),
            AuditAction::Create => write!(f, "CREATE"),
            AuditAction::Update => write!(f, "UPDATE"),
            AuditAction::Delete => write!(f, "DELETE"),
            AuditAction::Validate => write!(f, "VALIDATE"),
            AuditAction::Review => write!(f, "REVIEW"),
            AuditAction::Suspend => write!(f, "SUSPEND"),
            AuditAction::Activate => write!(f, "ACTIVATE"),
            AuditAction::RobotsCheck => write!(f, "ROBOTS_CHECK"),
            AuditAction::CopyrightReview => write!(f, "COPYRIGHT_REVIEW"),
            AuditAction::ContentRemoval => write!(f, "CONTENT_REMOVAL"),
            AuditAction::MigrationBaseline => write!(f, "MIGRATION_BASELINE"),
        }
    }
}

impl std::fmt::Display for EventSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_removal_always_alerts() {
        let event = AuditEvent::builder(AuditAction::ContentRemoval, "removed on legal notice").build();
        assert!(event.should_alert());
    }

    #[test]
    fn category_groups_compliance_actions() {
        let event = AuditEvent::builder(AuditAction::RobotsCheck, "checked robots.txt").build();
        assert_eq!(event.category(), "compliance");
    }
}
