use super::{
    event::{AuditAction, AuditEvent, EventOutcome, EventSeverity},
    traits::{AuditBackend, AuditFilter, BackendHealth, SortOrder},
};
use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder, Row, Transaction};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Database-backed audit repository. One row per event, written in the same
/// transaction as the mutation it describes when called via `store_event_tx`.
pub struct DatabaseAuditRepository {
    pool: Arc<PgPool>,
    table_name: String,
}

impl DatabaseAuditRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self {
            pool,
            table_name: "audit_log".to_string(),
        }
    }

    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    pub async fn initialize(&self) -> Result<()> {
        let sql = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                id VARCHAR(255) PRIMARY KEY,
                action VARCHAR(64) NOT NULL,
                severity VARCHAR(20) NOT NULL,
                timestamp TIMESTAMPTZ NOT NULL,
                actor_id VARCHAR(255),
                request_id VARCHAR(255),
                resource_type VARCHAR(100),
                resource_id VARCHAR(255),
                source_ip INET,
                user_agent TEXT,
                description TEXT NOT NULL,
                metadata JSONB,
                previous_values JSONB,
                new_values JSONB,
                outcome VARCHAR(20) NOT NULL,
                tags TEXT[],
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );

            CREATE INDEX IF NOT EXISTS idx_{table}_timestamp ON {table} (timestamp);
            CREATE INDEX IF NOT EXISTS idx_{table}_actor_id ON {table} (actor_id);
            CREATE INDEX IF NOT EXISTS idx_{table}_action ON {table} (action);
            CREATE INDEX IF NOT EXISTS idx_{table}_resource ON {table} (resource_type, resource_id);
            CREATE INDEX IF NOT EXISTS idx_{table}_severity ON {table} (severity);
            "#,
            table = self.table_name,
        );

        sqlx::query(&sql).execute(self.pool.as_ref()).await?;
        info!("Audit table '{}' initialized", self.table_name);
        Ok(())
    }

    fn bind_insert<'q>(
        query: sqlx::query::Query<'q, Postgres, sqlx::postgres::PgArguments>,
        event: &'q AuditEvent,
    ) -> sqlx::query::Query<'q, Postgres, sqlx::postgres::PgArguments> {
        query
            .bind(&event.id)
            .bind(event.action.to_string())
            .bind(event.severity.to_string())
            .bind(event.timestamp)
            .bind(&event.actor_id)
            .bind(&event.request_id)
            .bind(&event.resource_type)
            .bind(&event.resource_id)
            .bind(&event.source_ip)
            .bind(&event.user_agent)
            .bind(&event.description)
            .bind(serde_json::to_value(&event.metadata).unwrap_or(serde_json::Value::Null))
            .bind(&event.previous_values)
            .bind(&event.new_values)
            .bind(event.outcome.to_string())
            .bind(&event.tags)
    }

    fn insert_sql(&self) -> String {
        format!(
            r#"
            INSERT INTO {} (
                id, action, severity, timestamp, actor_id,
                request_id, resource_type, resource_id, source_ip,
                user_agent, description, metadata, previous_values, new_values,
                outcome, tags
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16
            )
            "#,
            self.table_name
        )
    }

    fn row_to_event(row: sqlx::postgres::PgRow) -> AuditEvent {
        AuditEvent {
            id: row.get("id"),
            action: parse_action(&row.get::<String, _>("action")),
            severity: parse_severity(&row.get::<String, _>("severity")),
            timestamp: row.get("timestamp"),
            actor_id: row.get("actor_id"),
            request_id: row.get("request_id"),
            resource_type: row.get("resource_type"),
            resource_id: row.get("resource_id"),
            source_ip: row.get::<Option<String>, _>("source_ip"),
            user_agent: row.get("user_agent"),
            description: row.get("description"),
            metadata: row
                .get::<Option<serde_json::Value>, _>("metadata")
                .and_then(|v| serde_json::from_value(v).ok())
                .unwrap_or_default(),
            previous_values: row.get("previous_values"),
            new_values: row.get("new_values"),
            outcome: parse_outcome(&row.get::<String, _>("outcome")),
            tags: row.get::<Vec<String>, _>("tags"),
        }
    }
}

#[async_trait]
impl AuditBackend for DatabaseAuditRepository {
    async fn store_event(&self, event: &AuditEvent) -> Result<()> {
        let sql = self.insert_sql();
        let query = Self::bind_insert(sqlx::query(&sql), event);

        match query.execute(self.pool.as_ref()).await {
            Ok(_) => {
                debug!("Stored audit event: {}", event.id);
                Ok(())
            }
            Err(e) => {
                error!("Failed to store audit event {}: {}", event.id, e);
                Err(Error::from(e))
            }
        }
    }

    async fn store_event_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event: &AuditEvent,
    ) -> Result<()> {
        let sql = self.insert_sql();
        let query = Self::bind_insert(sqlx::query(&sql), event);
        query.execute(&mut **tx).await?;
        debug!("Stored audit event (tx): {}", event.id);
        Ok(())
    }

    async fn retrieve_events(&self, filter: &AuditFilter) -> Result<Vec<AuditEvent>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT id, action, severity, timestamp, actor_id, request_id, resource_type, \
             resource_id, source_ip, user_agent, description, metadata, previous_values, \
             new_values, outcome, tags FROM {}",
            self.table_name
        ));

        let mut first_condition = true;
        let mut push_where = |b: &mut QueryBuilder<Postgres>| {
            b.push(if first_condition { " WHERE " } else { " AND " });
            first_condition = false;
        };

        if let Some(start_time) = &filter.start_time {
            push_where(&mut builder);
            builder.push("timestamp >= ").push_bind(*start_time);
        }
        if let Some(end_time) = &filter.end_time {
            push_where(&mut builder);
            builder.push("timestamp <= ").push_bind(*end_time);
        }
        if let Some(actor_id) = &filter.actor_id {
            push_where(&mut builder);
            builder.push("actor_id = ").push_bind(actor_id.clone());
        }
        if let Some(resource_type) = &filter.resource_type {
            push_where(&mut builder);
            builder.push("resource_type = ").push_bind(resource_type.clone());
        }
        if let Some(resource_id) = &filter.resource_id {
            push_where(&mut builder);
            builder.push("resource_id = ").push_bind(resource_id.clone());
        }
        if let Some(description_contains) = &filter.description_contains {
            push_where(&mut builder);
            builder
                .push("description ILIKE ")
                .push_bind(format!("%{}%", description_contains));
        }

        let order_by = match filter.sort_order {
            SortOrder::TimestampAsc => "timestamp ASC",
            SortOrder::TimestampDesc => "timestamp DESC",
            SortOrder::SeverityDesc => {
                "CASE severity WHEN 'critical' THEN 1 WHEN 'warning' THEN 2 ELSE 3 END, timestamp DESC"
            }
        };
        builder.push(" ORDER BY ").push(order_by);

        if let Some(limit) = filter.limit {
            builder.push(" LIMIT ").push_bind(limit as i64);
        }
        if let Some(offset) = filter.offset {
            builder.push(" OFFSET ").push_bind(offset as i64);
        }

        let rows = builder.build().fetch_all(self.pool.as_ref()).await?;
        Ok(rows.into_iter().map(Self::row_to_event).collect())
    }

    async fn count_events(&self, filter: &AuditFilter) -> Result<u64> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", self.table_name));

        let mut first_condition = true;
        let mut push_where = |b: &mut QueryBuilder<Postgres>| {
            b.push(if first_condition { " WHERE " } else { " AND " });
            first_condition = false;
        };

        if let Some(resource_type) = &filter.resource_type {
            push_where(&mut builder);
            builder.push("resource_type = ").push_bind(resource_type.clone());
        }
        if let Some(actor_id) = &filter.actor_id {
            push_where(&mut builder);
            builder.push("actor_id = ").push_bind(actor_id.clone());
        }

        let count: i64 = builder.build_query_scalar().fetch_one(self.pool.as_ref()).await?;
        Ok(count as u64)
    }

    async fn health_check(&self) -> Result<BackendHealth> {
        match sqlx::query("SELECT 1").fetch_one(self.pool.as_ref()).await {
            Ok(_) => Ok(BackendHealth {
                is_healthy: true,
                message: None,
                last_write: None,
                events_stored_today: None,
            }),
            Err(e) => Ok(BackendHealth {
                is_healthy: false,
                message: Some(e.to_string()),
                last_write: None,
                events_stored_today: None,
            }),
        }
    }

    async fn cleanup_old_events(&self, older_than: DateTime<Utc>) -> Result<u64> {
        let sql = format!("DELETE FROM {} WHERE timestamp < $1", self.table_name);

        let result = sqlx::query(&sql)
            .bind(older_than)
            .execute(self.pool.as_ref())
            .await?;

        info!("Cleaned up {} old audit events", result.rows_affected());
        Ok(result.rows_affected())
    }
}

fn parse_action(s: &str) -> AuditAction {
    match s {
        "CREATE" => AuditAction::Create,
        "UPDATE" => AuditAction::Update,
        "DELETE" => AuditAction::Delete,
        "VALIDATE" => AuditAction::Validate,
        "REVIEW" => AuditAction::Review,
        "SUSPEND" => AuditAction::Suspend,
        "ACTIVATE" => AuditAction::Activate,
        "ROBOTS_CHECK" => AuditAction::RobotsCheck,
        "COPYRIGHT_REVIEW" => AuditAction::CopyrightReview,
        "CONTENT_REMOVAL" => AuditAction::ContentRemoval,
        "MIGRATION_BASELINE" => AuditAction::MigrationBaseline,
        other => AuditAction::Custom(other.to_string()),
    }
}

fn parse_severity(s: &str) -> EventSeverity {
    match s.to_lowercase().as_str() {
        "info" => EventSeverity::Info,
        "warning" => EventSeverity::Warning,
        "critical" => EventSeverity::Critical,
        _ => EventSeverity::Info,
    }
}

fn parse_outcome(s: &str) -> EventOutcome {
    match s.to_lowercase().as_str() {
        "success" => EventOutcome::Success,
        "failure" => EventOutcome::Failure,
        "partial" => EventOutcome::Partial,
        _ => EventOutcome::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_action_round_trips_known_values() {
        assert_eq!(parse_action("ROBOTS_CHECK"), AuditAction::RobotsCheck);
        assert_eq!(parse_action("WEIRD_VALUE"), AuditAction::Custom("WEIRD_VALUE".to_string()));
    }

    #[test]
    fn parse_outcome_defaults_to_unknown() {
        assert_eq!(parse_outcome("bogus"), EventOutcome::Unknown);
    }
}
