//! Audit log repository for database operations.
//!
//! Records are append-only. Writes happen after the audited transaction has
//! committed, on the shared pool, so a failed audit insert never rolls back
//! the work it describes.

use domain::models::{AuditDetail, AuditLog, AuditLogPage, CreateAuditLogInput, ListAuditLogsQuery};
use shared::pagination::PageRequest;
use sqlx::PgPool;

use crate::entities::AuditLogEntity;
use crate::metrics::QueryTimer;

const AUDIT_COLUMNS: &str = "log_id, profile_id, target_record_id, action_type, target_table, \
     action_timestamp, action_detail";

/// Helper struct for building dynamic WHERE clauses from audit log filters.
/// Tracks conditions and parameter positions to avoid code duplication.
struct AuditLogFilterBuilder {
    conditions: Vec<String>,
    param_count: i32,
}

impl AuditLogFilterBuilder {
    /// Build filter conditions from a query.
    /// Returns the builder with WHERE clause and parameter count.
    fn build(query: &ListAuditLogsQuery) -> Self {
        let mut conditions = Vec::new();
        let mut param_count = 0;

        if query.table.is_some() {
            param_count += 1;
            conditions.push(format!("target_table = ${}", param_count));
        }

        if query.action.is_some() {
            param_count += 1;
            conditions.push(format!("action_type = ${}", param_count));
        }

        if query.profile_id.is_some() {
            param_count += 1;
            conditions.push(format!("profile_id = ${}", param_count));
        }

        if query.from.is_some() {
            param_count += 1;
            conditions.push(format!("action_timestamp >= ${}", param_count));
        }

        if query.to.is_some() {
            param_count += 1;
            conditions.push(format!("action_timestamp <= ${}", param_count));
        }

        if query.keyword.is_some() {
            param_count += 1;
            // One parameter, matched against both columns.
            conditions.push(format!(
                "(target_record_id ILIKE ${n} OR action_detail ILIKE ${n})",
                n = param_count
            ));
        }

        Self {
            conditions,
            param_count,
        }
    }

    /// Get the WHERE clause as a string.
    fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            "TRUE".to_string()
        } else {
            self.conditions.join(" AND ")
        }
    }

    /// Get the current parameter count.
    fn param_count(&self) -> i32 {
        self.param_count
    }
}

/// Macro to bind query filter parameters to a SQLx builder.
/// This avoids code duplication for binding optional query parameters.
macro_rules! bind_query_filters {
    ($builder:expr, $query:expr) => {{
        let mut b = $builder;
        if let Some(ref table) = $query.table {
            b = b.bind(table);
        }
        if let Some(ref action) = $query.action {
            b = b.bind(action);
        }
        if let Some(ref profile_id) = $query.profile_id {
            b = b.bind(profile_id);
        }
        if let Some(ref from) = $query.from {
            b = b.bind(from);
        }
        if let Some(ref to) = $query.to {
            b = b.bind(to);
        }
        if let Some(ref keyword) = $query.keyword {
            b = b.bind(format!("%{}%", keyword));
        }
        b
    }};
}

/// Repository for audit log database operations.
#[derive(Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append one audit record.
    pub async fn insert(&self, input: CreateAuditLogInput) -> Result<AuditLog, sqlx::Error> {
        let timer = QueryTimer::new("insert_audit_log");
        let detail = input.action_detail.map(AuditDetail::into_stored);

        let entity = sqlx::query_as::<_, AuditLogEntity>(&format!(
            r#"
            INSERT INTO audit_logs
                (profile_id, target_record_id, action_type, target_table, action_detail)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {AUDIT_COLUMNS}
            "#
        ))
        .bind(input.profile_id)
        .bind(&input.target_record_id)
        .bind(input.action_type.as_str())
        .bind(&input.target_table)
        .bind(detail)
        .fetch_one(&self.pool)
        .await?;
        timer.record();

        Ok(AuditLog::from(entity))
    }

    /// Insert an audit record asynchronously (fire and forget).
    /// Uses tokio::spawn to avoid blocking the request.
    pub fn insert_async(&self, input: CreateAuditLogInput) {
        let pool = self.pool.clone();
        tokio::spawn(async move {
            let repo = AuditLogRepository::new(pool);
            if let Err(e) = repo.insert(input).await {
                tracing::error!("Failed to insert audit log: {}", e);
            }
        });
    }

    /// Find one audit record by id.
    pub async fn find_by_id(&self, log_id: i64) -> Result<Option<AuditLog>, sqlx::Error> {
        let timer = QueryTimer::new("find_audit_log_by_id");
        let entity = sqlx::query_as::<_, AuditLogEntity>(&format!(
            "SELECT {AUDIT_COLUMNS} FROM audit_logs WHERE log_id = $1"
        ))
        .bind(log_id)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();

        Ok(entity.map(AuditLog::from))
    }

    /// List audit records with pagination and filtering, newest first.
    pub async fn list(&self, query: &ListAuditLogsQuery) -> Result<AuditLogPage, sqlx::Error> {
        let timer = QueryTimer::new("list_audit_logs");
        let window = PageRequest::from_query(query.page, query.limit);

        let filter = AuditLogFilterBuilder::build(query);
        let where_clause = filter.where_clause();
        let param_count = filter.param_count();

        let count_query = format!("SELECT COUNT(*) FROM audit_logs WHERE {}", where_clause);

        let count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        let count_builder = bind_query_filters!(count_builder, query);
        let total: i64 = count_builder.fetch_one(&self.pool).await?;

        let list_query = format!(
            r#"
            SELECT {}
            FROM audit_logs
            WHERE {}
            ORDER BY action_timestamp DESC, log_id DESC
            LIMIT ${} OFFSET ${}
            "#,
            AUDIT_COLUMNS,
            where_clause,
            param_count + 1,
            param_count + 2
        );

        let list_builder = sqlx::query_as::<_, AuditLogEntity>(&list_query);
        let list_builder = bind_query_filters!(list_builder, query);
        let entities = list_builder
            .bind(window.limit)
            .bind(window.offset())
            .fetch_all(&self.pool)
            .await?;

        timer.record();

        Ok(AuditLogPage {
            page: window.page,
            limit: window.limit,
            total,
            logs: entities.into_iter().map(AuditLog::from).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_set_matches_everything() {
        let filter = AuditLogFilterBuilder::build(&ListAuditLogsQuery::default());
        assert_eq!(filter.where_clause(), "TRUE");
        assert_eq!(filter.param_count(), 0);
    }

    #[test]
    fn conditions_numbered_in_declaration_order() {
        let query = ListAuditLogsQuery {
            table: Some("customers".to_string()),
            profile_id: Some(7),
            ..Default::default()
        };
        let filter = AuditLogFilterBuilder::build(&query);
        assert_eq!(
            filter.where_clause(),
            "target_table = $1 AND profile_id = $2"
        );
        assert_eq!(filter.param_count(), 2);
    }

    #[test]
    fn keyword_condition_reuses_one_parameter() {
        let query = ListAuditLogsQuery {
            action: Some("DELETE".to_string()),
            keyword: Some("42".to_string()),
            ..Default::default()
        };
        let filter = AuditLogFilterBuilder::build(&query);
        assert_eq!(
            filter.where_clause(),
            "action_type = $1 AND (target_record_id ILIKE $2 OR action_detail ILIKE $2)"
        );
    }
}
