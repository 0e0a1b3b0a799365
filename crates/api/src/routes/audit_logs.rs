//! Audit log routes.
//!
//! Read-only admin view over the append-only audit trail.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use domain::models::{AuditLog, AuditLogPage, ListAuditLogsQuery};
use persistence::repositories::AuditLogRepository;

use crate::app::AppState;
use crate::error::ApiError;

/// Create audit logs router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_audit_logs))
        .route("/:log_id", get(get_audit_log))
}

/// List audit logs with filtering and pagination.
///
/// GET /api/auditlogs
#[axum::debug_handler]
pub async fn list_audit_logs(
    State(state): State<AppState>,
    Query(query): Query<ListAuditLogsQuery>,
) -> Result<Json<AuditLogPage>, ApiError> {
    let repo = AuditLogRepository::new(state.pool.clone());
    let page = repo.list(&query).await?;
    Ok(Json(page))
}

/// Get a single audit log entry.
///
/// GET /api/auditlogs/:log_id
#[axum::debug_handler]
pub async fn get_audit_log(
    State(state): State<AppState>,
    Path(log_id): Path<i64>,
) -> Result<Json<AuditLog>, ApiError> {
    let repo = AuditLogRepository::new(state.pool.clone());

    match repo.find_by_id(log_id).await? {
        Some(log) => Ok(Json(log)),
        None => Err(ApiError::NotFound("Audit log not found".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use domain::models::ListAuditLogsQuery;

    #[test]
    fn list_query_parses_camel_case_filters() {
        let json = r#"{
            "page": 2,
            "limit": 25,
            "table": "electric_bills",
            "action": "UPDATE",
            "profileId": 7,
            "keyword": "60.00"
        }"#;
        let query: ListAuditLogsQuery = serde_json::from_str(json).unwrap();

        assert_eq!(query.page, Some(2));
        assert_eq!(query.limit, Some(25));
        assert_eq!(query.table.as_deref(), Some("electric_bills"));
        assert_eq!(query.action.as_deref(), Some("UPDATE"));
        assert_eq!(query.profile_id, Some(7));
        assert_eq!(query.keyword.as_deref(), Some("60.00"));
    }

    #[test]
    fn list_query_defaults_are_empty() {
        let query = ListAuditLogsQuery::default();
        assert!(query.page.is_none());
        assert!(query.table.is_none());
        assert!(query.keyword.is_none());
    }
}
