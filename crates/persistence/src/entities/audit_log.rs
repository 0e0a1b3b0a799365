//! Audit log entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::str::FromStr;

use domain::models::{ActionType, AuditLog};

/// Database row mapping for the audit_logs table.
#[derive(Debug, Clone, FromRow)]
pub struct AuditLogEntity {
    pub log_id: i64,
    pub profile_id: Option<i64>,
    pub target_record_id: String,
    pub action_type: String,
    pub target_table: String,
    pub action_timestamp: DateTime<Utc>,
    pub action_detail: Option<String>,
}

impl From<AuditLogEntity> for AuditLog {
    fn from(entity: AuditLogEntity) -> Self {
        Self {
            log_id: entity.log_id,
            profile_id: entity.profile_id,
            target_record_id: entity.target_record_id,
            action_type: ActionType::from_str(&entity.action_type).unwrap_or(ActionType::Insert), // Default fallback
            target_table: entity.target_table,
            action_timestamp: entity.action_timestamp,
            action_detail: entity.action_detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_domain_log() {
        let entity = AuditLogEntity {
            log_id: 3,
            profile_id: Some(7),
            target_record_id: "12".to_string(),
            action_type: "DELETE".to_string(),
            target_table: "electric_bills".to_string(),
            action_timestamp: Utc::now(),
            action_detail: Some("{\"billId\":12}".to_string()),
        };

        let log = AuditLog::from(entity);

        assert_eq!(log.action_type, ActionType::Delete);
        assert_eq!(log.target_table, "electric_bills");
        assert_eq!(log.profile_id, Some(7));
    }
}
