//! Audit log domain models.
//!
//! Every mutation appends one immutable record: who acted, which table, which
//! record, and a serialized detail payload. Records are never updated or
//! deleted by the application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;

/// Kind of mutation an audit record describes. Stored in uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionType {
    Insert,
    Update,
    Delete,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Insert => "INSERT",
            ActionType::Update => "UPDATE",
            ActionType::Delete => "DELETE",
        }
    }
}

impl FromStr for ActionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INSERT" => Ok(ActionType::Insert),
            "UPDATE" => Ok(ActionType::Update),
            "DELETE" => Ok(ActionType::Delete),
            _ => Err(format!("Unknown audit action type: {}", s)),
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Detail payload attached to an audit record.
///
/// Stored as text: strings pass through unchanged, structured payloads are
/// JSON-serialized. The stored form is parsed back only for display, never to
/// drive logic.
#[derive(Debug, Clone, PartialEq)]
pub enum AuditDetail {
    Text(String),
    Structured(JsonValue),
}

impl AuditDetail {
    /// Renders the detail into its stored text form.
    pub fn into_stored(self) -> String {
        match self {
            AuditDetail::Text(s) => s,
            AuditDetail::Structured(v) => v.to_string(),
        }
    }
}

/// One immutable audit record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub log_id: i64,
    /// Acting profile; `None` for anonymous flows or deleted actors.
    pub profile_id: Option<i64>,
    pub target_record_id: String,
    pub action_type: ActionType,
    pub target_table: String,
    pub action_timestamp: DateTime<Utc>,
    pub action_detail: Option<String>,
}

/// Input for appending a new audit record.
#[derive(Debug, Clone)]
pub struct CreateAuditLogInput {
    pub profile_id: Option<i64>,
    pub target_record_id: String,
    pub action_type: ActionType,
    pub target_table: String,
    pub action_detail: Option<AuditDetail>,
}

impl CreateAuditLogInput {
    pub fn new(
        action_type: ActionType,
        target_table: impl Into<String>,
        target_record_id: impl ToString,
    ) -> Self {
        Self {
            profile_id: None,
            target_record_id: target_record_id.to_string(),
            action_type,
            target_table: target_table.into(),
            action_detail: None,
        }
    }

    /// Sets the acting profile. Anonymous flows leave it unset.
    pub fn with_actor(mut self, profile_id: Option<i64>) -> Self {
        self.profile_id = profile_id;
        self
    }

    /// Attaches a structured detail payload.
    pub fn with_detail(mut self, detail: JsonValue) -> Self {
        self.action_detail = Some(AuditDetail::Structured(detail));
        self
    }

    /// Attaches a plain-text detail payload.
    pub fn with_detail_text(mut self, detail: impl Into<String>) -> Self {
        self.action_detail = Some(AuditDetail::Text(detail.into()));
        self
    }
}

/// Query parameters for listing audit records.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListAuditLogsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Exact match on target_table.
    pub table: Option<String>,
    /// Exact match on action_type.
    pub action: Option<String>,
    /// Exact match on the acting profile.
    pub profile_id: Option<i64>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    /// Substring match against target_record_id or action_detail.
    pub keyword: Option<String>,
}

/// Response page for audit record listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogPage {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub logs: Vec<AuditLog>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn action_type_round_trips_through_strings() {
        for action in [ActionType::Insert, ActionType::Update, ActionType::Delete] {
            assert_eq!(ActionType::from_str(action.as_str()).unwrap(), action);
        }
        assert!(ActionType::from_str("UPSERT").is_err());
        assert!(ActionType::from_str("insert").is_err());
    }

    #[test]
    fn structured_detail_stored_as_json_text() {
        let detail = AuditDetail::Structured(json!({"profileId": 7, "fields": ["contact"]}));
        let stored = detail.into_stored();
        let parsed: JsonValue = serde_json::from_str(&stored).unwrap();
        assert_eq!(parsed["profileId"], 7);
        assert_eq!(parsed["fields"][0], "contact");
    }

    #[test]
    fn text_detail_passes_through_unchanged() {
        let detail = AuditDetail::Text("Cascading delete success".to_string());
        assert_eq!(detail.into_stored(), "Cascading delete success");
    }

    #[test]
    fn builder_assembles_full_input() {
        let input = CreateAuditLogInput::new(ActionType::Update, "customers", 42)
            .with_actor(Some(9))
            .with_detail(json!({"profileId": 42, "fields": ["address", "status"]}));

        assert_eq!(input.profile_id, Some(9));
        assert_eq!(input.target_record_id, "42");
        assert_eq!(input.action_type, ActionType::Update);
        assert_eq!(input.target_table, "customers");
        assert!(input.action_detail.is_some());
    }

    #[test]
    fn builder_defaults_to_anonymous_actor() {
        let input = CreateAuditLogInput::new(ActionType::Insert, "profiles", 1);
        assert!(input.profile_id.is_none());
        assert!(input.action_detail.is_none());
    }

    #[test]
    fn audit_log_serializes_camel_case() {
        let log = AuditLog {
            log_id: 3,
            profile_id: None,
            target_record_id: "17".to_string(),
            action_type: ActionType::Delete,
            target_table: "electric_bills".to_string(),
            action_timestamp: Utc::now(),
            action_detail: Some("{\"billId\":17}".to_string()),
        };
        let json = serde_json::to_string(&log).unwrap();
        assert!(json.contains("\"logId\":3"));
        assert!(json.contains("\"actionType\":\"DELETE\""));
        assert!(json.contains("\"targetTable\":\"electric_bills\""));
    }
}
