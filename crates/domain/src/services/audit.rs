//! Audit event constructors for entity mutations.
//!
//! Every write path records an audit entry after its transaction commits. The
//! helpers here keep the detail payloads consistent per entity so the audit
//! trail stays queryable; actual insertion is fire-and-forget in the
//! persistence layer.

use crate::models::audit_log::{ActionType, CreateAuditLogInput};
use crate::models::bill::BillStatus;
use crate::models::feedback::FeedbackStatus;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;

/// Audit target table names, matching the migration schema.
pub mod tables {
    pub const PROFILES: &str = "profiles";
    pub const CUSTOMERS: &str = "customers";
    pub const STAFF: &str = "staff";
    pub const ADMINS: &str = "admins";
    pub const TARIFFS: &str = "tariffs";
    pub const ELECTRIC_BILLS: &str = "electric_bills";
    pub const FEEDBACK: &str = "feedback";
    pub const FEEDBACK_REPLIES: &str = "feedback_replies";
}

/// Collects the names of fields a partial update actually touched.
///
/// Update audit entries carry a `fields` array naming the changed columns.
/// Handlers feed each optional input through [`track`](Self::track) and the
/// collected names land in the detail payload unchanged, so the array reflects
/// what the caller sent rather than what the row ended up as.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangedFields(Vec<&'static str>);

impl ChangedFields {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Record `name` as changed when `present` is true.
    pub fn track(&mut self, name: &'static str, present: bool) -> &mut Self {
        if present {
            self.0.push(name);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> &[&'static str] {
        &self.0
    }
}

/// Convenience constructors for the audit entries each write path records.
pub mod audit_events {
    use super::*;

    /// Audit entry for a customer account creation (registration included).
    pub fn customer_created(
        customer_id: i64,
        profile_id: i64,
        email: &str,
        actor: Option<i64>,
    ) -> CreateAuditLogInput {
        CreateAuditLogInput::new(ActionType::Insert, tables::CUSTOMERS, customer_id)
            .with_actor(actor)
            .with_detail(json!({ "profileId": profile_id, "email": email }))
    }

    /// Audit entry for a customer partial update.
    pub fn customer_updated(
        customer_id: i64,
        profile_id: i64,
        fields: &ChangedFields,
        actor: Option<i64>,
    ) -> CreateAuditLogInput {
        CreateAuditLogInput::new(ActionType::Update, tables::CUSTOMERS, customer_id)
            .with_actor(actor)
            .with_detail(json!({ "profileId": profile_id, "fields": fields.names() }))
    }

    /// Audit entry for a cascading customer deletion.
    pub fn customer_deleted(
        customer_id: i64,
        profile_id: i64,
        actor: Option<i64>,
    ) -> CreateAuditLogInput {
        CreateAuditLogInput::new(ActionType::Delete, tables::CUSTOMERS, customer_id)
            .with_actor(actor)
            .with_detail(json!({
                "profileId": profile_id,
                "message": "Cascading delete success",
            }))
    }

    /// Audit entry for a staff account creation.
    pub fn staff_created(
        staff_id: i64,
        profile_id: i64,
        email: &str,
        actor: Option<i64>,
    ) -> CreateAuditLogInput {
        CreateAuditLogInput::new(ActionType::Insert, tables::STAFF, staff_id)
            .with_actor(actor)
            .with_detail(json!({ "profileId": profile_id, "email": email }))
    }

    /// Audit entry for a staff partial update.
    pub fn staff_updated(
        staff_id: i64,
        profile_id: i64,
        fields: &ChangedFields,
        actor: Option<i64>,
    ) -> CreateAuditLogInput {
        CreateAuditLogInput::new(ActionType::Update, tables::STAFF, staff_id)
            .with_actor(actor)
            .with_detail(json!({ "profileId": profile_id, "fields": fields.names() }))
    }

    /// Audit entry for a staff deletion.
    pub fn staff_deleted(staff_id: i64, profile_id: i64, actor: Option<i64>) -> CreateAuditLogInput {
        CreateAuditLogInput::new(ActionType::Delete, tables::STAFF, staff_id)
            .with_actor(actor)
            .with_detail(json!({ "profileId": profile_id }))
    }

    /// Audit entry for an admin account creation.
    pub fn admin_created(
        admin_id: i64,
        profile_id: i64,
        email: &str,
        actor: Option<i64>,
    ) -> CreateAuditLogInput {
        CreateAuditLogInput::new(ActionType::Insert, tables::ADMINS, admin_id)
            .with_actor(actor)
            .with_detail(json!({ "profileId": profile_id, "email": email }))
    }

    /// Audit entry for an admin partial update.
    pub fn admin_updated(
        admin_id: i64,
        profile_id: i64,
        fields: &ChangedFields,
        actor: Option<i64>,
    ) -> CreateAuditLogInput {
        CreateAuditLogInput::new(ActionType::Update, tables::ADMINS, admin_id)
            .with_actor(actor)
            .with_detail(json!({ "profileId": profile_id, "fields": fields.names() }))
    }

    /// Audit entry for an admin deletion.
    pub fn admin_deleted(admin_id: i64, profile_id: i64, actor: Option<i64>) -> CreateAuditLogInput {
        CreateAuditLogInput::new(ActionType::Delete, tables::ADMINS, admin_id)
            .with_actor(actor)
            .with_detail(json!({ "profileId": profile_id }))
    }

    /// Audit entry for a bare profile creation through the admin surface.
    pub fn profile_created(profile_id: i64, email: &str, actor: Option<i64>) -> CreateAuditLogInput {
        CreateAuditLogInput::new(ActionType::Insert, tables::PROFILES, profile_id)
            .with_actor(actor)
            .with_detail(json!({ "email": email }))
    }

    /// Audit entry for a profile partial update.
    pub fn profile_updated(
        profile_id: i64,
        fields: &ChangedFields,
        actor: Option<i64>,
    ) -> CreateAuditLogInput {
        CreateAuditLogInput::new(ActionType::Update, tables::PROFILES, profile_id)
            .with_actor(actor)
            .with_detail(json!({ "fields": fields.names() }))
    }

    /// Audit entry for a profile deletion.
    pub fn profile_deleted(profile_id: i64, actor: Option<i64>) -> CreateAuditLogInput {
        CreateAuditLogInput::new(ActionType::Delete, tables::PROFILES, profile_id).with_actor(actor)
    }

    /// Audit entry for a new tariff version.
    pub fn tariff_created(
        tariff_id: i64,
        effective_from: NaiveDate,
        rate_per_kwh: Decimal,
        is_active: bool,
        actor: Option<i64>,
    ) -> CreateAuditLogInput {
        CreateAuditLogInput::new(ActionType::Insert, tables::TARIFFS, tariff_id)
            .with_actor(actor)
            .with_detail(json!({
                "tariffId": tariff_id,
                "effectiveFrom": effective_from,
                "ratePerKwh": rate_per_kwh,
                "isActive": is_active,
            }))
    }

    /// Audit entry for a tariff partial update.
    pub fn tariff_updated(
        tariff_id: i64,
        fields: &ChangedFields,
        actor: Option<i64>,
    ) -> CreateAuditLogInput {
        CreateAuditLogInput::new(ActionType::Update, tables::TARIFFS, tariff_id)
            .with_actor(actor)
            .with_detail(json!({ "tariffId": tariff_id, "fields": fields.names() }))
    }

    /// Audit entry for a tariff deletion.
    pub fn tariff_deleted(tariff_id: i64, actor: Option<i64>) -> CreateAuditLogInput {
        CreateAuditLogInput::new(ActionType::Delete, tables::TARIFFS, tariff_id)
            .with_actor(actor)
            .with_detail(json!({ "tariffId": tariff_id }))
    }

    /// Audit entry for a bill creation.
    pub fn bill_created(bill_id: i64, actor: Option<i64>) -> CreateAuditLogInput {
        CreateAuditLogInput::new(ActionType::Insert, tables::ELECTRIC_BILLS, bill_id)
            .with_actor(actor)
            .with_detail(json!({ "billId": bill_id }))
    }

    /// Audit entry for a bill partial update.
    pub fn bill_updated(
        bill_id: i64,
        fields: &ChangedFields,
        actor: Option<i64>,
    ) -> CreateAuditLogInput {
        CreateAuditLogInput::new(ActionType::Update, tables::ELECTRIC_BILLS, bill_id)
            .with_actor(actor)
            .with_detail(json!({ "billId": bill_id, "fields": fields.names() }))
    }

    /// Audit entry for a bill deletion.
    pub fn bill_deleted(bill_id: i64, status: BillStatus, actor: Option<i64>) -> CreateAuditLogInput {
        CreateAuditLogInput::new(ActionType::Delete, tables::ELECTRIC_BILLS, bill_id)
            .with_actor(actor)
            .with_detail(json!({ "billId": bill_id, "status": status }))
    }

    /// Audit entry for submitted feedback. Content is never copied into the
    /// trail, only the fact that some was provided.
    pub fn feedback_submitted(
        feedback_id: i64,
        rating: Option<i32>,
        actor: Option<i64>,
    ) -> CreateAuditLogInput {
        CreateAuditLogInput::new(ActionType::Insert, tables::FEEDBACK, feedback_id)
            .with_actor(actor)
            .with_detail(json!({ "rating": rating, "hasContent": true }))
    }

    /// Audit entry for a feedback status transition.
    pub fn feedback_status_changed(
        feedback_id: i64,
        status: FeedbackStatus,
        actor: Option<i64>,
    ) -> CreateAuditLogInput {
        CreateAuditLogInput::new(ActionType::Update, tables::FEEDBACK, feedback_id)
            .with_actor(actor)
            .with_detail(json!({ "feedbackId": feedback_id, "status": status }))
    }

    /// Audit entry for a feedback deletion.
    pub fn feedback_deleted(feedback_id: i64, actor: Option<i64>) -> CreateAuditLogInput {
        CreateAuditLogInput::new(ActionType::Delete, tables::FEEDBACK, feedback_id)
            .with_actor(actor)
            .with_detail(json!({ "feedbackId": feedback_id }))
    }

    /// Audit entry for a staff reply on a feedback thread.
    pub fn reply_added(reply_id: i64, feedback_id: i64, actor: Option<i64>) -> CreateAuditLogInput {
        CreateAuditLogInput::new(ActionType::Insert, tables::FEEDBACK_REPLIES, reply_id)
            .with_actor(actor)
            .with_detail(json!({ "feedbackId": feedback_id, "replyId": reply_id }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::audit_log::AuditDetail;

    fn detail_json(input: CreateAuditLogInput) -> serde_json::Value {
        match input.action_detail {
            Some(AuditDetail::Structured(v)) => v,
            other => panic!("expected structured detail, got {:?}", other),
        }
    }

    #[test]
    fn changed_fields_tracks_only_present_inputs() {
        let mut fields = ChangedFields::new();
        fields
            .track("contact", true)
            .track("address", false)
            .track("status", true);

        assert_eq!(fields.names(), &["contact", "status"]);
        assert!(!fields.is_empty());
    }

    #[test]
    fn changed_fields_starts_empty() {
        assert!(ChangedFields::new().is_empty());
    }

    #[test]
    fn customer_created_carries_profile_and_email() {
        let input = audit_events::customer_created(7, 42, "amy@example.com", Some(1));

        assert_eq!(input.target_table, tables::CUSTOMERS);
        assert_eq!(input.target_record_id, "7");
        assert_eq!(input.action_type, ActionType::Insert);
        assert_eq!(input.profile_id, Some(1));
        assert_eq!(
            detail_json(input),
            serde_json::json!({ "profileId": 42, "email": "amy@example.com" })
        );
    }

    #[test]
    fn customer_deleted_records_cascade_message() {
        let input = audit_events::customer_deleted(7, 42, Some(1));

        let detail = detail_json(input);
        assert_eq!(detail["message"], "Cascading delete success");
        assert_eq!(detail["profileId"], 42);
    }

    #[test]
    fn update_events_list_changed_field_names() {
        let mut fields = ChangedFields::new();
        fields.track("ratePerKwh", true).track("isActive", true);

        let input = audit_events::tariff_updated(3, &fields, Some(9));

        let detail = detail_json(input);
        assert_eq!(
            detail["fields"],
            serde_json::json!(["ratePerKwh", "isActive"])
        );
        assert_eq!(detail["tariffId"], 3);
    }

    #[test]
    fn feedback_submitted_omits_content_body() {
        let input = audit_events::feedback_submitted(11, Some(4), Some(5));

        let detail = detail_json(input);
        assert_eq!(detail["rating"], 4);
        assert_eq!(detail["hasContent"], true);
        assert!(detail.get("content").is_none());
    }

    #[test]
    fn feedback_status_change_serializes_exact_status_string() {
        let input =
            audit_events::feedback_status_changed(11, FeedbackStatus::InProgress, Some(5));

        assert_eq!(detail_json(input)["status"], "InProgress");
    }

    #[test]
    fn registration_event_has_no_actor() {
        let input = audit_events::customer_created(8, 50, "new@example.com", None);
        assert_eq!(input.profile_id, None);
    }
}
