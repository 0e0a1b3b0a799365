//! Staff account routes.
//!
//! Admin-managed; a staff member may view and partially update their
//! own record.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use validator::Validate;

use domain::models::StaffAccount;
use domain::services::{audit_events, first_rejected_field, policy_fields, ChangedFields, EditTarget};
use persistence::repositories::{
    AuditLogRepository, NewStaffAccount, ProfileRepository, StaffAccountChanges, StaffRepository,
};
use shared::password::hash_password;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Actor;

/// Create staff router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_staff).post(create_staff))
        .route(
            "/:profile_id",
            get(get_staff).put(update_staff).delete(delete_staff),
        )
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateStaffRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom(function = "shared::validation::validate_password"))]
    pub password: String,

    pub contact: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStaffRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    pub contact: Option<String>,
    pub address: Option<String>,
}

/// List all staff accounts.
///
/// GET /api/staffs (admin only)
#[axum::debug_handler]
pub async fn list_staff(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<Vec<StaffAccount>>, ApiError> {
    if !actor.0.is_admin() {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    let repo = StaffRepository::new(state.pool.clone());
    let staff = repo.list().await?;
    Ok(Json(staff))
}

/// Get a staff account by profile id.
///
/// GET /api/staffs/:profile_id (admin or the account owner)
#[axum::debug_handler]
pub async fn get_staff(
    State(state): State<AppState>,
    actor: Actor,
    Path(profile_id): Path<i64>,
) -> Result<Json<StaffAccount>, ApiError> {
    if !actor.0.is_admin() && !actor.0.is_self(profile_id) {
        return Err(ApiError::Forbidden(
            "Insufficient permissions for this resource".to_string(),
        ));
    }

    let repo = StaffRepository::new(state.pool.clone());
    let account = repo
        .find_by_profile_id(profile_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Staff not found".to_string()))?;
    Ok(Json(account))
}

/// Create a staff account with its backing profile.
///
/// POST /api/staffs (admin only)
#[axum::debug_handler]
pub async fn create_staff(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<CreateStaffRequest>,
) -> Result<(StatusCode, Json<StaffAccount>), ApiError> {
    if !actor.0.is_admin() {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }
    request.validate()?;

    let profiles = ProfileRepository::new(state.pool.clone());
    if profiles.email_taken(&request.email, None).await? {
        return Err(ApiError::Conflict("Email already exists".to_string()));
    }

    let password_hash = hash_password(&request.password)
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?;

    let repo = StaffRepository::new(state.pool.clone());
    let account = repo
        .create_with_profile(
            &actor.0,
            &NewStaffAccount {
                name: request.name,
                email: request.email,
                password_hash,
                contact: request.contact,
                address: request.address,
            },
            actor.0.profile_id,
        )
        .await?;

    AuditLogRepository::new(state.pool.clone()).insert_async(audit_events::staff_created(
        account.staff_id,
        account.profile_id,
        &account.email,
        actor.0.profile_id,
    ));

    tracing::info!(
        staff_id = account.staff_id,
        profile_id = account.profile_id,
        "Staff created"
    );

    Ok((StatusCode::CREATED, Json(account)))
}

/// Update a staff account. Staff may only touch their contact details;
/// name and email edits are admin-only.
///
/// PUT /api/staffs/:profile_id (admin or the account owner)
#[axum::debug_handler]
pub async fn update_staff(
    State(state): State<AppState>,
    actor: Actor,
    Path(profile_id): Path<i64>,
    Json(request): Json<UpdateStaffRequest>,
) -> Result<Json<StaffAccount>, ApiError> {
    if !actor.0.is_admin() && !actor.0.is_self(profile_id) {
        return Err(ApiError::Forbidden(
            "Insufficient permissions for this resource".to_string(),
        ));
    }
    request.validate()?;

    let mut requested: Vec<&'static str> = Vec::new();
    if request.name.is_some() {
        requested.push(policy_fields::NAME);
    }
    if request.email.is_some() {
        requested.push(policy_fields::EMAIL);
    }
    if request.contact.is_some() {
        requested.push(policy_fields::CONTACT);
    }
    if request.address.is_some() {
        requested.push(policy_fields::ADDRESS);
    }

    if let Some(field) = first_rejected_field(EditTarget::StaffAccount, actor.0.role, &requested) {
        return Err(ApiError::Forbidden(format!(
            "Field '{}' is not editable",
            field
        )));
    }

    if let Some(email) = &request.email {
        let profiles = ProfileRepository::new(state.pool.clone());
        if profiles.email_taken(email, Some(profile_id)).await? {
            return Err(ApiError::Conflict("Email already exists".to_string()));
        }
    }

    let mut fields = ChangedFields::new();
    for name in requested.iter().copied() {
        fields.track(name, true);
    }

    let changes = StaffAccountChanges {
        name: request.name,
        email: request.email,
        contact: request.contact,
        address: request.address,
    };

    let repo = StaffRepository::new(state.pool.clone());
    let account = repo
        .update_with_profile(&actor.0, profile_id, &changes, actor.0.profile_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Staff not found".to_string()))?;

    if !fields.is_empty() {
        AuditLogRepository::new(state.pool.clone()).insert_async(audit_events::staff_updated(
            account.staff_id,
            profile_id,
            &fields,
            actor.0.profile_id,
        ));
    }

    tracing::info!(staff_id = account.staff_id, profile_id, "Staff updated");

    Ok(Json(account))
}

/// Delete a staff account and its backing profile. Staff who have
/// authored feedback replies are protected by foreign keys and report
/// a dependency conflict.
///
/// DELETE /api/staffs/:profile_id (admin only)
#[axum::debug_handler]
pub async fn delete_staff(
    State(state): State<AppState>,
    actor: Actor,
    Path(profile_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !actor.0.is_admin() {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    let repo = StaffRepository::new(state.pool.clone());
    let staff_id = repo
        .delete_with_profile(&actor.0, profile_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Staff not found".to_string()))?;

    AuditLogRepository::new(state.pool.clone()).insert_async(audit_events::staff_deleted(
        staff_id,
        profile_id,
        actor.0.profile_id,
    ));

    tracing::info!(staff_id, profile_id, "Staff deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_parses_without_contact() {
        let json = r#"{
            "name": "le.chi",
            "email": "chi@example.com",
            "password": "changeme123"
        }"#;

        let request: CreateStaffRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_ok());
        assert!(request.contact.is_none());
        assert!(request.address.is_none());
    }

    #[test]
    fn update_request_rejects_invalid_email() {
        let json = r#"{"email": "nope"}"#;
        let request: UpdateStaffRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_err());
    }
}
