//! Admin account routes.
//!
//! The whole group is nested behind the admin role middleware, so
//! handlers here assume an admin caller.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use validator::Validate;

use domain::models::AdminAccount;
use domain::services::{audit_events, policy_fields, ChangedFields};
use persistence::repositories::{
    AdminAccountChanges, AdminRepository, AuditLogRepository, NewAdminAccount, ProfileRepository,
};
use shared::password::hash_password;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Actor;

/// Create admins router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_admins).post(create_admin))
        .route(
            "/:profile_id",
            get(get_admin).put(update_admin).delete(delete_admin),
        )
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdminRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom(function = "shared::validation::validate_password"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdminRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

/// List all admin accounts.
///
/// GET /api/admins
#[axum::debug_handler]
pub async fn list_admins(
    State(state): State<AppState>,
) -> Result<Json<Vec<AdminAccount>>, ApiError> {
    let repo = AdminRepository::new(state.pool.clone());
    let admins = repo.list().await?;
    Ok(Json(admins))
}

/// Get an admin account by profile id.
///
/// GET /api/admins/:profile_id
#[axum::debug_handler]
pub async fn get_admin(
    State(state): State<AppState>,
    Path(profile_id): Path<i64>,
) -> Result<Json<AdminAccount>, ApiError> {
    let repo = AdminRepository::new(state.pool.clone());
    let account = repo
        .find_by_profile_id(profile_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Admin not found".to_string()))?;
    Ok(Json(account))
}

/// Create an admin account with its backing profile.
///
/// POST /api/admins
#[axum::debug_handler]
pub async fn create_admin(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<CreateAdminRequest>,
) -> Result<(StatusCode, Json<AdminAccount>), ApiError> {
    request.validate()?;

    let profiles = ProfileRepository::new(state.pool.clone());
    if profiles.email_taken(&request.email, None).await? {
        return Err(ApiError::Conflict("Email already exists".to_string()));
    }

    let password_hash = hash_password(&request.password)
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?;

    let repo = AdminRepository::new(state.pool.clone());
    let account = repo
        .create_with_profile(
            &actor.0,
            &NewAdminAccount {
                name: request.name,
                email: request.email,
                password_hash,
            },
            actor.0.profile_id,
        )
        .await?;

    AuditLogRepository::new(state.pool.clone()).insert_async(audit_events::admin_created(
        account.admin_id,
        account.profile_id,
        &account.email,
        actor.0.profile_id,
    ));

    tracing::info!(
        admin_id = account.admin_id,
        profile_id = account.profile_id,
        "Admin created"
    );

    Ok((StatusCode::CREATED, Json(account)))
}

/// Update an admin account.
///
/// PUT /api/admins/:profile_id
#[axum::debug_handler]
pub async fn update_admin(
    State(state): State<AppState>,
    actor: Actor,
    Path(profile_id): Path<i64>,
    Json(request): Json<UpdateAdminRequest>,
) -> Result<Json<AdminAccount>, ApiError> {
    request.validate()?;

    if let Some(email) = &request.email {
        let profiles = ProfileRepository::new(state.pool.clone());
        if profiles.email_taken(email, Some(profile_id)).await? {
            return Err(ApiError::Conflict("Email already exists".to_string()));
        }
    }

    let mut fields = ChangedFields::new();
    fields.track(policy_fields::NAME, request.name.is_some());
    fields.track(policy_fields::EMAIL, request.email.is_some());

    let changes = AdminAccountChanges {
        name: request.name,
        email: request.email,
    };

    let repo = AdminRepository::new(state.pool.clone());
    let account = repo
        .update_with_profile(&actor.0, profile_id, &changes, actor.0.profile_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Admin not found".to_string()))?;

    if !fields.is_empty() {
        AuditLogRepository::new(state.pool.clone()).insert_async(audit_events::admin_updated(
            account.admin_id,
            profile_id,
            &fields,
            actor.0.profile_id,
        ));
    }

    tracing::info!(admin_id = account.admin_id, profile_id, "Admin updated");

    Ok(Json(account))
}

/// Delete an admin account and its backing profile. Admins cannot
/// delete themselves.
///
/// DELETE /api/admins/:profile_id
#[axum::debug_handler]
pub async fn delete_admin(
    State(state): State<AppState>,
    actor: Actor,
    Path(profile_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if actor.0.is_self(profile_id) {
        return Err(ApiError::Validation(
            "You cannot delete your own profile".to_string(),
        ));
    }

    let repo = AdminRepository::new(state.pool.clone());
    let admin_id = repo
        .delete_with_profile(&actor.0, profile_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Admin not found".to_string()))?;

    AuditLogRepository::new(state.pool.clone()).insert_async(audit_events::admin_deleted(
        admin_id,
        profile_id,
        actor.0.profile_id,
    ));

    tracing::info!(admin_id, profile_id, "Admin deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_requires_all_fields() {
        let json = r#"{"name": "root", "email": "root@example.com"}"#;
        assert!(serde_json::from_str::<CreateAdminRequest>(json).is_err());
    }

    #[test]
    fn update_request_accepts_name_only() {
        let json = r#"{"name": "root2"}"#;
        let request: UpdateAdminRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_ok());
        assert!(request.email.is_none());
    }
}
