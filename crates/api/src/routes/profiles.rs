//! Profile administration routes.
//!
//! Staff can browse profiles; create, update and delete are admin-only.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use validator::Validate;

use domain::models::{Profile, Role};
use domain::services::{audit_events, policy_fields, ChangedFields};
use persistence::repositories::{
    AdminRepository, AuditLogRepository, CustomerRepository, ProfileChanges, ProfileRepository,
    StaffRepository,
};
use shared::password::hash_password;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Actor;

/// Create profiles router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_profiles).post(create_profile))
        .route(
            "/:profile_id",
            get(get_profile).put(update_profile).delete(delete_profile),
        )
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom(function = "shared::validation::validate_password"))]
    pub password: String,

    pub profile_type: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(custom(function = "shared::validation::validate_password"))]
    pub password: Option<String>,

    pub profile_type: Option<String>,
}

/// List all profiles.
///
/// GET /api/profiles
#[axum::debug_handler]
pub async fn list_profiles(State(state): State<AppState>) -> Result<Json<Vec<Profile>>, ApiError> {
    let repo = ProfileRepository::new(state.pool.clone());
    let profiles = repo.list().await?;
    Ok(Json(profiles))
}

/// Get a single profile by id.
///
/// GET /api/profiles/:profile_id
#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(profile_id): Path<i64>,
) -> Result<Json<Profile>, ApiError> {
    let repo = ProfileRepository::new(state.pool.clone());
    let profile = repo
        .find_by_id(profile_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;
    Ok(Json(profile))
}

/// Create a bare profile with an explicit role.
///
/// POST /api/profiles (admin only)
#[axum::debug_handler]
pub async fn create_profile(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<CreateProfileRequest>,
) -> Result<(StatusCode, Json<Profile>), ApiError> {
    if !actor.0.is_admin() {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }
    request.validate()?;

    let profile_type: Role = request
        .profile_type
        .parse()
        .map_err(|_| ApiError::Validation("Invalid profile type".to_string()))?;

    let repo = ProfileRepository::new(state.pool.clone());

    if repo.email_taken(&request.email, None).await? {
        return Err(ApiError::Conflict("Email already exists".to_string()));
    }

    let password_hash = hash_password(&request.password)
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?;

    let profile = repo
        .create(
            &request.name,
            &request.email,
            &password_hash,
            profile_type,
            actor.0.profile_id,
        )
        .await?;

    AuditLogRepository::new(state.pool.clone()).insert_async(audit_events::profile_created(
        profile.profile_id,
        &profile.email,
        actor.0.profile_id,
    ));

    tracing::info!(
        profile_id = profile.profile_id,
        profile_type = %profile.profile_type,
        "Profile created"
    );

    Ok((StatusCode::CREATED, Json(profile)))
}

/// Update a profile. Password is re-hashed only when supplied.
///
/// PUT /api/profiles/:profile_id (admin only)
#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<AppState>,
    actor: Actor,
    Path(profile_id): Path<i64>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    if !actor.0.is_admin() {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }
    request.validate()?;

    let profile_type = match &request.profile_type {
        Some(raw) => Some(
            raw.parse::<Role>()
                .map_err(|_| ApiError::Validation("Invalid profile type".to_string()))?,
        ),
        None => None,
    };

    let repo = ProfileRepository::new(state.pool.clone());

    if let Some(email) = &request.email {
        if repo.email_taken(email, Some(profile_id)).await? {
            return Err(ApiError::Conflict("Email already exists".to_string()));
        }
    }

    let password_hash = match &request.password {
        Some(password) => Some(
            hash_password(password)
                .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?,
        ),
        None => None,
    };

    let mut fields = ChangedFields::new();
    fields.track(policy_fields::NAME, request.name.is_some());
    fields.track(policy_fields::EMAIL, request.email.is_some());
    fields.track(policy_fields::PASSWORD, request.password.is_some());
    fields.track(policy_fields::PROFILE_TYPE, profile_type.is_some());

    let changes = ProfileChanges {
        name: request.name,
        email: request.email,
        password_hash,
        profile_type,
    };

    let profile = repo
        .update(profile_id, &changes, actor.0.profile_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    if !fields.is_empty() {
        AuditLogRepository::new(state.pool.clone()).insert_async(audit_events::profile_updated(
            profile_id,
            &fields,
            actor.0.profile_id,
        ));
    }

    tracing::info!(profile_id, "Profile updated");

    Ok(Json(profile))
}

/// Delete a profile together with its role row. Customer profiles take
/// their bills, feedback and replies with them; staff profiles with
/// authored replies report a dependency conflict instead.
///
/// DELETE /api/profiles/:profile_id (admin only)
#[axum::debug_handler]
pub async fn delete_profile(
    State(state): State<AppState>,
    actor: Actor,
    Path(profile_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !actor.0.is_admin() {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }
    if actor.0.is_self(profile_id) {
        return Err(ApiError::Validation(
            "You cannot delete your own profile".to_string(),
        ));
    }

    let repo = ProfileRepository::new(state.pool.clone());
    let profile = repo
        .find_by_id(profile_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    let role_row_deleted = match profile.profile_type {
        Role::Customer => CustomerRepository::new(state.pool.clone())
            .delete_cascade(&actor.0, profile_id)
            .await?
            .is_some(),
        Role::Staff => StaffRepository::new(state.pool.clone())
            .delete_with_profile(&actor.0, profile_id)
            .await?
            .is_some(),
        Role::Admin => AdminRepository::new(state.pool.clone())
            .delete_with_profile(&actor.0, profile_id)
            .await?
            .is_some(),
    };

    // Profiles created on this surface have no role row yet.
    if !role_row_deleted {
        repo.delete_bare(profile_id).await?;
    }

    AuditLogRepository::new(state.pool.clone())
        .insert_async(audit_events::profile_deleted(profile_id, actor.0.profile_id));

    tracing::info!(profile_id, profile_type = %profile.profile_type, "Profile deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_parses_camel_case() {
        let json = r#"{
            "name": "ops.staff",
            "email": "ops@example.com",
            "password": "changeme123",
            "profileType": "Staff"
        }"#;

        let request: CreateProfileRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.profile_type, "Staff");
    }

    #[test]
    fn update_request_allows_partial_payload() {
        let json = r#"{"email": "new@example.com"}"#;
        let request: UpdateProfileRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_ok());
        assert!(request.name.is_none());
        assert!(request.password.is_none());
    }

    #[test]
    fn update_request_still_validates_present_fields() {
        let json = r#"{"password": "short"}"#;
        let request: UpdateProfileRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn invalid_profile_type_fails_role_parse() {
        assert!("Superuser".parse::<Role>().is_err());
        assert!("Admin".parse::<Role>().is_ok());
    }
}
