//! Customer account routes.
//!
//! Customers manage their own record through `/me`; staff and admins
//! operate on any record. Which fields an update may touch depends on
//! the caller's role.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use domain::models::{ActorContext, CustomerAccount, CustomerStatus};
use domain::services::{audit_events, first_rejected_field, policy_fields, ChangedFields, EditTarget};
use persistence::repositories::{
    AuditLogRepository, CustomerAccountChanges, CustomerRepository, NewCustomerAccount,
    ProfileRepository,
};
use shared::password::hash_password;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Actor;

/// Create customers router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route("/me", get(get_own_account).put(update_own_account))
        .route(
            "/:profile_id",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom(function = "shared::validation::validate_password"))]
    pub password: String,

    pub contact: Option<String>,
    pub address: Option<String>,
    pub status: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    pub contact: Option<String>,
    pub address: Option<String>,
    pub status: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

/// List all customer accounts.
///
/// GET /api/customers (staff, admin)
#[axum::debug_handler]
pub async fn list_customers(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<Vec<CustomerAccount>>, ApiError> {
    if !actor.0.role.is_operator() {
        return Err(ApiError::Forbidden(
            "Insufficient permissions for this resource".to_string(),
        ));
    }

    let repo = CustomerRepository::new(state.pool.clone());
    let customers = repo.list().await?;
    Ok(Json(customers))
}

/// Get the caller's own customer account.
///
/// GET /api/customers/me (customer)
#[axum::debug_handler]
pub async fn get_own_account(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<CustomerAccount>, ApiError> {
    if !actor.0.is_customer() {
        return Err(ApiError::Forbidden(
            "Insufficient permissions for this resource".to_string(),
        ));
    }
    let profile_id = actor
        .0
        .profile_id
        .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

    let repo = CustomerRepository::new(state.pool.clone());
    let account = repo
        .find_by_profile_id(profile_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Customer not found".to_string()))?;
    Ok(Json(account))
}

/// Update the caller's own customer account.
///
/// PUT /api/customers/me (customer)
#[axum::debug_handler]
pub async fn update_own_account(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<UpdateCustomerRequest>,
) -> Result<Json<CustomerAccount>, ApiError> {
    if !actor.0.is_customer() {
        return Err(ApiError::Forbidden(
            "Insufficient permissions for this resource".to_string(),
        ));
    }
    let profile_id = actor
        .0
        .profile_id
        .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

    let account = apply_update(&state, &actor.0, profile_id, request).await?;
    Ok(Json(account))
}

/// Get a customer account by profile id.
///
/// GET /api/customers/:profile_id (staff, admin, or the account owner)
#[axum::debug_handler]
pub async fn get_customer(
    State(state): State<AppState>,
    actor: Actor,
    Path(profile_id): Path<i64>,
) -> Result<Json<CustomerAccount>, ApiError> {
    if !actor.0.role.is_operator() && !actor.0.is_self(profile_id) {
        return Err(ApiError::Forbidden(
            "Insufficient permissions for this resource".to_string(),
        ));
    }

    let repo = CustomerRepository::new(state.pool.clone());
    let account = repo
        .find_by_profile_id(profile_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Customer not found".to_string()))?;
    Ok(Json(account))
}

/// Create a customer account with its backing profile.
///
/// POST /api/customers (admin only)
#[axum::debug_handler]
pub async fn create_customer(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerAccount>), ApiError> {
    if !actor.0.is_admin() {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }
    request.validate()?;

    let status = match &request.status {
        Some(raw) => Some(
            raw.parse::<CustomerStatus>()
                .map_err(|_| ApiError::Validation("Invalid customer status".to_string()))?,
        ),
        None => None,
    };

    let profiles = ProfileRepository::new(state.pool.clone());
    if profiles.email_taken(&request.email, None).await? {
        return Err(ApiError::Conflict("Email already exists".to_string()));
    }

    let password_hash = hash_password(&request.password)
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?;

    let repo = CustomerRepository::new(state.pool.clone());
    let account = repo
        .create_with_profile(
            &actor.0,
            &NewCustomerAccount {
                name: request.name,
                email: request.email,
                password_hash,
                contact: request.contact,
                address: request.address,
                status,
                date_of_birth: request.date_of_birth,
            },
            actor.0.profile_id,
        )
        .await?;

    AuditLogRepository::new(state.pool.clone()).insert_async(audit_events::customer_created(
        account.customer_id,
        account.profile_id,
        &account.email,
        actor.0.profile_id,
    ));

    tracing::info!(
        customer_id = account.customer_id,
        profile_id = account.profile_id,
        "Customer created"
    );

    Ok((StatusCode::CREATED, Json(account)))
}

/// Update a customer account by profile id.
///
/// PUT /api/customers/:profile_id (staff, admin, or the account owner)
#[axum::debug_handler]
pub async fn update_customer(
    State(state): State<AppState>,
    actor: Actor,
    Path(profile_id): Path<i64>,
    Json(request): Json<UpdateCustomerRequest>,
) -> Result<Json<CustomerAccount>, ApiError> {
    if !actor.0.role.is_operator() && !actor.0.is_self(profile_id) {
        return Err(ApiError::Forbidden(
            "Insufficient permissions for this resource".to_string(),
        ));
    }

    let account = apply_update(&state, &actor.0, profile_id, request).await?;
    Ok(Json(account))
}

/// Delete a customer account, its bills, feedback and backing profile.
///
/// DELETE /api/customers/:profile_id (admin only)
#[axum::debug_handler]
pub async fn delete_customer(
    State(state): State<AppState>,
    actor: Actor,
    Path(profile_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !actor.0.is_admin() {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    let repo = CustomerRepository::new(state.pool.clone());
    let deleted = repo
        .delete_cascade(&actor.0, profile_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Customer not found".to_string()))?;

    AuditLogRepository::new(state.pool.clone()).insert_async(audit_events::customer_deleted(
        deleted.customer_id,
        deleted.profile_id,
        actor.0.profile_id,
    ));

    tracing::info!(
        customer_id = deleted.customer_id,
        profile_id = deleted.profile_id,
        "Customer deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Shared update path for `/me` and `/:profile_id`. Field-level policy is
/// enforced against the caller's role before anything touches the database.
async fn apply_update(
    state: &AppState,
    actor: &ActorContext,
    profile_id: i64,
    request: UpdateCustomerRequest,
) -> Result<CustomerAccount, ApiError> {
    request.validate()?;

    let status = match &request.status {
        Some(raw) => Some(
            raw.parse::<CustomerStatus>()
                .map_err(|_| ApiError::Validation("Invalid customer status".to_string()))?,
        ),
        None => None,
    };

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
    if status.is_some() {
        requested.push(policy_fields::STATUS);
    }
    if request.date_of_birth.is_some() {
        requested.push(policy_fields::DATE_OF_BIRTH);
    }

    if let Some(field) = first_rejected_field(EditTarget::CustomerAccount, actor.role, &requested) {
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

    let changes = CustomerAccountChanges {
        name: request.name,
        email: request.email,
        contact: request.contact,
        address: request.address,
        status,
        date_of_birth: request.date_of_birth,
    };

    let repo = CustomerRepository::new(state.pool.clone());
    let account = repo
        .update_with_profile(actor, profile_id, &changes, actor.profile_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Customer not found".to_string()))?;

    if !fields.is_empty() {
        AuditLogRepository::new(state.pool.clone()).insert_async(audit_events::customer_updated(
            account.customer_id,
            profile_id,
            &fields,
            actor.profile_id,
        ));
    }

    tracing::info!(
        customer_id = account.customer_id,
        profile_id,
        "Customer updated"
    );

    Ok(account)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_parses_full_payload() {
        let json = r#"{
            "name": "tran.binh",
            "email": "binh@example.com",
            "password": "changeme123",
            "contact": "0901234567",
            "address": "12 Ly Thuong Kiet",
            "status": "Active",
            "dateOfBirth": "1985-11-02"
        }"#;

        let request: CreateCustomerRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.status.as_deref(), Some("Active"));
        assert_eq!(
            request.date_of_birth,
            NaiveDate::from_ymd_opt(1985, 11, 2)
        );
    }

    #[test]
    fn update_request_with_no_fields_is_valid() {
        let request: UpdateCustomerRequest = serde_json::from_str("{}").unwrap();
        assert!(request.validate().is_ok());
        assert!(request.name.is_none());
        assert!(request.status.is_none());
    }

    #[test]
    fn unknown_status_fails_to_parse() {
        assert!("Archived".parse::<CustomerStatus>().is_err());
        assert!("Suspended".parse::<CustomerStatus>().is_ok());
    }
}
