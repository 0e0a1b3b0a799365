//! Authentication routes for customer registration and login.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use domain::models::{CustomerAccount, Role};

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::auth::{AuthError, AuthService, RegisterInput};

/// Create auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Request body for customer self-registration.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom(function = "shared::validation::validate_password"))]
    pub password: String,

    pub contact: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

/// Request body for login. The identifier is an email or a profile name.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Identifier is required"))]
    pub identifier: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Profile summary in the login response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub profile_id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i64>,
}

/// Response body for successful login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub profile: ProfileSummary,
}

fn map_auth_error(e: AuthError) -> ApiError {
    match e {
        AuthError::EmailAlreadyExists => ApiError::Conflict("Email already exists".to_string()),
        AuthError::NameAlreadyExists => {
            ApiError::Conflict("Profile name already exists".to_string())
        }
        AuthError::InvalidCredentials => ApiError::Unauthorized("Invalid credentials".to_string()),
        AuthError::DatabaseError(db_err) => ApiError::from(db_err),
        AuthError::PasswordError(e) => ApiError::Internal(format!("Password error: {}", e)),
        AuthError::TokenError(e) => ApiError::Internal(format!("Token error: {}", e)),
    }
}

/// Register a new customer account.
///
/// POST /api/auth/register
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<CustomerAccount>), ApiError> {
    request.validate()?;

    let auth_service = AuthService::new(state.pool.clone(), &state.config.jwt);

    let account = auth_service
        .register(RegisterInput {
            name: request.name,
            email: request.email,
            password: request.password,
            contact: request.contact,
            address: request.address,
            date_of_birth: request.date_of_birth,
        })
        .await
        .map_err(map_auth_error)?;

    tracing::info!(
        customer_id = account.customer_id,
        profile_id = account.profile_id,
        "Customer registered"
    );

    Ok((StatusCode::CREATED, Json(account)))
}

/// Login with email or profile name.
///
/// POST /api/auth/login
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    request.validate()?;

    let auth_service = AuthService::new(state.pool.clone(), &state.config.jwt);

    let result = auth_service
        .login(&request.identifier, &request.password)
        .await
        .map_err(map_auth_error)?;

    Ok(Json(LoginResponse {
        token: result.token,
        token_type: "Bearer".to_string(),
        expires_in: result.expires_in,
        profile: ProfileSummary {
            profile_id: result.profile_id,
            name: result.name,
            email: result.email,
            role: result.role,
            customer_id: result.customer_id,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_accepts_minimal_payload() {
        let json = r#"{
            "name": "nguyen.an",
            "email": "an@example.com",
            "password": "changeme123"
        }"#;

        let request: RegisterRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_ok());
        assert!(request.contact.is_none());
        assert!(request.date_of_birth.is_none());
    }

    #[test]
    fn register_request_rejects_short_password() {
        let json = r#"{
            "name": "nguyen.an",
            "email": "an@example.com",
            "password": "short"
        }"#;

        let request: RegisterRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn register_request_rejects_bad_email() {
        let json = r#"{
            "name": "nguyen.an",
            "email": "not-an-email",
            "password": "changeme123"
        }"#;

        let request: RegisterRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn register_request_parses_date_of_birth() {
        let json = r#"{
            "name": "nguyen.an",
            "email": "an@example.com",
            "password": "changeme123",
            "dateOfBirth": "1990-05-20"
        }"#;

        let request: RegisterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(
            request.date_of_birth,
            NaiveDate::from_ymd_opt(1990, 5, 20)
        );
    }

    #[test]
    fn login_request_requires_identifier() {
        let json = r#"{"identifier": "", "password": "changeme123"}"#;
        let request: LoginRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn login_response_serializes_camel_case() {
        let response = LoginResponse {
            token: "jwt".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 86400,
            profile: ProfileSummary {
                profile_id: 5,
                name: "mai".to_string(),
                email: "mai@example.com".to_string(),
                role: Role::Customer,
                customer_id: Some(2),
            },
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"tokenType\":\"Bearer\""));
        assert!(json.contains("\"expiresIn\":86400"));
        assert!(json.contains("\"customerId\":2"));
    }

    #[test]
    fn staff_profile_summary_omits_customer_id() {
        let summary = ProfileSummary {
            profile_id: 8,
            name: "staff".to_string(),
            email: "staff@example.com".to_string(),
            role: Role::Staff,
            customer_id: None,
        };

        let json = serde_json::to_string(&summary).unwrap();
        assert!(!json.contains("customerId"));
        assert!(json.contains("\"role\":\"Staff\""));
    }
}
