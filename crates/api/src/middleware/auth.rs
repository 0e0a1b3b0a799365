//! Authentication middleware.
//!
//! Provides middleware for requiring JWT bearer authentication on routes.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::str::FromStr;

use domain::models::{ActorContext, Role};
use shared::jwt::{extract_profile_id, JwtConfig};

use crate::app::AppState;

/// Middleware that requires JWT bearer authentication.
///
/// Validates the `Authorization: Bearer <token>` header and rejects requests
/// without a valid token. The authenticated actor context is stored in
/// request extensions for use by downstream handlers.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // Extract bearer token from Authorization header
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let token = match token {
        Some(token) => token.to_string(),
        None => {
            return unauthorized_response("Invalid or missing bearer token");
        }
    };

    let jwt = JwtConfig::with_leeway(
        &state.config.jwt.secret,
        state.config.jwt.token_expiry_secs,
        state.config.jwt.leeway_secs,
    );

    let claims = match jwt.validate_token(&token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!("Token validation failed: {}", e);
            return unauthorized_response("Invalid or expired token");
        }
    };

    let profile_id = match extract_profile_id(&claims) {
        Ok(id) => id,
        Err(_) => {
            return unauthorized_response("Invalid token subject");
        }
    };

    let role = match Role::from_str(&claims.role) {
        Ok(role) => role,
        Err(_) => {
            return unauthorized_response("Invalid role in token");
        }
    };

    // Store the actor context in request extensions
    let actor = ActorContext::new(role, Some(profile_id), claims.customer_id);
    req.extensions_mut().insert(actor);

    next.run(req).await
}

/// Helper to create unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_response() {
        let response = unauthorized_response("Test message");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_unauthorized_response_missing_token_message() {
        let response = unauthorized_response("Invalid or missing bearer token");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
