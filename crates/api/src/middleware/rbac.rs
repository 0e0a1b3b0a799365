//! Role-based access control middleware.
//!
//! Provides middleware for gating whole route groups on the actor's role.
//! Routes whose access rules mix roles (for example "operators, or the
//! customer the row belongs to") do their checks in the handler instead.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use domain::models::{ActorContext, Role};

/// Middleware that requires the actor to be an admin.
///
/// Requires `ActorContext` to be present in request extensions
/// (use after `require_auth`).
pub async fn require_admin(req: Request<Body>, next: Next) -> Response {
    require_role_impl(req, next, |actor| actor.role == Role::Admin).await
}

/// Middleware that requires the actor to be back-office staff or an admin.
///
/// Requires `ActorContext` to be present in request extensions
/// (use after `require_auth`).
pub async fn require_operator(req: Request<Body>, next: Next) -> Response {
    require_role_impl(req, next, |actor| actor.role.is_operator()).await
}

/// Internal implementation of role checking middleware.
async fn require_role_impl(
    req: Request<Body>,
    next: Next,
    allowed: fn(&ActorContext) -> bool,
) -> Response {
    // Get actor context from extensions (must be set by require_auth)
    let actor = match req.extensions().get::<ActorContext>() {
        Some(actor) => *actor,
        None => {
            tracing::warn!("Role middleware called without ActorContext in extensions");
            return unauthorized_response("Authentication required");
        }
    };

    if !allowed(&actor) {
        return forbidden_response("Insufficient permissions for this resource");
    }

    next.run(req).await
}

/// Helper to create forbidden response.
fn forbidden_response(message: &str) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "forbidden",
            "message": message
        })),
    )
        .into_response()
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

    fn actor(role: Role) -> ActorContext {
        ActorContext::new(role, Some(1), None)
    }

    #[test]
    fn admin_check_rejects_other_roles() {
        let admin_only = |a: &ActorContext| a.role == Role::Admin;
        assert!(admin_only(&actor(Role::Admin)));
        assert!(!admin_only(&actor(Role::Staff)));
        assert!(!admin_only(&actor(Role::Customer)));
    }

    #[test]
    fn operator_check_covers_staff_and_admin() {
        let operators = |a: &ActorContext| a.role.is_operator();
        assert!(operators(&actor(Role::Admin)));
        assert!(operators(&actor(Role::Staff)));
        assert!(!operators(&actor(Role::Customer)));
    }

    #[test]
    fn test_forbidden_response() {
        let response = forbidden_response("Test message");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_unauthorized_response() {
        let response = unauthorized_response("Test message");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
