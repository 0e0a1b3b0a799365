//! Actor context extractor.
//!
//! Provides an Axum extractor that hands route handlers the authenticated
//! caller's identity.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::str::FromStr;

use domain::models::{ActorContext, Role};
use shared::jwt::{extract_profile_id, JwtConfig};

use crate::app::AppState;
use crate::error::ApiError;

/// Authenticated actor for the current request.
///
/// The context is normally placed in request extensions by the `require_auth`
/// middleware. When the extractor runs on a route without that middleware it
/// validates the Bearer token itself.
#[derive(Debug, Clone, Copy)]
pub struct Actor(pub ActorContext);

#[async_trait]
impl FromRequestParts<AppState> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // First, check if the context was already inserted by middleware
        if let Some(actor) = parts.extensions.get::<ActorContext>() {
            return Ok(Actor(*actor));
        }

        // Otherwise, extract and validate the token directly
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError::Unauthorized("Invalid Authorization header format".to_string())
        })?;

        let jwt = JwtConfig::with_leeway(
            &state.config.jwt.secret,
            state.config.jwt.token_expiry_secs,
            state.config.jwt.leeway_secs,
        );

        let claims = jwt
            .validate_token(token)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

        let profile_id = extract_profile_id(&claims)
            .map_err(|_| ApiError::Unauthorized("Invalid token subject".to_string()))?;

        let role = Role::from_str(&claims.role)
            .map_err(|_| ApiError::Unauthorized("Invalid role in token".to_string()))?;

        Ok(Actor(ActorContext::new(
            role,
            Some(profile_id),
            claims.customer_id,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_is_copyable() {
        let actor = Actor(ActorContext::new(Role::Staff, Some(4), None));
        let copy = actor;
        assert_eq!(copy.0.role, Role::Staff);
        assert_eq!(actor.0.profile_id, Some(4));
    }
}
