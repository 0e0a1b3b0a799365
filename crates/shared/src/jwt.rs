//! JWT token utilities using HS256 algorithm.
//!
//! Tokens carry the authenticated profile's identity and role so the API layer
//! can rebuild the actor context on every request without a database lookup.
//! The signing secret is loaded once at startup and is read-only afterwards.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error type for JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingError(String),

    #[error("Failed to decode token: {0}")]
    DecodingError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,
}

/// JWT token claims.
///
/// `sub` is the profile id rendered as a string; `customer_id` is present only
/// for customer accounts and lets services skip the profile-to-customer lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (profile ID)
    pub sub: String,
    /// Actor role name (Customer, Staff, Admin)
    pub role: String,
    /// Customer ID, set only for customer-role tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i64>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// JWT ID (unique per issued token, used in request logs)
    pub jti: String,
}

/// Default leeway in seconds for clock skew tolerance
pub const DEFAULT_LEEWAY_SECS: u64 = 30;

/// Configuration for JWT token generation and validation.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    /// Token expiration in seconds (default: 86400 = 24 hours)
    pub token_expiry_secs: i64,
    /// Leeway in seconds for clock skew tolerance (default: 30)
    pub leeway_secs: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("token_expiry_secs", &self.token_expiry_secs)
            .field("leeway_secs", &self.leeway_secs)
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

impl JwtConfig {
    /// Creates a new JwtConfig from a shared secret.
    pub fn new(secret: &str, token_expiry_secs: i64) -> Self {
        Self::with_leeway(secret, token_expiry_secs, DEFAULT_LEEWAY_SECS)
    }

    /// Creates a new JwtConfig from a shared secret with custom leeway.
    pub fn with_leeway(secret: &str, token_expiry_secs: i64, leeway_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_expiry_secs,
            leeway_secs,
        }
    }

    /// Generates a signed token for the given profile.
    ///
    /// Returns the encoded token together with its `jti`.
    pub fn generate_token(
        &self,
        profile_id: i64,
        role: &str,
        customer_id: Option<i64>,
    ) -> Result<(String, String), JwtError> {
        let now = Utc::now();
        let jti = Uuid::new_v4().to_string();
        let exp = (now + Duration::seconds(self.token_expiry_secs)).timestamp();

        let claims = Claims {
            sub: profile_id.to_string(),
            role: role.to_string(),
            customer_id,
            exp,
            iat: now.timestamp(),
            jti: jti.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))?;

        Ok((token, jti))
    }

    /// Validates a token and returns its claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidToken,
                _ => JwtError::DecodingError(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }
}

/// Extracts the profile ID from validated claims.
pub fn extract_profile_id(claims: &Claims) -> Result<i64, JwtError> {
    claims.sub.parse::<i64>().map_err(|_| JwtError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig::with_leeway("jwt_test_secret_0123456789", 86400, 0)
    }

    #[test]
    fn generate_and_validate_round_trip() {
        let config = test_config();

        let (token, jti) = config.generate_token(42, "Customer", Some(7)).unwrap();
        let claims = config.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role, "Customer");
        assert_eq!(claims.customer_id, Some(7));
        assert_eq!(claims.jti, jti);
    }

    #[test]
    fn staff_token_has_no_customer_id() {
        let config = test_config();

        let (token, _) = config.generate_token(9, "Staff", None).unwrap();
        let claims = config.validate_token(&token).unwrap();

        assert_eq!(claims.role, "Staff");
        assert_eq!(claims.customer_id, None);
    }

    #[test]
    fn expired_token_rejected() {
        let mut config = test_config();
        config.token_expiry_secs = -10;

        let (token, _) = config.generate_token(1, "Admin", None).unwrap();
        let result = config.validate_token(&token);

        assert!(matches!(result, Err(JwtError::TokenExpired)));
    }

    #[test]
    fn tampered_token_rejected() {
        let config = test_config();
        let other = JwtConfig::with_leeway("a_different_secret_entirely", 86400, 0);

        let (token, _) = other.generate_token(1, "Admin", None).unwrap();
        let result = config.validate_token(&token);

        assert!(matches!(result, Err(JwtError::InvalidToken)));
    }

    #[test]
    fn malformed_token_rejected() {
        let config = test_config();
        assert!(config.validate_token("not_a_jwt").is_err());
    }

    #[test]
    fn extract_profile_id_parses_subject() {
        let config = test_config();

        let (token, _) = config.generate_token(1234, "Staff", None).unwrap();
        let claims = config.validate_token(&token).unwrap();

        assert_eq!(extract_profile_id(&claims).unwrap(), 1234);
    }

    #[test]
    fn extract_profile_id_rejects_non_numeric_subject() {
        let claims = Claims {
            sub: "not-a-number".to_string(),
            role: "Admin".to_string(),
            customer_id: None,
            exp: 0,
            iat: 0,
            jti: "x".to_string(),
        };
        assert!(matches!(
            extract_profile_id(&claims),
            Err(JwtError::InvalidToken)
        ));
    }

    #[test]
    fn jti_unique_per_token() {
        let config = test_config();

        let (_, jti1) = config.generate_token(5, "Customer", Some(2)).unwrap();
        let (_, jti2) = config.generate_token(5, "Customer", Some(2)).unwrap();

        assert_ne!(jti1, jti2);
    }

    #[test]
    fn claims_timestamps_span_expiry() {
        let config = test_config();

        let before = Utc::now().timestamp();
        let (token, _) = config.generate_token(3, "Admin", None).unwrap();
        let after = Utc::now().timestamp();

        let claims = config.validate_token(&token).unwrap();

        assert!(claims.iat >= before && claims.iat <= after);
        assert_eq!(claims.exp - claims.iat, config.token_expiry_secs);
    }
}
