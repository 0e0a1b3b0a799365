//! Common validation utilities.
//!
//! Custom validators plugged into `validator` derive on request payloads.
//! Business rules that need more context (role gates, tariff lookups) live in
//! the route handlers; these cover the per-field checks.

use validator::ValidationError;

/// Minimum account password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Validates that a password meets the minimum length requirement.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() >= MIN_PASSWORD_LENGTH {
        Ok(())
    } else {
        let mut err = ValidationError::new("password_length");
        err.message = Some("Password must be at least 8 characters".into());
        Err(err)
    }
}

/// Validates that a feedback rating is within 1 to 5.
pub fn validate_rating(rating: i32) -> Result<(), ValidationError> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        let mut err = ValidationError::new("rating_range");
        err.message = Some("Rating must be between 1 and 5".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_length_boundary() {
        assert!(validate_password("12345678").is_ok());
        assert!(validate_password("1234567").is_err());
        assert!(validate_password("").is_err());
    }

    #[test]
    fn password_counts_chars_not_bytes() {
        // 8 multibyte characters should pass
        assert!(validate_password("ställweg⚡").is_ok());
    }

    #[test]
    fn password_error_message() {
        let err = validate_password("short").unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Password must be at least 8 characters"
        );
    }

    #[test]
    fn rating_range() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
        assert!(validate_rating(-3).is_err());
    }
}
