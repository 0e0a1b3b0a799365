//! Profile entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::str::FromStr;

use domain::models::{Profile, Role};

/// Database row mapping for the profiles table, without credentials.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileEntity {
    pub profile_id: i64,
    pub name: String,
    pub email: String,
    pub profile_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_by_profile_id: Option<i64>,
}

impl From<ProfileEntity> for Profile {
    fn from(entity: ProfileEntity) -> Self {
        Self {
            profile_id: entity.profile_id,
            name: entity.name,
            email: entity.email,
            profile_type: Role::from_str(&entity.profile_type).unwrap_or(Role::Customer), // Default fallback
            created_at: entity.created_at,
            updated_by_profile_id: entity.updated_by_profile_id,
        }
    }
}

/// Credential row for login: profile plus hash plus the customer id when the
/// profile fronts a customer account. Never converted to a wire model.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileAuthEntity {
    pub profile_id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub profile_type: String,
    pub customer_id: Option<i64>,
}

impl ProfileAuthEntity {
    pub fn role(&self) -> Role {
        Role::from_str(&self.profile_type).unwrap_or(Role::Customer) // Default fallback
    }
}
