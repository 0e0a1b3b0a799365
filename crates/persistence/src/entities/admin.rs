//! Admin entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::AdminAccount;

/// Admin row joined with its owning profile.
#[derive(Debug, Clone, FromRow)]
pub struct AdminAccountEntity {
    pub admin_id: i64,
    pub profile_id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<AdminAccountEntity> for AdminAccount {
    fn from(entity: AdminAccountEntity) -> Self {
        Self {
            admin_id: entity.admin_id,
            profile_id: entity.profile_id,
            name: entity.name,
            email: entity.email,
            created_at: entity.created_at,
        }
    }
}
