//! Staff entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::StaffAccount;

/// Staff row joined with its owning profile.
#[derive(Debug, Clone, FromRow)]
pub struct StaffAccountEntity {
    pub staff_id: i64,
    pub profile_id: i64,
    pub name: String,
    pub email: String,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<StaffAccountEntity> for StaffAccount {
    fn from(entity: StaffAccountEntity) -> Self {
        Self {
            staff_id: entity.staff_id,
            profile_id: entity.profile_id,
            name: entity.name,
            email: entity.email,
            contact: entity.contact,
            address: entity.address,
            created_at: entity.created_at,
        }
    }
}
