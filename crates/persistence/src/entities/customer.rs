//! Customer entities (database row mappings).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use std::str::FromStr;

use domain::models::{CustomerAccount, CustomerStatus};

/// Customer row joined with its owning profile.
#[derive(Debug, Clone, FromRow)]
pub struct CustomerAccountEntity {
    pub customer_id: i64,
    pub profile_id: i64,
    pub name: String,
    pub email: String,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub status: String,
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl From<CustomerAccountEntity> for CustomerAccount {
    fn from(entity: CustomerAccountEntity) -> Self {
        Self {
            customer_id: entity.customer_id,
            profile_id: entity.profile_id,
            name: entity.name,
            email: entity.email,
            contact: entity.contact,
            address: entity.address,
            status: CustomerStatus::from_str(&entity.status).unwrap_or(CustomerStatus::Active), // Default fallback
            date_of_birth: entity.date_of_birth,
            created_at: entity.created_at,
        }
    }
}
