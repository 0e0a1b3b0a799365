//! Tariff entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use domain::models::Tariff;

/// Database row mapping for the tariffs table.
#[derive(Debug, Clone, FromRow)]
pub struct TariffEntity {
    pub tariff_id: i64,
    pub created_by_profile_id: Option<i64>,
    pub effective_from: NaiveDate,
    pub rate_per_kwh: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<TariffEntity> for Tariff {
    fn from(entity: TariffEntity) -> Self {
        Self {
            tariff_id: entity.tariff_id,
            created_by_profile_id: entity.created_by_profile_id,
            effective_from: entity.effective_from,
            rate_per_kwh: entity.rate_per_kwh,
            is_active: entity.is_active,
            created_at: entity.created_at,
        }
    }
}
