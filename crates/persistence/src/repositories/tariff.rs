//! Tariff repository for database operations.

use chrono::NaiveDate;
use domain::models::Tariff;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::entities::TariffEntity;
use crate::metrics::QueryTimer;

const TARIFF_COLUMNS: &str =
    "tariff_id, created_by_profile_id, effective_from, rate_per_kwh, is_active, created_at";

/// Partial update for a tariff; absent fields keep their values.
#[derive(Debug, Clone, Default)]
pub struct TariffChanges {
    pub effective_from: Option<NaiveDate>,
    pub rate_per_kwh: Option<Decimal>,
    pub is_active: Option<bool>,
}

/// Repository for tariff database operations.
#[derive(Clone)]
pub struct TariffRepository {
    pool: PgPool,
}

impl TariffRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List tariffs, newest first. Inactive rows are hidden unless asked for.
    pub async fn list(&self, include_inactive: bool) -> Result<Vec<Tariff>, sqlx::Error> {
        let timer = QueryTimer::new("list_tariffs");
        let entities = sqlx::query_as::<_, TariffEntity>(&format!(
            r#"
            SELECT {TARIFF_COLUMNS}
            FROM tariffs
            WHERE is_active OR $1
            ORDER BY tariff_id DESC
            "#
        ))
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await?;
        timer.record();

        Ok(entities.into_iter().map(Tariff::from).collect())
    }

    /// Find a tariff by id.
    pub async fn find_by_id(&self, tariff_id: i64) -> Result<Option<Tariff>, sqlx::Error> {
        let timer = QueryTimer::new("find_tariff_by_id");
        let entity = sqlx::query_as::<_, TariffEntity>(&format!(
            "SELECT {TARIFF_COLUMNS} FROM tariffs WHERE tariff_id = $1"
        ))
        .bind(tariff_id)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();

        Ok(entity.map(Tariff::from))
    }

    /// Rate and active flag only, for bill amount computation.
    pub async fn rate_info(&self, tariff_id: i64) -> Result<Option<(Decimal, bool)>, sqlx::Error> {
        let timer = QueryTimer::new("tariff_rate_info");
        let result = sqlx::query_as::<_, (Decimal, bool)>(
            "SELECT rate_per_kwh, is_active FROM tariffs WHERE tariff_id = $1",
        )
        .bind(tariff_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        result
    }

    /// Insert a tariff row.
    pub async fn create(
        &self,
        effective_from: NaiveDate,
        rate_per_kwh: Decimal,
        is_active: bool,
        created_by: Option<i64>,
    ) -> Result<Tariff, sqlx::Error> {
        let timer = QueryTimer::new("create_tariff");
        let entity = sqlx::query_as::<_, TariffEntity>(&format!(
            r#"
            INSERT INTO tariffs (effective_from, rate_per_kwh, is_active, created_by_profile_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {TARIFF_COLUMNS}
            "#
        ))
        .bind(effective_from)
        .bind(rate_per_kwh)
        .bind(is_active)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;
        timer.record();

        Ok(Tariff::from(entity))
    }

    /// Merge a partial update into a tariff row.
    pub async fn update(
        &self,
        tariff_id: i64,
        changes: &TariffChanges,
    ) -> Result<Option<Tariff>, sqlx::Error> {
        let timer = QueryTimer::new("update_tariff");
        let entity = sqlx::query_as::<_, TariffEntity>(&format!(
            r#"
            UPDATE tariffs
            SET effective_from = COALESCE($2, effective_from),
                rate_per_kwh = COALESCE($3, rate_per_kwh),
                is_active = COALESCE($4, is_active)
            WHERE tariff_id = $1
            RETURNING {TARIFF_COLUMNS}
            "#
        ))
        .bind(tariff_id)
        .bind(changes.effective_from)
        .bind(changes.rate_per_kwh)
        .bind(changes.is_active)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();

        Ok(entity.map(Tariff::from))
    }

    /// Delete a tariff row. Bills referencing it surface as foreign key
    /// violations for the error classifier.
    pub async fn delete(&self, tariff_id: i64) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_tariff");
        let result = sqlx::query("DELETE FROM tariffs WHERE tariff_id = $1")
            .bind(tariff_id)
            .execute(&self.pool)
            .await?;
        timer.record();

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    // Note: TariffRepository tests require database connection and are covered by integration tests
}
