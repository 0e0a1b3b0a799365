//! Bill repository for database operations.
//!
//! Mutations run inside context-bound transactions. Amount arithmetic lives
//! in `domain::services::billing`; this layer only persists the results.

use chrono::NaiveDate;
use domain::models::{ActorContext, Bill, BillStatus, BillWithCustomer};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::entities::{BillEntity, BillWithCustomerEntity};
use crate::metrics::QueryTimer;
use crate::session;

const BILL_COLUMNS: &str = "bill_id, customer_id, tariff_id, period_start, period_end, \
     due_date, usage_kwh, amount, status";

/// Input for creating a bill. The amount is computed by the caller from the
/// tariff rate before the row is written.
#[derive(Debug, Clone)]
pub struct NewBill {
    pub customer_id: i64,
    pub tariff_id: i64,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub due_date: NaiveDate,
    pub usage_kwh: Decimal,
    pub amount: Decimal,
}

/// Partial update for a bill; absent fields keep their values. `usage_kwh`
/// and `amount` are both None unless the caller recomputed the charge.
#[derive(Debug, Clone, Default)]
pub struct BillChanges {
    pub tariff_id: Option<i64>,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub usage_kwh: Option<Decimal>,
    pub amount: Option<Decimal>,
    pub status: Option<BillStatus>,
}

/// Repository for bill database operations.
#[derive(Clone)]
pub struct BillRepository {
    pool: PgPool,
}

impl BillRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List every bill with the owning customer attached, newest first.
    pub async fn list_with_customers(&self) -> Result<Vec<BillWithCustomer>, sqlx::Error> {
        let timer = QueryTimer::new("list_bills_with_customers");
        let entities = sqlx::query_as::<_, BillWithCustomerEntity>(
            r#"
            SELECT b.bill_id, b.customer_id, b.tariff_id, b.period_start, b.period_end,
                   b.due_date, b.usage_kwh, b.amount, b.status,
                   c.profile_id AS customer_profile_id, p.name AS customer_name,
                   p.email AS customer_email
            FROM electric_bills b
            JOIN customers c ON c.customer_id = b.customer_id
            JOIN profiles p ON p.profile_id = c.profile_id
            ORDER BY b.bill_id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        timer.record();

        Ok(entities.into_iter().map(BillWithCustomer::from).collect())
    }

    /// List the bills of a single customer, newest first.
    pub async fn list_for_customer(&self, customer_id: i64) -> Result<Vec<Bill>, sqlx::Error> {
        let timer = QueryTimer::new("list_bills_for_customer");
        let entities = sqlx::query_as::<_, BillEntity>(&format!(
            r#"
            SELECT {BILL_COLUMNS}
            FROM electric_bills
            WHERE customer_id = $1
            ORDER BY bill_id DESC
            "#
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;
        timer.record();

        Ok(entities.into_iter().map(Bill::from).collect())
    }

    /// Find a bill by id.
    pub async fn find_by_id(&self, bill_id: i64) -> Result<Option<Bill>, sqlx::Error> {
        let timer = QueryTimer::new("find_bill_by_id");
        let entity = sqlx::query_as::<_, BillEntity>(&format!(
            "SELECT {BILL_COLUMNS} FROM electric_bills WHERE bill_id = $1"
        ))
        .bind(bill_id)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();

        Ok(entity.map(Bill::from))
    }

    /// Insert a bill row. New bills always start unpaid.
    pub async fn create(&self, ctx: &ActorContext, input: &NewBill) -> Result<Bill, sqlx::Error> {
        let timer = QueryTimer::new("create_bill");
        let mut tx = self.pool.begin().await?;
        session::bind_actor_context(&mut tx, ctx).await?;

        let entity = sqlx::query_as::<_, BillEntity>(&format!(
            r#"
            INSERT INTO electric_bills
                (customer_id, tariff_id, period_start, period_end, due_date, usage_kwh, amount, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'UNPAID')
            RETURNING {BILL_COLUMNS}
            "#
        ))
        .bind(input.customer_id)
        .bind(input.tariff_id)
        .bind(input.period_start)
        .bind(input.period_end)
        .bind(input.due_date)
        .bind(input.usage_kwh)
        .bind(input.amount)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();

        Ok(Bill::from(entity))
    }

    /// Merge a partial update into a bill row.
    pub async fn update(
        &self,
        ctx: &ActorContext,
        bill_id: i64,
        changes: &BillChanges,
    ) -> Result<Option<Bill>, sqlx::Error> {
        let timer = QueryTimer::new("update_bill");
        let mut tx = self.pool.begin().await?;
        session::bind_actor_context(&mut tx, ctx).await?;

        let entity = sqlx::query_as::<_, BillEntity>(&format!(
            r#"
            UPDATE electric_bills
            SET tariff_id = COALESCE($2, tariff_id),
                period_start = COALESCE($3, period_start),
                period_end = COALESCE($4, period_end),
                due_date = COALESCE($5, due_date),
                usage_kwh = COALESCE($6, usage_kwh),
                amount = COALESCE($7, amount),
                status = COALESCE($8, status)
            WHERE bill_id = $1
            RETURNING {BILL_COLUMNS}
            "#
        ))
        .bind(bill_id)
        .bind(changes.tariff_id)
        .bind(changes.period_start)
        .bind(changes.period_end)
        .bind(changes.due_date)
        .bind(changes.usage_kwh)
        .bind(changes.amount)
        .bind(changes.status.map(|s| s.as_str()))
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();

        Ok(entity.map(Bill::from))
    }

    /// Delete a bill row. Returns the deleted bill so the audit trail can
    /// record its last status.
    pub async fn delete(
        &self,
        ctx: &ActorContext,
        bill_id: i64,
    ) -> Result<Option<Bill>, sqlx::Error> {
        let timer = QueryTimer::new("delete_bill");
        let mut tx = self.pool.begin().await?;
        session::bind_actor_context(&mut tx, ctx).await?;

        let entity = sqlx::query_as::<_, BillEntity>(&format!(
            "DELETE FROM electric_bills WHERE bill_id = $1 RETURNING {BILL_COLUMNS}"
        ))
        .bind(bill_id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();

        Ok(entity.map(Bill::from))
    }
}

#[cfg(test)]
mod tests {
    // Note: Integration tests requiring database are in tests/ directory
    // Unit tests here cover logic that doesn't require database connection
    use super::*;

    #[test]
    fn default_changes_leave_charge_untouched() {
        let changes = BillChanges::default();
        assert!(changes.usage_kwh.is_none());
        assert!(changes.amount.is_none());
        assert!(changes.tariff_id.is_none());
        assert!(changes.status.is_none());
    }
}
