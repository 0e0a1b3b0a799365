//! Customer repository for database operations.
//!
//! Customer accounts span two rows (profiles + customers), so every write
//! here is a multi-statement transaction with the actor context bound into
//! the session before the first statement.

use chrono::NaiveDate;
use domain::models::{ActorContext, CustomerAccount, CustomerStatus};
use sqlx::PgPool;

use crate::entities::CustomerAccountEntity;
use crate::metrics::QueryTimer;
use crate::session;

const ACCOUNT_COLUMNS: &str = "c.customer_id, c.profile_id, p.name, p.email, c.contact, \
     c.address, c.status, c.date_of_birth, p.created_at";

/// Input for creating a customer account (profile row + customer row).
#[derive(Debug, Clone)]
pub struct NewCustomerAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub status: Option<CustomerStatus>,
    pub date_of_birth: Option<NaiveDate>,
}

/// Partial update for a customer account; absent fields keep their values.
#[derive(Debug, Clone, Default)]
pub struct CustomerAccountChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub status: Option<CustomerStatus>,
    pub date_of_birth: Option<NaiveDate>,
}

impl CustomerAccountChanges {
    /// Identity fields live on the profile row and need the extra UPDATE.
    pub fn touches_profile(&self) -> bool {
        self.name.is_some() || self.email.is_some()
    }
}

/// Ids released by a cascading delete, kept for the audit trail.
#[derive(Debug, Clone, Copy)]
pub struct DeletedCustomer {
    pub customer_id: i64,
    pub profile_id: i64,
}

/// Repository for customer database operations.
#[derive(Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List every customer account, newest first.
    pub async fn list(&self) -> Result<Vec<CustomerAccount>, sqlx::Error> {
        let timer = QueryTimer::new("list_customers");
        let entities = sqlx::query_as::<_, CustomerAccountEntity>(&format!(
            r#"
            SELECT {ACCOUNT_COLUMNS}
            FROM customers c
            JOIN profiles p ON p.profile_id = c.profile_id
            ORDER BY c.customer_id DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await?;
        timer.record();

        Ok(entities.into_iter().map(CustomerAccount::from).collect())
    }

    /// Find a customer account by its profile id.
    pub async fn find_by_profile_id(
        &self,
        profile_id: i64,
    ) -> Result<Option<CustomerAccount>, sqlx::Error> {
        let timer = QueryTimer::new("find_customer_by_profile_id");
        let entity = sqlx::query_as::<_, CustomerAccountEntity>(&format!(
            r#"
            SELECT {ACCOUNT_COLUMNS}
            FROM customers c
            JOIN profiles p ON p.profile_id = c.profile_id
            WHERE c.profile_id = $1
            "#
        ))
        .bind(profile_id)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();

        Ok(entity.map(CustomerAccount::from))
    }

    /// Resolve the customer id behind a profile id.
    pub async fn resolve_customer_id(
        &self,
        profile_id: i64,
    ) -> Result<Option<i64>, sqlx::Error> {
        let timer = QueryTimer::new("resolve_customer_id");
        let result =
            sqlx::query_scalar::<_, i64>("SELECT customer_id FROM customers WHERE profile_id = $1")
                .bind(profile_id)
                .fetch_optional(&self.pool)
                .await;
        timer.record();

        result
    }

    /// Whether a customer row exists, used before attaching bills or feedback.
    pub async fn exists(&self, customer_id: i64) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("customer_exists");
        let found = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM customers WHERE customer_id = $1)",
        )
        .bind(customer_id)
        .fetch_one(&self.pool)
        .await?;
        timer.record();

        Ok(found)
    }

    /// Create the profile row and the customer row in one transaction.
    pub async fn create_with_profile(
        &self,
        ctx: &ActorContext,
        input: &NewCustomerAccount,
        updated_by: Option<i64>,
    ) -> Result<CustomerAccount, sqlx::Error> {
        let timer = QueryTimer::new("create_customer_with_profile");
        let mut tx = self.pool.begin().await?;
        session::bind_actor_context(&mut tx, ctx).await?;

        let (profile_id, created_at) = sqlx::query_as::<_, (i64, chrono::DateTime<chrono::Utc>)>(
            r#"
            INSERT INTO profiles (name, email, password_hash, profile_type, updated_by_profile_id)
            VALUES ($1, $2, $3, 'Customer', $4)
            RETURNING profile_id, created_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(updated_by)
        .fetch_one(&mut *tx)
        .await?;

        let (customer_id, status) = sqlx::query_as::<_, (i64, String)>(
            r#"
            INSERT INTO customers (profile_id, contact, address, status, date_of_birth)
            VALUES ($1, $2, $3, COALESCE($4, 'Active'), $5)
            RETURNING customer_id, status
            "#,
        )
        .bind(profile_id)
        .bind(input.contact.as_deref())
        .bind(input.address.as_deref())
        .bind(input.status.map(|s| s.as_str()))
        .bind(input.date_of_birth)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();

        Ok(CustomerAccount::from(CustomerAccountEntity {
            customer_id,
            profile_id,
            name: input.name.clone(),
            email: input.email.clone(),
            contact: input.contact.clone(),
            address: input.address.clone(),
            status,
            date_of_birth: input.date_of_birth,
            created_at,
        }))
    }

    /// Merge a partial update across the profile and customer rows in one
    /// transaction, then return the refreshed account.
    pub async fn update_with_profile(
        &self,
        ctx: &ActorContext,
        profile_id: i64,
        changes: &CustomerAccountChanges,
        updated_by: Option<i64>,
    ) -> Result<Option<CustomerAccount>, sqlx::Error> {
        let timer = QueryTimer::new("update_customer_with_profile");
        let mut tx = self.pool.begin().await?;
        session::bind_actor_context(&mut tx, ctx).await?;

        if changes.touches_profile() {
            sqlx::query(
                r#"
                UPDATE profiles
                SET name = COALESCE($2, name),
                    email = COALESCE($3, email),
                    updated_by_profile_id = $4
                WHERE profile_id = $1
                "#,
            )
            .bind(profile_id)
            .bind(changes.name.as_deref())
            .bind(changes.email.as_deref())
            .bind(updated_by)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            r#"
            UPDATE customers
            SET contact = COALESCE($2, contact),
                address = COALESCE($3, address),
                status = COALESCE($4, status),
                date_of_birth = COALESCE($5, date_of_birth)
            WHERE profile_id = $1
            "#,
        )
        .bind(profile_id)
        .bind(changes.contact.as_deref())
        .bind(changes.address.as_deref())
        .bind(changes.status.map(|s| s.as_str()))
        .bind(changes.date_of_birth)
        .execute(&mut *tx)
        .await?;

        let entity = sqlx::query_as::<_, CustomerAccountEntity>(&format!(
            r#"
            SELECT {ACCOUNT_COLUMNS}
            FROM customers c
            JOIN profiles p ON p.profile_id = c.profile_id
            WHERE c.profile_id = $1
            "#
        ))
        .bind(profile_id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();

        Ok(entity.map(CustomerAccount::from))
    }

    /// Delete a customer and everything hanging off it in one transaction:
    /// bills, feedback replies, feedback, the customer row, the profile row.
    pub async fn delete_cascade(
        &self,
        ctx: &ActorContext,
        profile_id: i64,
    ) -> Result<Option<DeletedCustomer>, sqlx::Error> {
        let timer = QueryTimer::new("delete_customer_cascade");
        let mut tx = self.pool.begin().await?;
        session::bind_actor_context(&mut tx, ctx).await?;

        let customer_id = sqlx::query_scalar::<_, i64>(
            "SELECT customer_id FROM customers WHERE profile_id = $1",
        )
        .bind(profile_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(customer_id) = customer_id else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM electric_bills WHERE customer_id = $1")
            .bind(customer_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            DELETE FROM feedback_replies
            WHERE feedback_id IN (SELECT feedback_id FROM feedback WHERE customer_id = $1)
            "#,
        )
        .bind(customer_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM feedback WHERE customer_id = $1")
            .bind(customer_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM customers WHERE customer_id = $1")
            .bind(customer_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM profiles WHERE profile_id = $1")
            .bind(profile_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        timer.record();

        Ok(Some(DeletedCustomer {
            customer_id,
            profile_id,
        }))
    }
}

#[cfg(test)]
mod tests {
    // Note: Integration tests requiring database are in tests/ directory
    // Unit tests here cover logic that doesn't require database connection
    use super::*;

    #[test]
    fn profile_update_skipped_unless_identity_fields_change() {
        let account_only = CustomerAccountChanges {
            contact: Some("555-0199".to_string()),
            status: Some(CustomerStatus::Suspended),
            ..Default::default()
        };
        assert!(!account_only.touches_profile());

        let with_name = CustomerAccountChanges {
            name: Some("New Name".to_string()),
            ..Default::default()
        };
        assert!(with_name.touches_profile());

        let with_email = CustomerAccountChanges {
            email: Some("new@example.com".to_string()),
            ..Default::default()
        };
        assert!(with_email.touches_profile());
    }

    #[test]
    fn default_changes_are_a_no_op_merge() {
        let changes = CustomerAccountChanges::default();
        assert!(changes.name.is_none());
        assert!(changes.email.is_none());
        assert!(changes.contact.is_none());
        assert!(changes.address.is_none());
        assert!(changes.status.is_none());
        assert!(changes.date_of_birth.is_none());
    }
}
