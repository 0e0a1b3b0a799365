//! Staff repository for database operations.
//!
//! Same two-row shape as customers (profiles + staff), without the cascade:
//! a staff member with authored feedback replies cannot be deleted, and the
//! foreign key violation is left for the error classifier.

use domain::models::{ActorContext, StaffAccount};
use sqlx::PgPool;

use crate::entities::StaffAccountEntity;
use crate::metrics::QueryTimer;
use crate::session;

const ACCOUNT_COLUMNS: &str =
    "s.staff_id, s.profile_id, p.name, p.email, s.contact, s.address, p.created_at";

/// Input for creating a staff account.
#[derive(Debug, Clone)]
pub struct NewStaffAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub contact: Option<String>,
    pub address: Option<String>,
}

/// Partial update for a staff account; absent fields keep their values.
#[derive(Debug, Clone, Default)]
pub struct StaffAccountChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub contact: Option<String>,
    pub address: Option<String>,
}

impl StaffAccountChanges {
    pub fn touches_profile(&self) -> bool {
        self.name.is_some() || self.email.is_some()
    }
}

/// Repository for staff database operations.
#[derive(Clone)]
pub struct StaffRepository {
    pool: PgPool,
}

impl StaffRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List every staff account, newest first.
    pub async fn list(&self) -> Result<Vec<StaffAccount>, sqlx::Error> {
        let timer = QueryTimer::new("list_staff");
        let entities = sqlx::query_as::<_, StaffAccountEntity>(&format!(
            r#"
            SELECT {ACCOUNT_COLUMNS}
            FROM staff s
            JOIN profiles p ON p.profile_id = s.profile_id
            ORDER BY s.staff_id DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await?;
        timer.record();

        Ok(entities.into_iter().map(StaffAccount::from).collect())
    }

    /// Find a staff account by its profile id.
    pub async fn find_by_profile_id(
        &self,
        profile_id: i64,
    ) -> Result<Option<StaffAccount>, sqlx::Error> {
        let timer = QueryTimer::new("find_staff_by_profile_id");
        let entity = sqlx::query_as::<_, StaffAccountEntity>(&format!(
            r#"
            SELECT {ACCOUNT_COLUMNS}
            FROM staff s
            JOIN profiles p ON p.profile_id = s.profile_id
            WHERE s.profile_id = $1
            "#
        ))
        .bind(profile_id)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();

        Ok(entity.map(StaffAccount::from))
    }

    /// Create the profile row and the staff row in one transaction.
    pub async fn create_with_profile(
        &self,
        ctx: &ActorContext,
        input: &NewStaffAccount,
        updated_by: Option<i64>,
    ) -> Result<StaffAccount, sqlx::Error> {
        let timer = QueryTimer::new("create_staff_with_profile");
        let mut tx = self.pool.begin().await?;
        session::bind_actor_context(&mut tx, ctx).await?;

        let (profile_id, created_at) = sqlx::query_as::<_, (i64, chrono::DateTime<chrono::Utc>)>(
            r#"
            INSERT INTO profiles (name, email, password_hash, profile_type, updated_by_profile_id)
            VALUES ($1, $2, $3, 'Staff', $4)
            RETURNING profile_id, created_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(updated_by)
        .fetch_one(&mut *tx)
        .await?;

        let staff_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO staff (profile_id, contact, address)
            VALUES ($1, $2, $3)
            RETURNING staff_id
            "#,
        )
        .bind(profile_id)
        .bind(input.contact.as_deref())
        .bind(input.address.as_deref())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();

        Ok(StaffAccount::from(StaffAccountEntity {
            staff_id,
            profile_id,
            name: input.name.clone(),
            email: input.email.clone(),
            contact: input.contact.clone(),
            address: input.address.clone(),
            created_at,
        }))
    }

    /// Merge a partial update across the profile and staff rows in one
    /// transaction, then return the refreshed account.
    pub async fn update_with_profile(
        &self,
        ctx: &ActorContext,
        profile_id: i64,
        changes: &StaffAccountChanges,
        updated_by: Option<i64>,
    ) -> Result<Option<StaffAccount>, sqlx::Error> {
        let timer = QueryTimer::new("update_staff_with_profile");
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
            UPDATE staff
            SET contact = COALESCE($2, contact),
                address = COALESCE($3, address)
            WHERE profile_id = $1
            "#,
        )
        .bind(profile_id)
        .bind(changes.contact.as_deref())
        .bind(changes.address.as_deref())
        .execute(&mut *tx)
        .await?;

        let entity = sqlx::query_as::<_, StaffAccountEntity>(&format!(
            r#"
            SELECT {ACCOUNT_COLUMNS}
            FROM staff s
            JOIN profiles p ON p.profile_id = s.profile_id
            WHERE s.profile_id = $1
            "#
        ))
        .bind(profile_id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();

        Ok(entity.map(StaffAccount::from))
    }

    /// Delete the staff row and its profile row in one transaction. Returns
    /// the staff id for the audit trail.
    pub async fn delete_with_profile(
        &self,
        ctx: &ActorContext,
        profile_id: i64,
    ) -> Result<Option<i64>, sqlx::Error> {
        let timer = QueryTimer::new("delete_staff_with_profile");
        let mut tx = self.pool.begin().await?;
        session::bind_actor_context(&mut tx, ctx).await?;

        let staff_id = sqlx::query_scalar::<_, i64>(
            "DELETE FROM staff WHERE profile_id = $1 RETURNING staff_id",
        )
        .bind(profile_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(staff_id) = staff_id else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM profiles WHERE profile_id = $1")
            .bind(profile_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        timer.record();

        Ok(Some(staff_id))
    }
}

#[cfg(test)]
mod tests {
    // Note: StaffRepository tests require database connection and are covered by integration tests
    use super::*;

    #[test]
    fn profile_update_skipped_unless_identity_fields_change() {
        assert!(!StaffAccountChanges {
            contact: Some("555-0123".to_string()),
            ..Default::default()
        }
        .touches_profile());
        assert!(StaffAccountChanges {
            email: Some("ops@example.com".to_string()),
            ..Default::default()
        }
        .touches_profile());
    }
}
