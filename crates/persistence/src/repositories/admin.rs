//! Admin repository for database operations.

use domain::models::{ActorContext, AdminAccount};
use sqlx::PgPool;

use crate::entities::AdminAccountEntity;
use crate::metrics::QueryTimer;
use crate::session;

const ACCOUNT_COLUMNS: &str = "a.admin_id, a.profile_id, p.name, p.email, p.created_at";

/// Input for creating an admin account.
#[derive(Debug, Clone)]
pub struct NewAdminAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Partial update for an admin account; absent fields keep their values.
#[derive(Debug, Clone, Default)]
pub struct AdminAccountChanges {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Repository for admin database operations.
#[derive(Clone)]
pub struct AdminRepository {
    pool: PgPool,
}

impl AdminRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List every admin account, newest first.
    pub async fn list(&self) -> Result<Vec<AdminAccount>, sqlx::Error> {
        let timer = QueryTimer::new("list_admins");
        let entities = sqlx::query_as::<_, AdminAccountEntity>(&format!(
            r#"
            SELECT {ACCOUNT_COLUMNS}
            FROM admins a
            JOIN profiles p ON p.profile_id = a.profile_id
            ORDER BY a.admin_id DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await?;
        timer.record();

        Ok(entities.into_iter().map(AdminAccount::from).collect())
    }

    /// Find an admin account by its profile id.
    pub async fn find_by_profile_id(
        &self,
        profile_id: i64,
    ) -> Result<Option<AdminAccount>, sqlx::Error> {
        let timer = QueryTimer::new("find_admin_by_profile_id");
        let entity = sqlx::query_as::<_, AdminAccountEntity>(&format!(
            r#"
            SELECT {ACCOUNT_COLUMNS}
            FROM admins a
            JOIN profiles p ON p.profile_id = a.profile_id
            WHERE a.profile_id = $1
            "#
        ))
        .bind(profile_id)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();

        Ok(entity.map(AdminAccount::from))
    }

    /// Create the profile row and the admin row in one transaction.
    pub async fn create_with_profile(
        &self,
        ctx: &ActorContext,
        input: &NewAdminAccount,
        updated_by: Option<i64>,
    ) -> Result<AdminAccount, sqlx::Error> {
        let timer = QueryTimer::new("create_admin_with_profile");
        let mut tx = self.pool.begin().await?;
        session::bind_actor_context(&mut tx, ctx).await?;

        let (profile_id, created_at) = sqlx::query_as::<_, (i64, chrono::DateTime<chrono::Utc>)>(
            r#"
            INSERT INTO profiles (name, email, password_hash, profile_type, updated_by_profile_id)
            VALUES ($1, $2, $3, 'Admin', $4)
            RETURNING profile_id, created_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(updated_by)
        .fetch_one(&mut *tx)
        .await?;

        let admin_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO admins (profile_id) VALUES ($1) RETURNING admin_id",
        )
        .bind(profile_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();

        Ok(AdminAccount::from(AdminAccountEntity {
            admin_id,
            profile_id,
            name: input.name.clone(),
            email: input.email.clone(),
            created_at,
        }))
    }

    /// Merge a partial update into the profile row behind an admin account,
    /// then return the refreshed account.
    pub async fn update_with_profile(
        &self,
        ctx: &ActorContext,
        profile_id: i64,
        changes: &AdminAccountChanges,
        updated_by: Option<i64>,
    ) -> Result<Option<AdminAccount>, sqlx::Error> {
        let timer = QueryTimer::new("update_admin_with_profile");
        let mut tx = self.pool.begin().await?;
        session::bind_actor_context(&mut tx, ctx).await?;

        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT admin_id FROM admins WHERE profile_id = $1",
        )
        .bind(profile_id)
        .fetch_optional(&mut *tx)
        .await?;

        if exists.is_none() {
            return Ok(None);
        }

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

        let entity = sqlx::query_as::<_, AdminAccountEntity>(&format!(
            r#"
            SELECT {ACCOUNT_COLUMNS}
            FROM admins a
            JOIN profiles p ON p.profile_id = a.profile_id
            WHERE a.profile_id = $1
            "#
        ))
        .bind(profile_id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();

        Ok(entity.map(AdminAccount::from))
    }

    /// Delete the admin row and its profile row in one transaction. Returns
    /// the admin id for the audit trail.
    pub async fn delete_with_profile(
        &self,
        ctx: &ActorContext,
        profile_id: i64,
    ) -> Result<Option<i64>, sqlx::Error> {
        let timer = QueryTimer::new("delete_admin_with_profile");
        let mut tx = self.pool.begin().await?;
        session::bind_actor_context(&mut tx, ctx).await?;

        let admin_id = sqlx::query_scalar::<_, i64>(
            "DELETE FROM admins WHERE profile_id = $1 RETURNING admin_id",
        )
        .bind(profile_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(admin_id) = admin_id else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM profiles WHERE profile_id = $1")
            .bind(profile_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        timer.record();

        Ok(Some(admin_id))
    }
}

#[cfg(test)]
mod tests {
    // Note: AdminRepository tests require database connection and are covered by integration tests
}
