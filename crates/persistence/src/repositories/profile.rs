//! Profile repository for database operations.
//!
//! The bare profile surface is administrative and single-statement, so it
//! runs plain pool queries rather than context-bound transactions.

use domain::models::{Profile, Role};
use sqlx::PgPool;

use crate::entities::{ProfileAuthEntity, ProfileEntity};
use crate::metrics::QueryTimer;

const PROFILE_COLUMNS: &str =
    "profile_id, name, email, profile_type, created_at, updated_by_profile_id";

/// Partial update for a profile row; absent fields keep their values.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub profile_type: Option<Role>,
}

/// Repository for profile database operations.
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List every profile, newest first.
    pub async fn list(&self) -> Result<Vec<Profile>, sqlx::Error> {
        let timer = QueryTimer::new("list_profiles");
        let entities = sqlx::query_as::<_, ProfileEntity>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY profile_id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        timer.record();

        Ok(entities.into_iter().map(Profile::from).collect())
    }

    /// Find a profile by id.
    pub async fn find_by_id(&self, profile_id: i64) -> Result<Option<Profile>, sqlx::Error> {
        let timer = QueryTimer::new("find_profile_by_id");
        let entity = sqlx::query_as::<_, ProfileEntity>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE profile_id = $1"
        ))
        .bind(profile_id)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();

        Ok(entity.map(Profile::from))
    }

    /// Credential lookup for login. The identifier matches email or name.
    pub async fn find_for_login(
        &self,
        identifier: &str,
    ) -> Result<Option<ProfileAuthEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_profile_for_login");
        let result = sqlx::query_as::<_, ProfileAuthEntity>(
            r#"
            SELECT p.profile_id, p.name, p.email, p.password_hash, p.profile_type,
                   c.customer_id
            FROM profiles p
            LEFT JOIN customers c ON c.profile_id = p.profile_id
            WHERE p.email = $1 OR p.name = $1
            "#,
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        result
    }

    /// Whether an email is already registered, optionally ignoring one
    /// profile (the row being updated).
    pub async fn email_taken(
        &self,
        email: &str,
        exclude_profile_id: Option<i64>,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("profile_email_taken");
        let taken = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM profiles
                WHERE email = $1 AND ($2::bigint IS NULL OR profile_id <> $2)
            )
            "#,
        )
        .bind(email)
        .bind(exclude_profile_id)
        .fetch_one(&self.pool)
        .await?;
        timer.record();

        Ok(taken)
    }

    /// Insert a bare profile row.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        profile_type: Role,
        updated_by: Option<i64>,
    ) -> Result<Profile, sqlx::Error> {
        let timer = QueryTimer::new("create_profile");
        let entity = sqlx::query_as::<_, ProfileEntity>(&format!(
            r#"
            INSERT INTO profiles (name, email, password_hash, profile_type, updated_by_profile_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(profile_type.as_str())
        .bind(updated_by)
        .fetch_one(&self.pool)
        .await?;
        timer.record();

        Ok(Profile::from(entity))
    }

    /// Merge a partial update into a profile row; `updated_by` is stamped on
    /// every hit.
    pub async fn update(
        &self,
        profile_id: i64,
        changes: &ProfileChanges,
        updated_by: Option<i64>,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let timer = QueryTimer::new("update_profile");
        let entity = sqlx::query_as::<_, ProfileEntity>(&format!(
            r#"
            UPDATE profiles
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                profile_type = COALESCE($5, profile_type),
                updated_by_profile_id = $6
            WHERE profile_id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(profile_id)
        .bind(changes.name.as_deref())
        .bind(changes.email.as_deref())
        .bind(changes.password_hash.as_deref())
        .bind(changes.profile_type.map(|t| t.as_str()))
        .bind(updated_by)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();

        Ok(entity.map(Profile::from))
    }

    /// Delete a bare profile row, one that never got a role row. Profiles
    /// backing a customer, staff or admin account go through the role
    /// repositories so the role row comes off in the same transaction.
    pub async fn delete_bare(&self, profile_id: i64) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_profile");
        let result = sqlx::query("DELETE FROM profiles WHERE profile_id = $1")
            .bind(profile_id)
            .execute(&self.pool)
            .await?;
        timer.record();

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    // Note: ProfileRepository tests require database connection and are covered by integration tests
}
