//! Actor context binding for transactional sessions.
//!
//! Every context-scoped write opens a transaction and binds the actor's
//! security attributes as transaction-local settings before running its
//! statements. These are the variables a native row-level-security policy
//! would key on (`current_setting('app.role', true)` and friends); row
//! filtering in this codebase happens in application queries, with the
//! session variables as defense-in-depth underneath.

use domain::models::ActorContext;
use sqlx::{Postgres, Transaction};

pub const ROLE_VAR: &str = "app.role";
pub const PROFILE_ID_VAR: &str = "app.profile_id";
pub const CUSTOMER_ID_VAR: &str = "app.customer_id";

/// Bind the actor's {role, profile_id, customer_id} into the transaction.
///
/// `set_config(..., true)` scopes the values to the transaction: they vanish
/// at commit or rollback, so a pooled connection never leaks one request's
/// identity into the next. Absent ids bind as empty strings, which
/// `current_setting(..., true)` reads back as missing.
pub async fn bind_actor_context(
    tx: &mut Transaction<'_, Postgres>,
    ctx: &ActorContext,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "SELECT set_config($1, $2, true), set_config($3, $4, true), set_config($5, $6, true)",
    )
    .bind(ROLE_VAR)
    .bind(ctx.role.as_str())
    .bind(PROFILE_ID_VAR)
    .bind(id_setting(ctx.profile_id))
    .bind(CUSTOMER_ID_VAR)
    .bind(id_setting(ctx.customer_id))
    .execute(&mut **tx)
    .await?;

    Ok(())
}

fn id_setting(id: Option<i64>) -> String {
    id.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_ids_bind_as_empty_settings() {
        assert_eq!(id_setting(None), "");
        assert_eq!(id_setting(Some(42)), "42");
    }
}
