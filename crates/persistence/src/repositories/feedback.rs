//! Feedback repository for database operations.

use domain::models::{
    ActorContext, Feedback, FeedbackDetail, FeedbackReply, FeedbackStatus, FeedbackWithCustomer,
};
use sqlx::PgPool;

use crate::entities::{FeedbackEntity, FeedbackReplyEntity, FeedbackWithCustomerEntity};
use crate::metrics::QueryTimer;
use crate::session;

const FEEDBACK_COLUMNS: &str =
    "feedback_id, customer_id, rating, content, status, created_at";

const REPLY_COLUMNS: &str = "r.reply_id, r.feedback_id, r.profile_id, p.name AS replier_name, \
     p.profile_type AS replier_role, r.content, r.created_at";

/// Repository for feedback and reply database operations.
#[derive(Clone)]
pub struct FeedbackRepository {
    pool: PgPool,
}

impl FeedbackRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a feedback row. New feedback always starts open.
    pub async fn create(
        &self,
        ctx: &ActorContext,
        customer_id: i64,
        rating: Option<i32>,
        content: &str,
    ) -> Result<Feedback, sqlx::Error> {
        let timer = QueryTimer::new("create_feedback");
        let mut tx = self.pool.begin().await?;
        session::bind_actor_context(&mut tx, ctx).await?;

        let entity = sqlx::query_as::<_, FeedbackEntity>(&format!(
            r#"
            INSERT INTO feedback (customer_id, rating, content, status)
            VALUES ($1, $2, $3, 'Open')
            RETURNING {FEEDBACK_COLUMNS}
            "#
        ))
        .bind(customer_id)
        .bind(rating)
        .bind(content)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();

        Ok(Feedback::from(entity))
    }

    /// List the feedback of a single customer, newest first.
    pub async fn list_for_customer(&self, customer_id: i64) -> Result<Vec<Feedback>, sqlx::Error> {
        let timer = QueryTimer::new("list_feedback_for_customer");
        let entities = sqlx::query_as::<_, FeedbackEntity>(&format!(
            r#"
            SELECT {FEEDBACK_COLUMNS}
            FROM feedback
            WHERE customer_id = $1
            ORDER BY feedback_id DESC
            "#
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;
        timer.record();

        Ok(entities.into_iter().map(Feedback::from).collect())
    }

    /// List every feedback entry with the submitting customer attached,
    /// newest first.
    pub async fn list_with_customers(&self) -> Result<Vec<FeedbackWithCustomer>, sqlx::Error> {
        let timer = QueryTimer::new("list_feedback_with_customers");
        let entities = sqlx::query_as::<_, FeedbackWithCustomerEntity>(
            r#"
            SELECT f.feedback_id, f.customer_id, f.rating, f.content, f.status, f.created_at,
                   c.profile_id AS customer_profile_id, p.name AS customer_name,
                   p.email AS customer_email
            FROM feedback f
            JOIN customers c ON c.customer_id = f.customer_id
            JOIN profiles p ON p.profile_id = c.profile_id
            ORDER BY f.feedback_id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        timer.record();

        Ok(entities
            .into_iter()
            .map(FeedbackWithCustomer::from)
            .collect())
    }

    /// Find a feedback entry by id.
    pub async fn find_by_id(&self, feedback_id: i64) -> Result<Option<Feedback>, sqlx::Error> {
        let timer = QueryTimer::new("find_feedback_by_id");
        let entity = sqlx::query_as::<_, FeedbackEntity>(&format!(
            "SELECT {FEEDBACK_COLUMNS} FROM feedback WHERE feedback_id = $1"
        ))
        .bind(feedback_id)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();

        Ok(entity.map(Feedback::from))
    }

    /// Ownership check for customer-facing reads of a single entry.
    pub async fn is_owned_by(
        &self,
        feedback_id: i64,
        customer_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("feedback_is_owned_by");
        let owned = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM feedback WHERE feedback_id = $1 AND customer_id = $2)",
        )
        .bind(feedback_id)
        .bind(customer_id)
        .fetch_one(&self.pool)
        .await?;
        timer.record();

        Ok(owned)
    }

    /// A feedback entry with its reply thread, oldest reply first.
    pub async fn detail(&self, feedback_id: i64) -> Result<Option<FeedbackDetail>, sqlx::Error> {
        let Some(feedback) = self.find_by_id(feedback_id).await? else {
            return Ok(None);
        };

        let timer = QueryTimer::new("list_feedback_replies");
        let entities = sqlx::query_as::<_, FeedbackReplyEntity>(&format!(
            r#"
            SELECT {REPLY_COLUMNS}
            FROM feedback_replies r
            JOIN profiles p ON p.profile_id = r.profile_id
            WHERE r.feedback_id = $1
            ORDER BY r.reply_id ASC
            "#
        ))
        .bind(feedback_id)
        .fetch_all(&self.pool)
        .await?;
        timer.record();

        Ok(Some(FeedbackDetail {
            feedback,
            replies: entities.into_iter().map(FeedbackReply::from).collect(),
        }))
    }

    /// Move a feedback entry to a new triage status.
    pub async fn update_status(
        &self,
        ctx: &ActorContext,
        feedback_id: i64,
        status: FeedbackStatus,
    ) -> Result<Option<Feedback>, sqlx::Error> {
        let timer = QueryTimer::new("update_feedback_status");
        let mut tx = self.pool.begin().await?;
        session::bind_actor_context(&mut tx, ctx).await?;

        let entity = sqlx::query_as::<_, FeedbackEntity>(&format!(
            r#"
            UPDATE feedback
            SET status = $2
            WHERE feedback_id = $1
            RETURNING {FEEDBACK_COLUMNS}
            "#
        ))
        .bind(feedback_id)
        .bind(status.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();

        Ok(entity.map(Feedback::from))
    }

    /// Insert a reply and return it joined with the replier's profile, all
    /// inside one transaction.
    pub async fn add_reply(
        &self,
        ctx: &ActorContext,
        feedback_id: i64,
        profile_id: i64,
        content: &str,
    ) -> Result<FeedbackReply, sqlx::Error> {
        let timer = QueryTimer::new("add_feedback_reply");
        let mut tx = self.pool.begin().await?;
        session::bind_actor_context(&mut tx, ctx).await?;

        let reply_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO feedback_replies (feedback_id, profile_id, content)
            VALUES ($1, $2, $3)
            RETURNING reply_id
            "#,
        )
        .bind(feedback_id)
        .bind(profile_id)
        .bind(content)
        .fetch_one(&mut *tx)
        .await?;

        let entity = sqlx::query_as::<_, FeedbackReplyEntity>(&format!(
            r#"
            SELECT {REPLY_COLUMNS}
            FROM feedback_replies r
            JOIN profiles p ON p.profile_id = r.profile_id
            WHERE r.reply_id = $1
            "#
        ))
        .bind(reply_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();

        Ok(FeedbackReply::from(entity))
    }

    /// Delete a feedback entry and its replies in one transaction.
    pub async fn delete_with_replies(
        &self,
        ctx: &ActorContext,
        feedback_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_feedback_with_replies");
        let mut tx = self.pool.begin().await?;
        session::bind_actor_context(&mut tx, ctx).await?;

        sqlx::query("DELETE FROM feedback_replies WHERE feedback_id = $1")
            .bind(feedback_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM feedback WHERE feedback_id = $1")
            .bind(feedback_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        timer.record();

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    // Note: FeedbackRepository tests require database connection and are covered by integration tests
}
