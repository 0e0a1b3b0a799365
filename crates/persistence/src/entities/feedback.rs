//! Feedback entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::str::FromStr;

use domain::models::{Feedback, FeedbackReply, FeedbackStatus, FeedbackWithCustomer, Role};

/// Database row mapping for the feedback table.
#[derive(Debug, Clone, FromRow)]
pub struct FeedbackEntity {
    pub feedback_id: i64,
    pub customer_id: i64,
    pub rating: Option<i32>,
    pub content: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<FeedbackEntity> for Feedback {
    fn from(entity: FeedbackEntity) -> Self {
        Self {
            feedback_id: entity.feedback_id,
            customer_id: entity.customer_id,
            rating: entity.rating,
            content: entity.content,
            status: FeedbackStatus::from_str(&entity.status).unwrap_or(FeedbackStatus::Open), // Default fallback
            created_at: entity.created_at,
        }
    }
}

/// Feedback row joined with the authoring customer's profile.
#[derive(Debug, Clone, FromRow)]
pub struct FeedbackWithCustomerEntity {
    pub feedback_id: i64,
    pub customer_id: i64,
    pub rating: Option<i32>,
    pub content: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub customer_profile_id: i64,
    pub customer_name: String,
    pub customer_email: String,
}

impl From<FeedbackWithCustomerEntity> for FeedbackWithCustomer {
    fn from(entity: FeedbackWithCustomerEntity) -> Self {
        Self {
            feedback: Feedback {
                feedback_id: entity.feedback_id,
                customer_id: entity.customer_id,
                rating: entity.rating,
                content: entity.content,
                status: FeedbackStatus::from_str(&entity.status).unwrap_or(FeedbackStatus::Open), // Default fallback
                created_at: entity.created_at,
            },
            customer_profile_id: entity.customer_profile_id,
            customer_name: entity.customer_name,
            customer_email: entity.customer_email,
        }
    }
}

/// Reply row joined with the replying profile's name and role.
#[derive(Debug, Clone, FromRow)]
pub struct FeedbackReplyEntity {
    pub reply_id: i64,
    pub feedback_id: i64,
    pub profile_id: i64,
    pub replier_name: String,
    pub replier_role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<FeedbackReplyEntity> for FeedbackReply {
    fn from(entity: FeedbackReplyEntity) -> Self {
        Self {
            reply_id: entity.reply_id,
            feedback_id: entity.feedback_id,
            profile_id: entity.profile_id,
            replier_name: entity.replier_name,
            replier_role: Role::from_str(&entity.replier_role).unwrap_or(Role::Staff), // Default fallback
            content: entity.content,
            created_at: entity.created_at,
        }
    }
}
