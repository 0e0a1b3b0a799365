//! Feedback routes.
//!
//! Customers submit and read their own feedback; staff and admins
//! triage it, move it through its status lifecycle and reply. A
//! customer never sees another customer's thread.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use validator::Validate;

use domain::models::{Feedback, FeedbackDetail, FeedbackReply, FeedbackStatus, FeedbackWithCustomer};
use domain::services::audit_events;
use persistence::repositories::{AuditLogRepository, CustomerRepository, FeedbackRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Actor;

/// Create feedback router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_feedback).post(submit_feedback))
        .route("/my", get(list_own_feedback))
        .route("/:feedback_id", get(get_feedback).delete(delete_feedback))
        .route("/:feedback_id/status", put(update_feedback_status))
        .route("/:feedback_id/replies", post(add_reply))
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedbackRequest {
    #[validate(custom(function = "shared::validation::validate_rating"))]
    pub rating: Option<i32>,

    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeedbackStatusRequest {
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReplyRequest {
    pub content: String,
}

/// List all feedback with customer identity attached.
///
/// GET /api/feedbacks (staff, admin)
#[axum::debug_handler]
pub async fn list_feedback(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<Vec<FeedbackWithCustomer>>, ApiError> {
    if !actor.0.role.is_operator() {
        return Err(ApiError::Forbidden(
            "Insufficient permissions for this resource".to_string(),
        ));
    }

    let repo = FeedbackRepository::new(state.pool.clone());
    let feedback = repo.list_with_customers().await?;
    Ok(Json(feedback))
}

/// List the caller's own feedback. Customers without a customer row get
/// an empty list, not an error.
///
/// GET /api/feedbacks/my (customer)
#[axum::debug_handler]
pub async fn list_own_feedback(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<Vec<Feedback>>, ApiError> {
    if !actor.0.is_customer() {
        return Err(ApiError::Forbidden(
            "Insufficient permissions for this resource".to_string(),
        ));
    }

    let Some(customer_id) = resolve_customer_id(&state, &actor).await? else {
        return Ok(Json(Vec::new()));
    };

    let repo = FeedbackRepository::new(state.pool.clone());
    let feedback = repo.list_for_customer(customer_id).await?;
    Ok(Json(feedback))
}

/// Get a feedback thread with its replies. The ownership check runs
/// before any reply detail is loaded.
///
/// GET /api/feedbacks/:feedback_id
#[axum::debug_handler]
pub async fn get_feedback(
    State(state): State<AppState>,
    actor: Actor,
    Path(feedback_id): Path<i64>,
) -> Result<Json<FeedbackDetail>, ApiError> {
    let repo = FeedbackRepository::new(state.pool.clone());

    if actor.0.is_customer() {
        let customer_id = resolve_customer_id(&state, &actor).await?;
        let owned = match customer_id {
            Some(customer_id) => repo.is_owned_by(feedback_id, customer_id).await?,
            None => false,
        };
        if !owned {
            return if repo.find_by_id(feedback_id).await?.is_none() {
                Err(ApiError::NotFound("Feedback not found".to_string()))
            } else {
                Err(ApiError::Forbidden(
                    "You do not have access to this feedback".to_string(),
                ))
            };
        }
    }

    let detail = repo
        .detail(feedback_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Feedback not found".to_string()))?;
    Ok(Json(detail))
}

/// Submit feedback as the calling customer.
///
/// POST /api/feedbacks (customer)
#[axum::debug_handler]
pub async fn submit_feedback(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<SubmitFeedbackRequest>,
) -> Result<(StatusCode, Json<Feedback>), ApiError> {
    if !actor.0.is_customer() {
        return Err(ApiError::Forbidden(
            "Insufficient permissions for this resource".to_string(),
        ));
    }
    request.validate()?;
    if request.content.trim().is_empty() {
        return Err(ApiError::Validation(
            "Feedback content cannot be empty".to_string(),
        ));
    }

    let customer_id = resolve_customer_id(&state, &actor)
        .await?
        .ok_or_else(|| ApiError::NotFound("Customer not found".to_string()))?;

    let repo = FeedbackRepository::new(state.pool.clone());
    let feedback = repo
        .create(&actor.0, customer_id, request.rating, &request.content)
        .await?;

    AuditLogRepository::new(state.pool.clone()).insert_async(audit_events::feedback_submitted(
        feedback.feedback_id,
        feedback.rating,
        actor.0.profile_id,
    ));

    tracing::info!(
        feedback_id = feedback.feedback_id,
        customer_id,
        "Feedback submitted"
    );

    Ok((StatusCode::CREATED, Json(feedback)))
}

/// Move feedback through its status lifecycle. Transitions only move
/// forward; a resolved thread never reopens.
///
/// PUT /api/feedbacks/:feedback_id/status (staff, admin)
#[axum::debug_handler]
pub async fn update_feedback_status(
    State(state): State<AppState>,
    actor: Actor,
    Path(feedback_id): Path<i64>,
    Json(request): Json<UpdateFeedbackStatusRequest>,
) -> Result<Json<Feedback>, ApiError> {
    if !actor.0.role.is_operator() {
        return Err(ApiError::Forbidden(
            "Insufficient permissions for this resource".to_string(),
        ));
    }

    let next: FeedbackStatus = request
        .status
        .parse()
        .map_err(|_| ApiError::Validation("Invalid feedback status".to_string()))?;

    let repo = FeedbackRepository::new(state.pool.clone());
    let existing = repo
        .find_by_id(feedback_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Feedback not found".to_string()))?;

    if !existing.status.can_transition_to(next) {
        return Err(ApiError::Validation(format!(
            "Cannot transition feedback from {} to {}",
            existing.status, next
        )));
    }

    let feedback = repo
        .update_status(&actor.0, feedback_id, next)
        .await?
        .ok_or_else(|| ApiError::NotFound("Feedback not found".to_string()))?;

    AuditLogRepository::new(state.pool.clone()).insert_async(
        audit_events::feedback_status_changed(feedback_id, next, actor.0.profile_id),
    );

    tracing::info!(feedback_id, status = %next, "Feedback status updated");

    Ok(Json(feedback))
}

/// Reply to a feedback thread as staff or admin.
///
/// POST /api/feedbacks/:feedback_id/replies (staff, admin)
#[axum::debug_handler]
pub async fn add_reply(
    State(state): State<AppState>,
    actor: Actor,
    Path(feedback_id): Path<i64>,
    Json(request): Json<CreateReplyRequest>,
) -> Result<(StatusCode, Json<FeedbackReply>), ApiError> {
    if !actor.0.role.is_operator() {
        return Err(ApiError::Forbidden(
            "Insufficient permissions for this resource".to_string(),
        ));
    }
    if request.content.trim().is_empty() {
        return Err(ApiError::Validation(
            "Reply content cannot be empty".to_string(),
        ));
    }
    let profile_id = actor
        .0
        .profile_id
        .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

    let repo = FeedbackRepository::new(state.pool.clone());
    repo.find_by_id(feedback_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Feedback not found".to_string()))?;

    let reply = repo
        .add_reply(&actor.0, feedback_id, profile_id, &request.content)
        .await?;

    AuditLogRepository::new(state.pool.clone()).insert_async(audit_events::reply_added(
        reply.reply_id,
        feedback_id,
        actor.0.profile_id,
    ));

    tracing::info!(reply_id = reply.reply_id, feedback_id, "Reply added");

    Ok((StatusCode::CREATED, Json(reply)))
}

/// Delete a feedback thread and its replies.
///
/// DELETE /api/feedbacks/:feedback_id (admin only)
#[axum::debug_handler]
pub async fn delete_feedback(
    State(state): State<AppState>,
    actor: Actor,
    Path(feedback_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !actor.0.is_admin() {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    let repo = FeedbackRepository::new(state.pool.clone());
    let deleted = repo.delete_with_replies(&actor.0, feedback_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Feedback not found".to_string()));
    }

    AuditLogRepository::new(state.pool.clone())
        .insert_async(audit_events::feedback_deleted(feedback_id, actor.0.profile_id));

    tracing::info!(feedback_id, "Feedback deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Customer id for the calling customer, from the token when present,
/// otherwise looked up by profile id.
async fn resolve_customer_id(state: &AppState, actor: &Actor) -> Result<Option<i64>, ApiError> {
    if actor.0.customer_id.is_some() {
        return Ok(actor.0.customer_id);
    }
    let Some(profile_id) = actor.0.profile_id else {
        return Ok(None);
    };
    let repo = CustomerRepository::new(state.pool.clone());
    Ok(repo.resolve_customer_id(profile_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_request_allows_missing_rating() {
        let json = r#"{"content": "Billing portal is slow"}"#;
        let request: SubmitFeedbackRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_ok());
        assert!(request.rating.is_none());
    }

    #[test]
    fn submit_request_rejects_out_of_range_rating() {
        let json = r#"{"rating": 6, "content": "ok"}"#;
        let request: SubmitFeedbackRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_err());

        let json = r#"{"rating": 0, "content": "ok"}"#;
        let request: SubmitFeedbackRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn status_request_is_plain_string() {
        let json = r#"{"status": "InProgress"}"#;
        let request: UpdateFeedbackStatusRequest = serde_json::from_str(json).unwrap();
        assert!(request.status.parse::<FeedbackStatus>().is_ok());
    }
}
