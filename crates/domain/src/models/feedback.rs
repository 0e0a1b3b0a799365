//! Feedback domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::actor::Role;

/// Triage status of a feedback thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl FeedbackStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackStatus::Open => "Open",
            FeedbackStatus::InProgress => "InProgress",
            FeedbackStatus::Resolved => "Resolved",
            FeedbackStatus::Closed => "Closed",
        }
    }

    fn stage(&self) -> u8 {
        match self {
            FeedbackStatus::Open => 0,
            FeedbackStatus::InProgress => 1,
            FeedbackStatus::Resolved => 2,
            FeedbackStatus::Closed => 3,
        }
    }

    /// Triage moves forward or restates the current stage, never backwards.
    pub fn can_transition_to(&self, next: FeedbackStatus) -> bool {
        next.stage() >= self.stage()
    }
}

impl FromStr for FeedbackStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Open" => Ok(FeedbackStatus::Open),
            "InProgress" => Ok(FeedbackStatus::InProgress),
            "Resolved" => Ok(FeedbackStatus::Resolved),
            "Closed" => Ok(FeedbackStatus::Closed),
            _ => Err(format!("Invalid feedback status: {}", s)),
        }
    }
}

impl fmt::Display for FeedbackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A customer-authored feedback entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub feedback_id: i64,
    pub customer_id: i64,
    pub rating: Option<i32>,
    pub content: String,
    pub status: FeedbackStatus,
    pub created_at: DateTime<Utc>,
}

/// Feedback joined with the author's profile, for staff-facing listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackWithCustomer {
    #[serde(flatten)]
    pub feedback: Feedback,
    pub customer_profile_id: i64,
    pub customer_name: String,
    pub customer_email: String,
}

/// A staff/admin reply on a feedback thread, enriched with the author.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackReply {
    pub reply_id: i64,
    pub feedback_id: i64,
    pub profile_id: i64,
    pub replier_name: String,
    pub replier_role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A feedback entry with its full, creation-ordered reply thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackDetail {
    #[serde(flatten)]
    pub feedback: Feedback,
    pub replies: Vec<FeedbackReply>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            FeedbackStatus::Open,
            FeedbackStatus::InProgress,
            FeedbackStatus::Resolved,
            FeedbackStatus::Closed,
        ] {
            assert_eq!(FeedbackStatus::from_str(status.as_str()).unwrap(), status);
        }
        assert!(FeedbackStatus::from_str("In Progress").is_err());
        assert!(FeedbackStatus::from_str("open").is_err());
    }

    #[test]
    fn triage_moves_forward_only() {
        use FeedbackStatus::*;

        assert!(Open.can_transition_to(InProgress));
        assert!(Open.can_transition_to(Closed));
        assert!(InProgress.can_transition_to(Resolved));
        assert!(Resolved.can_transition_to(Closed));

        assert!(!InProgress.can_transition_to(Open));
        assert!(!Closed.can_transition_to(Resolved));
        assert!(!Resolved.can_transition_to(Open));
    }

    #[test]
    fn triage_allows_restating_current_stage() {
        assert!(FeedbackStatus::Resolved.can_transition_to(FeedbackStatus::Resolved));
    }

    #[test]
    fn detail_embeds_replies_array() {
        let detail = FeedbackDetail {
            feedback: Feedback {
                feedback_id: 5,
                customer_id: 2,
                rating: Some(4),
                content: "outage on my street".to_string(),
                status: FeedbackStatus::Open,
                created_at: Utc::now(),
            },
            replies: vec![],
        };
        let json = serde_json::to_string(&detail).unwrap();
        assert!(json.contains("\"feedbackId\":5"));
        assert!(json.contains("\"replies\":[]"));
        assert!(json.contains("\"status\":\"Open\""));
    }

    #[test]
    fn reply_carries_author_role() {
        let reply = FeedbackReply {
            reply_id: 1,
            feedback_id: 5,
            profile_id: 30,
            replier_name: "ops.duty".to_string(),
            replier_role: Role::Staff,
            content: "crew dispatched".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&reply).unwrap();
        assert!(json.contains("\"replierRole\":\"Staff\""));
        assert!(json.contains("\"replierName\":\"ops.duty\""));
    }
}
