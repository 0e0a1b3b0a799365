//! Staff domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Staff joined with its owning profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffAccount {
    pub staff_id: i64,
    pub profile_id: i64,
    pub name: String,
    pub email: String,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}
