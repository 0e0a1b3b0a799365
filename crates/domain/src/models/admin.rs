//! Admin domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Admin joined with its owning profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAccount {
    pub admin_id: i64,
    pub profile_id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}
