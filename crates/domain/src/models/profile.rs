//! Profile domain models.
//!
//! A profile is the root identity record behind every account. Role rows
//! (customer, staff, admin) hang off it 1:1.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::actor::Role;

/// Root identity record for an account of any role.
///
/// The password hash never leaves the persistence layer; this model is what
/// API responses serialize.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub profile_id: i64,
    pub name: String,
    pub email: String,
    pub profile_type: Role,
    pub created_at: DateTime<Utc>,
    pub updated_by_profile_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_camel_case_fields() {
        let profile = Profile {
            profile_id: 10,
            name: "lena.v".to_string(),
            email: "lena@example.com".to_string(),
            profile_type: Role::Staff,
            created_at: Utc::now(),
            updated_by_profile_id: None,
        };
        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("\"profileId\":10"));
        assert!(json.contains("\"profileType\":\"Staff\""));
        assert!(json.contains("\"updatedByProfileId\":null"));
    }
}
