//! Customer domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account status of a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomerStatus {
    Active,
    Inactive,
    Suspended,
}

impl CustomerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::Active => "Active",
            CustomerStatus::Inactive => "Inactive",
            CustomerStatus::Suspended => "Suspended",
        }
    }
}

impl FromStr for CustomerStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(CustomerStatus::Active),
            "Inactive" => Ok(CustomerStatus::Inactive),
            "Suspended" => Ok(CustomerStatus::Suspended),
            _ => Err(format!("Invalid customer status: {}", s)),
        }
    }
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Customer joined with its owning profile, the shape listing and detail
/// endpoints return.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAccount {
    pub customer_id: i64,
    pub profile_id: i64,
    pub name: String,
    pub email: String,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub status: CustomerStatus,
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            CustomerStatus::Active,
            CustomerStatus::Inactive,
            CustomerStatus::Suspended,
        ] {
            assert_eq!(CustomerStatus::from_str(status.as_str()).unwrap(), status);
        }
        assert!(CustomerStatus::from_str("Dormant").is_err());
    }

    #[test]
    fn account_serializes_camel_case() {
        let account = CustomerAccount {
            customer_id: 4,
            profile_id: 9,
            name: "Mai Tran".to_string(),
            email: "mai@example.com".to_string(),
            contact: Some("555-0102".to_string()),
            address: None,
            status: CustomerStatus::Active,
            date_of_birth: NaiveDate::from_ymd_opt(1991, 4, 12),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&account).unwrap();
        assert!(json.contains("\"customerId\":4"));
        assert!(json.contains("\"dateOfBirth\":\"1991-04-12\""));
        assert!(json.contains("\"status\":\"Active\""));
    }
}
