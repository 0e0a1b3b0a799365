//! Tariff domain models.
//!
//! A tariff is a versioned electricity rate. Bills store the computed amount
//! at creation/update time; editing a tariff never retroactively changes
//! existing bills.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tariff {
    pub tariff_id: i64,
    pub created_by_profile_id: Option<i64>,
    pub effective_from: NaiveDate,
    pub rate_per_kwh: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn rate_serializes_as_decimal_string() {
        let tariff = Tariff {
            tariff_id: 1,
            created_by_profile_id: Some(2),
            effective_from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            rate_per_kwh: Decimal::from_str("0.5000").unwrap(),
            is_active: true,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&tariff).unwrap();
        assert!(json.contains("\"ratePerKwh\":\"0.5000\""));
        assert!(json.contains("\"effectiveFrom\":\"2024-01-01\""));
    }
}
