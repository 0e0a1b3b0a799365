//! Electric bill domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a bill. Stored and serialized in uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BillStatus {
    Unpaid,
    Paid,
    Overdue,
    Cancelled,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Unpaid => "UNPAID",
            BillStatus::Paid => "PAID",
            BillStatus::Overdue => "OVERDUE",
            BillStatus::Cancelled => "CANCELLED",
        }
    }

    /// Explicit transitions only: UNPAID may become PAID or OVERDUE, and
    /// UNPAID or OVERDUE may be CANCELLED. Re-stating the current status is
    /// always allowed so partial updates can echo it back.
    pub fn can_transition_to(&self, next: BillStatus) -> bool {
        if *self == next {
            return true;
        }
        matches!(
            (self, next),
            (BillStatus::Unpaid, BillStatus::Paid)
                | (BillStatus::Unpaid, BillStatus::Overdue)
                | (BillStatus::Unpaid, BillStatus::Cancelled)
                | (BillStatus::Overdue, BillStatus::Cancelled)
        )
    }
}

impl FromStr for BillStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UNPAID" => Ok(BillStatus::Unpaid),
            "PAID" => Ok(BillStatus::Paid),
            "OVERDUE" => Ok(BillStatus::Overdue),
            "CANCELLED" => Ok(BillStatus::Cancelled),
            _ => Err(format!("Invalid bill status: {}", s)),
        }
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One billing-period charge against a customer.
///
/// `amount` is always `usage_kwh` times the rate of the tariff referenced at
/// the last computation, rounded to 2 decimals; it is stored, never derived
/// live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub bill_id: i64,
    pub customer_id: i64,
    pub tariff_id: i64,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub due_date: NaiveDate,
    pub usage_kwh: Decimal,
    pub amount: Decimal,
    pub status: BillStatus,
}

/// Bill joined with the owning customer's profile, the shape staff-facing
/// listings return.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillWithCustomer {
    #[serde(flatten)]
    pub bill: Bill,
    pub customer_profile_id: i64,
    pub customer_name: String,
    pub customer_email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            BillStatus::Unpaid,
            BillStatus::Paid,
            BillStatus::Overdue,
            BillStatus::Cancelled,
        ] {
            assert_eq!(BillStatus::from_str(status.as_str()).unwrap(), status);
        }
        assert!(BillStatus::from_str("unpaid").is_err(), "statuses are uppercase");
        assert!(BillStatus::from_str("VOID").is_err());
    }

    #[test]
    fn unpaid_may_become_paid_or_overdue_or_cancelled() {
        assert!(BillStatus::Unpaid.can_transition_to(BillStatus::Paid));
        assert!(BillStatus::Unpaid.can_transition_to(BillStatus::Overdue));
        assert!(BillStatus::Unpaid.can_transition_to(BillStatus::Cancelled));
    }

    #[test]
    fn overdue_may_only_be_cancelled() {
        assert!(BillStatus::Overdue.can_transition_to(BillStatus::Cancelled));
        assert!(!BillStatus::Overdue.can_transition_to(BillStatus::Paid));
        assert!(!BillStatus::Overdue.can_transition_to(BillStatus::Unpaid));
    }

    #[test]
    fn terminal_statuses_do_not_move() {
        assert!(!BillStatus::Paid.can_transition_to(BillStatus::Unpaid));
        assert!(!BillStatus::Paid.can_transition_to(BillStatus::Cancelled));
        assert!(!BillStatus::Cancelled.can_transition_to(BillStatus::Unpaid));
        assert!(!BillStatus::Cancelled.can_transition_to(BillStatus::Paid));
    }

    #[test]
    fn restating_current_status_allowed() {
        for status in [
            BillStatus::Unpaid,
            BillStatus::Paid,
            BillStatus::Overdue,
            BillStatus::Cancelled,
        ] {
            assert!(status.can_transition_to(status));
        }
    }

    #[test]
    fn bill_with_customer_flattens_bill_fields() {
        use std::str::FromStr as _;

        let enriched = BillWithCustomer {
            bill: Bill {
                bill_id: 11,
                customer_id: 3,
                tariff_id: 1,
                period_start: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                period_end: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
                due_date: NaiveDate::from_ymd_opt(2024, 4, 15).unwrap(),
                usage_kwh: Decimal::from_str("120.00").unwrap(),
                amount: Decimal::from_str("60.00").unwrap(),
                status: BillStatus::Unpaid,
            },
            customer_profile_id: 9,
            customer_name: "Mai Tran".to_string(),
            customer_email: "mai@example.com".to_string(),
        };

        let json = serde_json::to_string(&enriched).unwrap();
        assert!(json.contains("\"billId\":11"));
        assert!(json.contains("\"customerProfileId\":9"));
        assert!(json.contains("\"status\":\"UNPAID\""));
    }
}
