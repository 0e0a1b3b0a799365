//! Bill entities (database row mappings).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::FromRow;
use std::str::FromStr;

use domain::models::{Bill, BillStatus, BillWithCustomer};

/// Database row mapping for the electric_bills table.
#[derive(Debug, Clone, FromRow)]
pub struct BillEntity {
    pub bill_id: i64,
    pub customer_id: i64,
    pub tariff_id: i64,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub due_date: NaiveDate,
    pub usage_kwh: Decimal,
    pub amount: Decimal,
    pub status: String,
}

impl From<BillEntity> for Bill {
    fn from(entity: BillEntity) -> Self {
        Self {
            bill_id: entity.bill_id,
            customer_id: entity.customer_id,
            tariff_id: entity.tariff_id,
            period_start: entity.period_start,
            period_end: entity.period_end,
            due_date: entity.due_date,
            usage_kwh: entity.usage_kwh,
            amount: entity.amount,
            status: BillStatus::from_str(&entity.status).unwrap_or(BillStatus::Unpaid), // Default fallback
        }
    }
}

/// Bill row joined with customer profile identity for operator listings.
#[derive(Debug, Clone, FromRow)]
pub struct BillWithCustomerEntity {
    pub bill_id: i64,
    pub customer_id: i64,
    pub tariff_id: i64,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub due_date: NaiveDate,
    pub usage_kwh: Decimal,
    pub amount: Decimal,
    pub status: String,
    pub customer_profile_id: i64,
    pub customer_name: String,
    pub customer_email: String,
}

impl From<BillWithCustomerEntity> for BillWithCustomer {
    fn from(entity: BillWithCustomerEntity) -> Self {
        Self {
            bill: Bill {
                bill_id: entity.bill_id,
                customer_id: entity.customer_id,
                tariff_id: entity.tariff_id,
                period_start: entity.period_start,
                period_end: entity.period_end,
                due_date: entity.due_date,
                usage_kwh: entity.usage_kwh,
                amount: entity.amount,
                status: BillStatus::from_str(&entity.status).unwrap_or(BillStatus::Unpaid), // Default fallback
            },
            customer_profile_id: entity.customer_profile_id,
            customer_name: entity.customer_name,
            customer_email: entity.customer_email,
        }
    }
}
