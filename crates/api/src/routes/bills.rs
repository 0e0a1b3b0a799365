//! Electric bill routes.
//!
//! Staff and admins issue and maintain bills; customers read their own
//! through `/my`. Amounts are computed server-side from usage and the
//! tariff rate, and recomputed only when an update touches usage or
//! tariff.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use domain::models::{Bill, BillStatus, BillWithCustomer};
use domain::services::{audit_events, compute_amount, recompute_source, ChangedFields, RecomputeSource};
use persistence::repositories::{
    AuditLogRepository, BillChanges, BillRepository, CustomerRepository, NewBill, TariffRepository,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Actor;

/// Create bills router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_bills).post(create_bill))
        .route("/my", get(list_own_bills))
        .route(
            "/:bill_id",
            get(get_bill).put(update_bill).delete(delete_bill),
        )
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBillRequest {
    pub customer_id: i64,
    pub tariff_id: i64,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub due_date: NaiveDate,
    pub usage_kwh: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBillRequest {
    pub tariff_id: Option<i64>,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub usage_kwh: Option<Decimal>,
    pub status: Option<String>,
}

/// List all bills with customer identity attached.
///
/// GET /api/bills (staff, admin)
#[axum::debug_handler]
pub async fn list_bills(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<Vec<BillWithCustomer>>, ApiError> {
    if !actor.0.role.is_operator() {
        return Err(ApiError::Forbidden(
            "Insufficient permissions for this resource".to_string(),
        ));
    }

    let repo = BillRepository::new(state.pool.clone());
    let bills = repo.list_with_customers().await?;
    Ok(Json(bills))
}

/// List the caller's own bills. Customers without a customer row get an
/// empty list, not an error.
///
/// GET /api/bills/my (customer)
#[axum::debug_handler]
pub async fn list_own_bills(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<Vec<Bill>>, ApiError> {
    if !actor.0.is_customer() {
        return Err(ApiError::Forbidden(
            "Insufficient permissions for this resource".to_string(),
        ));
    }

    let Some(customer_id) = resolve_customer_id(&state, &actor).await? else {
        return Ok(Json(Vec::new()));
    };

    let repo = BillRepository::new(state.pool.clone());
    let bills = repo.list_for_customer(customer_id).await?;
    Ok(Json(bills))
}

/// Get a bill by id. Customers may only read bills they own.
///
/// GET /api/bills/:bill_id
#[axum::debug_handler]
pub async fn get_bill(
    State(state): State<AppState>,
    actor: Actor,
    Path(bill_id): Path<i64>,
) -> Result<Json<Bill>, ApiError> {
    let repo = BillRepository::new(state.pool.clone());
    let bill = repo
        .find_by_id(bill_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Bill not found".to_string()))?;

    if actor.0.is_customer() {
        let customer_id = resolve_customer_id(&state, &actor).await?;
        if customer_id != Some(bill.customer_id) {
            return Err(ApiError::Forbidden(
                "You do not have access to this bill".to_string(),
            ));
        }
    }

    Ok(Json(bill))
}

/// Issue a bill. The amount is usage times the tariff's current rate;
/// the tariff must exist and be active.
///
/// POST /api/bills (staff, admin)
#[axum::debug_handler]
pub async fn create_bill(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<CreateBillRequest>,
) -> Result<(StatusCode, Json<Bill>), ApiError> {
    if !actor.0.role.is_operator() {
        return Err(ApiError::Forbidden(
            "Insufficient permissions for this resource".to_string(),
        ));
    }
    if request.usage_kwh < Decimal::ZERO {
        return Err(ApiError::Validation(
            "Usage must be non-negative".to_string(),
        ));
    }

    let customers = CustomerRepository::new(state.pool.clone());
    if !customers.exists(request.customer_id).await? {
        return Err(ApiError::NotFound("Customer not found".to_string()));
    }

    let tariffs = TariffRepository::new(state.pool.clone());
    let (rate, is_active) = tariffs
        .rate_info(request.tariff_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tariff not found".to_string()))?;
    if !is_active {
        return Err(ApiError::Validation("Tariff is not active".to_string()));
    }

    let amount = compute_amount(request.usage_kwh, rate);

    let repo = BillRepository::new(state.pool.clone());
    let bill = repo
        .create(
            &actor.0,
            &NewBill {
                customer_id: request.customer_id,
                tariff_id: request.tariff_id,
                period_start: request.period_start,
                period_end: request.period_end,
                due_date: request.due_date,
                usage_kwh: request.usage_kwh,
                amount,
            },
        )
        .await?;

    AuditLogRepository::new(state.pool.clone())
        .insert_async(audit_events::bill_created(bill.bill_id, actor.0.profile_id));

    tracing::info!(
        bill_id = bill.bill_id,
        customer_id = bill.customer_id,
        amount = %bill.amount,
        "Bill created"
    );

    Ok((StatusCode::CREATED, Json(bill)))
}

/// Update a bill. The amount is recomputed only when the update supplies
/// usage or a tariff; a usage-only change reuses the bill's existing
/// tariff rate even if that tariff has since been deactivated.
///
/// PUT /api/bills/:bill_id (staff, admin)
#[axum::debug_handler]
pub async fn update_bill(
    State(state): State<AppState>,
    actor: Actor,
    Path(bill_id): Path<i64>,
    Json(request): Json<UpdateBillRequest>,
) -> Result<Json<Bill>, ApiError> {
    if !actor.0.role.is_operator() {
        return Err(ApiError::Forbidden(
            "Insufficient permissions for this resource".to_string(),
        ));
    }
    if let Some(usage) = request.usage_kwh {
        if usage < Decimal::ZERO {
            return Err(ApiError::Validation(
                "Usage must be non-negative".to_string(),
            ));
        }
    }

    let repo = BillRepository::new(state.pool.clone());
    let existing = repo
        .find_by_id(bill_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Bill not found".to_string()))?;

    let status = match &request.status {
        Some(raw) => {
            let next: BillStatus = raw
                .parse()
                .map_err(|_| ApiError::Validation("Invalid bill status".to_string()))?;
            if !existing.status.can_transition_to(next) {
                return Err(ApiError::Validation(format!(
                    "Cannot transition bill from {} to {}",
                    existing.status, next
                )));
            }
            Some(next)
        }
        None => None,
    };

    let amount = match recompute_source(request.tariff_id, request.usage_kwh) {
        RecomputeSource::None => None,
        RecomputeSource::ExistingTariff => {
            let tariffs = TariffRepository::new(state.pool.clone());
            let (rate, _) = tariffs.rate_info(existing.tariff_id).await?.ok_or_else(|| {
                ApiError::Internal("Bill references missing tariff".to_string())
            })?;
            let usage = request.usage_kwh.unwrap_or(existing.usage_kwh);
            Some(compute_amount(usage, rate))
        }
        RecomputeSource::NewTariff(tariff_id) => {
            let tariffs = TariffRepository::new(state.pool.clone());
            let (rate, is_active) = tariffs
                .rate_info(tariff_id)
                .await?
                .ok_or_else(|| ApiError::NotFound("Tariff not found".to_string()))?;
            if !is_active {
                return Err(ApiError::Validation("Tariff is not active".to_string()));
            }
            let usage = request.usage_kwh.unwrap_or(existing.usage_kwh);
            Some(compute_amount(usage, rate))
        }
    };

    let mut fields = ChangedFields::new();
    fields.track("tariffId", request.tariff_id.is_some());
    fields.track("periodStart", request.period_start.is_some());
    fields.track("periodEnd", request.period_end.is_some());
    fields.track("dueDate", request.due_date.is_some());
    fields.track("usageKwh", request.usage_kwh.is_some());
    fields.track("status", status.is_some());

    let changes = BillChanges {
        tariff_id: request.tariff_id,
        period_start: request.period_start,
        period_end: request.period_end,
        due_date: request.due_date,
        usage_kwh: request.usage_kwh,
        amount,
        status,
    };

    let bill = repo
        .update(&actor.0, bill_id, &changes)
        .await?
        .ok_or_else(|| ApiError::NotFound("Bill not found".to_string()))?;

    if !fields.is_empty() {
        AuditLogRepository::new(state.pool.clone()).insert_async(audit_events::bill_updated(
            bill_id,
            &fields,
            actor.0.profile_id,
        ));
    }

    tracing::info!(bill_id, amount = %bill.amount, "Bill updated");

    Ok(Json(bill))
}

/// Delete a bill.
///
/// DELETE /api/bills/:bill_id (admin only)
#[axum::debug_handler]
pub async fn delete_bill(
    State(state): State<AppState>,
    actor: Actor,
    Path(bill_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !actor.0.is_admin() {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    let repo = BillRepository::new(state.pool.clone());
    let deleted = repo
        .delete(&actor.0, bill_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Bill not found".to_string()))?;

    AuditLogRepository::new(state.pool.clone()).insert_async(audit_events::bill_deleted(
        bill_id,
        deleted.status,
        actor.0.profile_id,
    ));

    tracing::info!(bill_id, "Bill deleted");

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
    use std::str::FromStr;

    #[test]
    fn create_request_requires_every_field() {
        let json = r#"{
            "customerId": 1,
            "tariffId": 2,
            "periodStart": "2024-01-01",
            "periodEnd": "2024-01-31",
            "dueDate": "2024-02-15"
        }"#;
        assert!(serde_json::from_str::<CreateBillRequest>(json).is_err());
    }

    #[test]
    fn create_request_parses_decimal_usage() {
        let json = r#"{
            "customerId": 1,
            "tariffId": 2,
            "periodStart": "2024-01-01",
            "periodEnd": "2024-01-31",
            "dueDate": "2024-02-15",
            "usageKwh": "120.5"
        }"#;

        let request: CreateBillRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.usage_kwh, Decimal::from_str("120.5").unwrap());
    }

    #[test]
    fn update_request_supports_status_only() {
        let json = r#"{"status": "PAID"}"#;
        let request: UpdateBillRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.status.as_deref(), Some("PAID"));
        assert!(request.usage_kwh.is_none());
        assert!(request.tariff_id.is_none());
    }
}
