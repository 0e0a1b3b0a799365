//! Tariff routes.
//!
//! Every role can read tariffs; customers only see active ones in the
//! listing. Staff and admins manage rates, deletion is admin-only.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use domain::models::Tariff;
use domain::services::{audit_events, ChangedFields};
use persistence::repositories::{AuditLogRepository, TariffChanges, TariffRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Actor;

/// Create tariffs router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tariffs).post(create_tariff))
        .route(
            "/:tariff_id",
            get(get_tariff).put(update_tariff).delete(delete_tariff),
        )
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTariffsQuery {
    pub include_inactive: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTariffRequest {
    pub effective_from: NaiveDate,
    pub rate_per_kwh: Decimal,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTariffRequest {
    pub effective_from: Option<NaiveDate>,
    pub rate_per_kwh: Option<Decimal>,
    pub is_active: Option<bool>,
}

/// List tariffs. Customers always get the active subset; staff and
/// admins may opt into inactive rows with `includeInactive=true`.
///
/// GET /api/tariffs
#[axum::debug_handler]
pub async fn list_tariffs(
    State(state): State<AppState>,
    actor: Actor,
    Query(query): Query<ListTariffsQuery>,
) -> Result<Json<Vec<Tariff>>, ApiError> {
    let include_inactive = query.include_inactive.unwrap_or(false) && actor.0.role.is_operator();

    let repo = TariffRepository::new(state.pool.clone());
    let tariffs = repo.list(include_inactive).await?;
    Ok(Json(tariffs))
}

/// Get a tariff by id. Deactivated tariffs stay fetchable so existing
/// bills keep resolving their rate.
///
/// GET /api/tariffs/:tariff_id
#[axum::debug_handler]
pub async fn get_tariff(
    State(state): State<AppState>,
    Path(tariff_id): Path<i64>,
) -> Result<Json<Tariff>, ApiError> {
    let repo = TariffRepository::new(state.pool.clone());
    let tariff = repo
        .find_by_id(tariff_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tariff not found".to_string()))?;
    Ok(Json(tariff))
}

/// Create a tariff.
///
/// POST /api/tariffs (staff, admin)
#[axum::debug_handler]
pub async fn create_tariff(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<CreateTariffRequest>,
) -> Result<(StatusCode, Json<Tariff>), ApiError> {
    if !actor.0.role.is_operator() {
        return Err(ApiError::Forbidden(
            "Insufficient permissions for this resource".to_string(),
        ));
    }
    if request.rate_per_kwh <= Decimal::ZERO {
        return Err(ApiError::Validation(
            "Rate per kWh must be positive".to_string(),
        ));
    }

    let is_active = request.is_active.unwrap_or(true);

    let repo = TariffRepository::new(state.pool.clone());
    let tariff = repo
        .create(
            request.effective_from,
            request.rate_per_kwh,
            is_active,
            actor.0.profile_id,
        )
        .await?;

    AuditLogRepository::new(state.pool.clone()).insert_async(audit_events::tariff_created(
        tariff.tariff_id,
        tariff.effective_from,
        tariff.rate_per_kwh,
        tariff.is_active,
        actor.0.profile_id,
    ));

    tracing::info!(
        tariff_id = tariff.tariff_id,
        rate = %tariff.rate_per_kwh,
        "Tariff created"
    );

    Ok((StatusCode::CREATED, Json(tariff)))
}

/// Update a tariff. Changing the rate never touches existing bills.
///
/// PUT /api/tariffs/:tariff_id (staff, admin)
#[axum::debug_handler]
pub async fn update_tariff(
    State(state): State<AppState>,
    actor: Actor,
    Path(tariff_id): Path<i64>,
    Json(request): Json<UpdateTariffRequest>,
) -> Result<Json<Tariff>, ApiError> {
    if !actor.0.role.is_operator() {
        return Err(ApiError::Forbidden(
            "Insufficient permissions for this resource".to_string(),
        ));
    }
    if let Some(rate) = request.rate_per_kwh {
        if rate <= Decimal::ZERO {
            return Err(ApiError::Validation(
                "Rate per kWh must be positive".to_string(),
            ));
        }
    }

    let mut fields = ChangedFields::new();
    fields.track("effectiveFrom", request.effective_from.is_some());
    fields.track("ratePerKwh", request.rate_per_kwh.is_some());
    fields.track("isActive", request.is_active.is_some());

    let changes = TariffChanges {
        effective_from: request.effective_from,
        rate_per_kwh: request.rate_per_kwh,
        is_active: request.is_active,
    };

    let repo = TariffRepository::new(state.pool.clone());
    let tariff = repo
        .update(tariff_id, &changes)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tariff not found".to_string()))?;

    if !fields.is_empty() {
        AuditLogRepository::new(state.pool.clone()).insert_async(audit_events::tariff_updated(
            tariff_id,
            &fields,
            actor.0.profile_id,
        ));
    }

    tracing::info!(tariff_id, "Tariff updated");

    Ok(Json(tariff))
}

/// Delete a tariff. Tariffs referenced by bills are protected by
/// foreign keys and report a dependency conflict.
///
/// DELETE /api/tariffs/:tariff_id (admin only)
#[axum::debug_handler]
pub async fn delete_tariff(
    State(state): State<AppState>,
    actor: Actor,
    Path(tariff_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !actor.0.is_admin() {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    let repo = TariffRepository::new(state.pool.clone());
    let deleted = repo.delete(tariff_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Tariff not found".to_string()));
    }

    AuditLogRepository::new(state.pool.clone())
        .insert_async(audit_events::tariff_deleted(tariff_id, actor.0.profile_id));

    tracing::info!(tariff_id, "Tariff deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn create_request_parses_decimal_rate() {
        let json = r#"{"effectiveFrom": "2024-01-01", "ratePerKwh": "0.55"}"#;
        let request: CreateTariffRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.rate_per_kwh, Decimal::from_str("0.55").unwrap());
        assert!(request.is_active.is_none());
    }

    #[test]
    fn update_request_allows_single_field() {
        let json = r#"{"isActive": false}"#;
        let request: UpdateTariffRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.is_active, Some(false));
        assert!(request.rate_per_kwh.is_none());
    }

    #[test]
    fn list_query_defaults_to_active_only() {
        let query: ListTariffsQuery = serde_json::from_str("{}").unwrap();
        assert!(query.include_inactive.is_none());
    }
}
