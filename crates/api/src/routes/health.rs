//! Health and probe endpoints.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::time::Instant;

use crate::app::AppState;

/// Report returned by the full health check.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    pub database: DatabaseStatus,
}

/// Database reachability, with round-trip latency when up.
#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DatabaseStatus {
    Up { latency_ms: u64 },
    Down,
}

impl DatabaseStatus {
    fn is_up(&self) -> bool {
        matches!(self, DatabaseStatus::Up { .. })
    }
}

/// Minimal body for liveness/readiness probes.
#[derive(Debug, Serialize)]
pub struct ProbeResponse {
    pub status: &'static str,
}

async fn probe_database(state: &AppState) -> DatabaseStatus {
    let start = Instant::now();
    match persistence::db::ping(&state.pool).await {
        Ok(()) => DatabaseStatus::Up {
            latency_ms: start.elapsed().as_millis() as u64,
        },
        Err(_) => DatabaseStatus::Down,
    }
}

/// Full health check: pings the database and reports latency.
///
/// Responds 503 with the same report body when the database is unreachable.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = probe_database(&state).await;
    let healthy = database.is_up();

    let report = HealthReport {
        status: if healthy { "healthy" } else { "unhealthy" },
        version: env!("CARGO_PKG_VERSION"),
        database,
    };

    let code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(report))
}

/// Liveness probe: the process is up.
pub async fn live() -> Json<ProbeResponse> {
    Json(ProbeResponse { status: "alive" })
}

/// Readiness probe: the service can reach its database.
pub async fn ready(State(state): State<AppState>) -> Result<Json<ProbeResponse>, StatusCode> {
    if probe_database(&state).await.is_up() {
        Ok(Json(ProbeResponse { status: "ready" }))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_up_serializes_with_latency() {
        let status = DatabaseStatus::Up { latency_ms: 4 };
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, r#"{"state":"up","latency_ms":4}"#);
        assert!(status.is_up());
    }

    #[test]
    fn database_down_serializes_without_latency() {
        let status = DatabaseStatus::Down;
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, r#"{"state":"down"}"#);
        assert!(!status.is_up());
    }

    #[test]
    fn report_carries_package_version() {
        let report = HealthReport {
            status: "healthy",
            version: env!("CARGO_PKG_VERSION"),
            database: DatabaseStatus::Up { latency_ms: 2 },
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"status\":\"healthy\""));
        assert!(json.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn probe_response_is_plain() {
        let json = serde_json::to_string(&ProbeResponse { status: "alive" }).unwrap();
        assert_eq!(json, r#"{"status":"alive"}"#);
    }
}
