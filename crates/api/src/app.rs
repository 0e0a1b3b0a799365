use axum::{middleware, routing::get, Router};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, require_admin, require_auth, require_operator, trace_id,
};
use crate::routes::{
    admins, audit_logs, auth, bills, customers, feedback, health, profiles, staff, tariffs,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        pool,
        config: config.clone(),
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler))
        .nest("/api/auth", auth::router());

    // Admin-only groups. Auth runs first (outermost layer = runs first),
    // the role check reads the actor context it installs.
    let admin_routes = Router::new()
        .nest("/api/admins", admins::router())
        .nest("/api/auditlogs", audit_logs::router())
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Staff/admin group. Mutating profile handlers tighten this to admin
    // themselves.
    let operator_routes = Router::new()
        .nest("/api/profiles", profiles::router())
        .route_layer(middleware::from_fn(require_operator))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Authenticated groups where access depends on the row, not just the
    // role; handlers check ownership against the actor context.
    let authed_routes = Router::new()
        .nest("/api/customers", customers::router())
        .nest("/api/staffs", staff::router())
        .nest("/api/tariffs", tariffs::router())
        .nest("/api/bills", bills::router())
        .nest("/api/feedbacks", feedback::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .merge(operator_routes)
        .merge(authed_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware)) // Prometheus metrics
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id)) // Request ID and logging
        .layer(cors)
        .with_state(state)
}
