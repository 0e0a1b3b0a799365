//! HTTP middleware components.

pub mod auth;
pub mod logging;
pub mod metrics;
pub mod rbac;
pub mod trace_id;

pub use auth::require_auth;
pub use metrics::{init_metrics, metrics_handler, metrics_middleware};
pub use rbac::{require_admin, require_operator};
#[allow(unused_imports)] // Re-exports for downstream use
pub use trace_id::{trace_id, RequestId, REQUEST_ID_HEADER};
