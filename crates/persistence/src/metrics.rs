//! Database metrics collection.
//!
//! Query timings and pool gauges for the Prometheus exporter. Repositories
//! time each statement with [`QueryTimer`]; the server records pool health
//! on an interval.

use metrics::{gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Record connection pool gauges.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();
    let active = size.saturating_sub(idle);

    gauge!("database_connections_active").set(active as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_total").set(size as f64);
}

/// Times one named query and reports it as a histogram sample.
///
/// Usage:
/// ```ignore
/// let timer = QueryTimer::new("find_bill_by_id");
/// let result = sqlx::query_as::<_, BillEntity>(...).fetch_optional(&pool).await;
/// timer.record();
/// result
/// ```
///
/// Dropping the timer without calling [`record`](QueryTimer::record) reports
/// nothing.
pub struct QueryTimer {
    query_name: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query_name: &'static str) -> Self {
        Self {
            query_name,
            start: Instant::now(),
        }
    }

    /// Record the elapsed duration under `database_query_duration_seconds`.
    pub fn record(self) {
        histogram!(
            "database_query_duration_seconds",
            "query" => self.query_name
        )
        .record(self.start.elapsed().as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_timer_keeps_its_name() {
        let timer = QueryTimer::new("find_bill_by_id");
        assert_eq!(timer.query_name, "find_bill_by_id");
    }

    #[test]
    fn record_without_a_recorder_is_a_no_op() {
        // No global recorder is installed in unit tests; recording must not
        // panic.
        let timer = QueryTimer::new("list_tariffs");
        timer.record();
    }
}
