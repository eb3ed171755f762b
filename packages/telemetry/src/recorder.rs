// ABOUTME: Metrics recorder
// ABOUTME: Emits request contexts as structured log events and optionally persists them

use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::context::RequestContext;

/// Sink for finished request contexts
#[derive(Clone, Default)]
pub struct MetricsRecorder {
    pool: Option<SqlitePool>,
}

impl MetricsRecorder {
    /// Recorder that persists events to `metrics_events` when `persist` is set
    pub fn new(pool: SqlitePool, persist: bool) -> Self {
        Self {
            pool: persist.then_some(pool),
        }
    }

    /// Recorder that only logs
    pub fn disabled() -> Self {
        Self { pool: None }
    }

    pub fn is_persistent(&self) -> bool {
        self.pool.is_some()
    }

    /// Record the request's event. Failures are logged, never returned.
    pub async fn record(&self, ctx: &RequestContext) {
        let Some(event) = ctx.to_event() else {
            return;
        };

        info!(
            target: "metrics",
            request_id = %event.request_id,
            event_type = event.event_type.as_str(),
            user_id = event.user_id.as_deref().unwrap_or("-"),
            agent_id = event.agent_id.as_deref().unwrap_or("-"),
            "metrics event"
        );

        if let Some(pool) = &self.pool {
            if let Err(e) = event.save_to_db(pool).await {
                warn!(
                    request_id = %event.request_id,
                    error = %e,
                    "Failed to persist metrics event"
                );
            }
        }
    }
}
