// ABOUTME: Handler for the built-in default agent
// ABOUTME: Records an access event against the default agent snapshot

use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::debug;

use crate::auth::MaybeUser;
use crate::db::DbState;
use toolkit_telemetry::{MetricsAgent, MetricsMessageType, RequestContext};

/// Used by clients to log use of the default agent
pub async fn get_default_agent(
    State(db): State<DbState>,
    MaybeUser(user_id): MaybeUser,
) -> Json<Value> {
    debug!("Default agent accessed");

    let ctx = RequestContext::new()
        .with_event_type(MetricsMessageType::AssistantAccessed)
        .with_user(user_id)
        .with_metrics_agent(MetricsAgent::default_agent());
    db.metrics.record(&ctx).await;

    Json(json!({ "message": "OK" }))
}
