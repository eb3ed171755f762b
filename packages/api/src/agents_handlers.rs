// ABOUTME: HTTP request handlers for agent operations
// ABOUTME: Create, list, fetch, update (with tool-metadata reconciliation), and delete agents

use axum::{
    extract::{Path, Query, State},
    response::Response,
    Json,
};
use tracing::info;

use crate::auth::{CurrentUser, MaybeUser};
use crate::db::DbState;
use crate::error::ApiResult;
use crate::response::{created, ok, Deleted};
use toolkit_agents::{AgentCreateInput, AgentPublic, AgentUpdateInput};
use toolkit_core::pagination::{PaginatedResponse, PaginationParams};
use toolkit_telemetry::{MetricsAgent, MetricsMessageType, RequestContext};

/// Create an agent and its initial tool metadata
pub async fn create_agent(
    State(db): State<DbState>,
    user: CurrentUser,
    Json(input): Json<AgentCreateInput>,
) -> ApiResult<Response> {
    info!("Creating agent '{}' for user {}", input.name, user.id);

    let ctx = RequestContext::new()
        .with_event_type(MetricsMessageType::AssistantCreated)
        .with_user(Some(user.id.clone()));

    db.validator.validate_create(&input)?;

    let agent = db.agent_storage.create_agent(&user.id, input).await?;

    let ctx = ctx
        .with_agent(agent.id.clone())
        .with_metrics_agent(MetricsAgent::from(&agent));
    db.metrics.record(&ctx).await;

    Ok(created(AgentPublic::from(agent)))
}

/// List agents, oldest first
pub async fn list_agents(
    State(db): State<DbState>,
    Query(pagination): Query<PaginationParams>,
) -> ApiResult<Response> {
    info!(
        "Listing agents (offset: {}, limit: {})",
        pagination.offset(),
        pagination.limit()
    );

    let (agents, total) = db
        .agent_storage
        .list_agents_paginated(Some(pagination.limit()), Some(pagination.offset()))
        .await?;

    let response = PaginatedResponse::new(agents, &pagination, total).map(AgentPublic::from);
    Ok(ok(response))
}

/// Get a single agent, including its owner
pub async fn get_agent(
    State(db): State<DbState>,
    MaybeUser(user_id): MaybeUser,
    Path(agent_id): Path<String>,
) -> ApiResult<Response> {
    info!("Getting agent: {}", agent_id);

    let ctx = RequestContext::new()
        .with_event_type(MetricsMessageType::AssistantAccessed)
        .with_user(user_id);

    let agent = db.agent_storage.get_agent(&agent_id).await?;

    let ctx = ctx
        .with_agent(agent.id.clone())
        .with_metrics_agent(MetricsAgent::from(&agent));
    db.metrics.record(&ctx).await;

    Ok(ok(agent))
}

/// Update an agent. A `tools_metadata` list in the body replaces the agent's
/// stored tool metadata, matched by tool name.
pub async fn update_agent(
    State(db): State<DbState>,
    user: CurrentUser,
    Path(agent_id): Path<String>,
    Json(input): Json<AgentUpdateInput>,
) -> ApiResult<Response> {
    info!("Updating agent {} for user {}", agent_id, user.id);

    let ctx = RequestContext::new()
        .with_event_type(MetricsMessageType::AssistantUpdated)
        .with_user(Some(user.id.clone()));

    db.validator.validate_update(&input)?;

    let (agent, outcome) = db
        .agent_storage
        .update_agent_with_outcome(&agent_id, &user.id, input)
        .await?;

    if let Some(outcome) = outcome {
        info!(
            "Reconciled tool metadata for agent {}: created {:?}, updated {:?}, deleted {:?}",
            agent.id, outcome.created, outcome.updated, outcome.deleted
        );
    }

    let ctx = ctx
        .with_agent(agent.id.clone())
        .with_metrics_agent(MetricsAgent::from(&agent));
    db.metrics.record(&ctx).await;

    Ok(ok(AgentPublic::from(agent)))
}

/// Delete an agent and, by cascade, its tool metadata
pub async fn delete_agent(
    State(db): State<DbState>,
    MaybeUser(user_id): MaybeUser,
    Path(agent_id): Path<String>,
) -> ApiResult<Response> {
    info!("Deleting agent: {}", agent_id);

    let agent = db.agent_storage.get_agent(&agent_id).await?;
    let ctx = RequestContext::new()
        .with_event_type(MetricsMessageType::AssistantDeleted)
        .with_user(user_id)
        .with_agent(agent.id.clone())
        .with_metrics_agent(MetricsAgent::from(&agent));

    db.agent_storage.delete_agent(&agent_id).await?;
    db.metrics.record(&ctx).await;

    Ok(ok(Deleted::default()))
}
