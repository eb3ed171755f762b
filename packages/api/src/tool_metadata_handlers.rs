// ABOUTME: HTTP request handlers for an agent's tool metadata
// ABOUTME: Every route is scoped to the agent named in the path

use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use tracing::info;

use crate::auth::{CurrentUser, MaybeUser};
use crate::db::DbState;
use crate::error::ApiResult;
use crate::response::{created, ok, Deleted};
use crate::validation::{validate_tool_metadata_create, validate_tool_metadata_update};
use toolkit_agents::{
    AgentToolMetadata, AgentToolMetadataPublic, ToolMetadataCreateInput, ToolMetadataUpdateInput,
};
use toolkit_telemetry::{MetricsMessageType, MetricsToolMetadata, RequestContext};

/// Tool-metadata writes are reported as updates of the owning agent
fn update_context(user_id: Option<String>, metadata: &AgentToolMetadata) -> RequestContext {
    RequestContext::new()
        .with_event_type(MetricsMessageType::AssistantUpdated)
        .with_user(user_id)
        .with_agent(metadata.agent_id.clone())
        .with_agent_tool_metadata(MetricsToolMetadata::from(metadata))
}

pub async fn list_tool_metadata(
    State(db): State<DbState>,
    Path(agent_id): Path<String>,
) -> ApiResult<Response> {
    info!("Listing tool metadata for agent: {}", agent_id);

    let metadata: Vec<AgentToolMetadataPublic> = db
        .tool_metadata_storage
        .list_by_agent(&agent_id)
        .await?
        .into_iter()
        .map(AgentToolMetadataPublic::from)
        .collect();

    Ok(ok(metadata))
}

pub async fn create_tool_metadata(
    State(db): State<DbState>,
    user: CurrentUser,
    Path(agent_id): Path<String>,
    Json(input): Json<ToolMetadataCreateInput>,
) -> ApiResult<Response> {
    info!(
        "Creating tool metadata '{}' for agent {}",
        input.tool_name, agent_id
    );

    validate_tool_metadata_create(&input)?;
    let agent = db.agent_storage.get_agent(&agent_id).await?;

    let metadata = db
        .tool_metadata_storage
        .create(&agent.id, &user.id, input)
        .await?;

    db.metrics
        .record(&update_context(Some(user.id), &metadata))
        .await;

    Ok(created(AgentToolMetadataPublic::from(metadata)))
}

pub async fn update_tool_metadata(
    State(db): State<DbState>,
    MaybeUser(user_id): MaybeUser,
    Path((agent_id, metadata_id)): Path<(String, String)>,
    Json(input): Json<ToolMetadataUpdateInput>,
) -> ApiResult<Response> {
    info!("Updating tool metadata {} for agent {}", metadata_id, agent_id);

    validate_tool_metadata_update(&input)?;

    let metadata = db
        .tool_metadata_storage
        .update(&agent_id, &metadata_id, input)
        .await?;

    db.metrics.record(&update_context(user_id, &metadata)).await;

    Ok(ok(AgentToolMetadataPublic::from(metadata)))
}

pub async fn delete_tool_metadata(
    State(db): State<DbState>,
    MaybeUser(user_id): MaybeUser,
    Path((agent_id, metadata_id)): Path<(String, String)>,
) -> ApiResult<Response> {
    info!("Deleting tool metadata {} for agent {}", metadata_id, agent_id);

    let metadata = db
        .tool_metadata_storage
        .get_for_agent(&agent_id, &metadata_id)
        .await?;
    db.tool_metadata_storage
        .delete(&agent_id, &metadata_id)
        .await?;

    db.metrics.record(&update_context(user_id, &metadata)).await;

    Ok(ok(Deleted::default()))
}
