// ABOUTME: HTTP API layer for the Toolkit agent service
// ABOUTME: Routers, handlers, shared state, request validation, and error mapping

use axum::{
    routing::{get, put},
    Router,
};

use toolkit_core::API_PREFIX;

pub mod agents_handlers;
pub mod auth;
pub mod db;
pub mod default_agent_handlers;
pub mod error;
pub mod health;
pub mod response;
pub mod tool_metadata_handlers;
pub mod validation;

pub use db::DbState;
pub use error::{ApiError, ApiResult};
pub use validation::AgentValidator;

/// Creates the agents API router (nested under /v1/agents)
pub fn create_agents_router() -> Router<DbState> {
    Router::new()
        .route(
            "/",
            get(agents_handlers::list_agents).post(agents_handlers::create_agent),
        )
        .route(
            "/{agent_id}",
            get(agents_handlers::get_agent)
                .put(agents_handlers::update_agent)
                .delete(agents_handlers::delete_agent),
        )
        .route(
            "/{agent_id}/tool-metadata",
            get(tool_metadata_handlers::list_tool_metadata)
                .post(tool_metadata_handlers::create_tool_metadata),
        )
        .route(
            "/{agent_id}/tool-metadata/{agent_tool_metadata_id}",
            put(tool_metadata_handlers::update_tool_metadata)
                .delete(tool_metadata_handlers::delete_tool_metadata),
        )
}

/// Creates the default agent router. Clients call it with a trailing slash.
pub fn create_default_agent_router() -> Router<DbState> {
    Router::new()
        .route("/default_agent/", get(default_agent_handlers::get_default_agent))
        .route("/default_agent", get(default_agent_handlers::get_default_agent))
}

/// Creates the full application router with state attached
pub fn create_router(state: DbState) -> Router {
    let v1 = Router::new()
        .nest("/agents", create_agents_router())
        .merge(create_default_agent_router());

    Router::new()
        .route("/health", get(health::health_check))
        .nest(API_PREFIX, v1)
        .with_state(state)
}
