// ABOUTME: Agent and tool-metadata persistence for the Toolkit agent service
// ABOUTME: Storage layers plus reconciliation of an agent's tool metadata

pub mod metrics;
pub mod reconcile;
pub mod storage;
pub mod store;
pub mod tool_metadata;
pub mod types;

pub use reconcile::{reconcile_tool_metadata, ReconcileOutcome};
pub use storage::AgentStorage;
pub use store::{AgentTransaction, ToolMetadataStore};
pub use tool_metadata::ToolMetadataStorage;
pub use types::{
    Agent, AgentCreateInput, AgentPublic, AgentToolMetadata, AgentToolMetadataPublic,
    AgentUpdateInput, ToolMetadataCreateInput, ToolMetadataInput, ToolMetadataUpdateInput,
    DEFAULT_TEMPERATURE,
};
