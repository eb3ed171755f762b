// ABOUTME: Tool-metadata store boundary used by reconciliation
// ABOUTME: Trait plus the transaction-scoped SQLite implementation

use async_trait::async_trait;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use tracing::debug;

use super::tool_metadata;
use super::types::{AgentToolMetadata, ToolMetadataCreateInput, ToolMetadataUpdateInput};
use toolkit_storage::{StorageError, StorageResult};

/// Write operations the reconciler needs from a tool-metadata store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ToolMetadataStore: Send {
    async fn create_tool_metadata(
        &mut self,
        agent_id: &str,
        user_id: &str,
        input: ToolMetadataCreateInput,
    ) -> StorageResult<AgentToolMetadata>;

    async fn update_tool_metadata(
        &mut self,
        agent_id: &str,
        metadata_id: &str,
        input: ToolMetadataUpdateInput,
    ) -> StorageResult<AgentToolMetadata>;

    async fn delete_tool_metadata(&mut self, agent_id: &str, metadata_id: &str)
        -> StorageResult<()>;
}

/// A database transaction spanning one agent write.
///
/// Dropping it without calling [`AgentTransaction::commit`] rolls back.
pub struct AgentTransaction {
    tx: Transaction<'static, Sqlite>,
}

impl AgentTransaction {
    pub async fn begin(pool: &SqlitePool) -> StorageResult<Self> {
        debug!("Beginning agent transaction");
        let tx = pool.begin().await.map_err(StorageError::Sqlx)?;
        Ok(Self { tx })
    }

    pub fn connection(&mut self) -> &mut SqliteConnection {
        &mut self.tx
    }

    pub async fn commit(self) -> StorageResult<()> {
        self.tx.commit().await.map_err(StorageError::Sqlx)
    }
}

#[async_trait]
impl ToolMetadataStore for AgentTransaction {
    async fn create_tool_metadata(
        &mut self,
        agent_id: &str,
        user_id: &str,
        input: ToolMetadataCreateInput,
    ) -> StorageResult<AgentToolMetadata> {
        tool_metadata::insert(self.connection(), agent_id, user_id, &input).await
    }

    async fn update_tool_metadata(
        &mut self,
        agent_id: &str,
        metadata_id: &str,
        input: ToolMetadataUpdateInput,
    ) -> StorageResult<AgentToolMetadata> {
        tool_metadata::update(self.connection(), agent_id, metadata_id, &input).await
    }

    async fn delete_tool_metadata(
        &mut self,
        agent_id: &str,
        metadata_id: &str,
    ) -> StorageResult<()> {
        tool_metadata::delete(self.connection(), agent_id, metadata_id).await
    }
}

#[async_trait]
impl ToolMetadataStore for tool_metadata::ToolMetadataStorage {
    async fn create_tool_metadata(
        &mut self,
        agent_id: &str,
        user_id: &str,
        input: ToolMetadataCreateInput,
    ) -> StorageResult<AgentToolMetadata> {
        self.create(agent_id, user_id, input).await
    }

    async fn update_tool_metadata(
        &mut self,
        agent_id: &str,
        metadata_id: &str,
        input: ToolMetadataUpdateInput,
    ) -> StorageResult<AgentToolMetadata> {
        self.update(agent_id, metadata_id, input).await
    }

    async fn delete_tool_metadata(
        &mut self,
        agent_id: &str,
        metadata_id: &str,
    ) -> StorageResult<()> {
        self.delete(agent_id, metadata_id).await
    }
}
