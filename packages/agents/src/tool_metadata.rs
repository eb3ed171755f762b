// ABOUTME: Tool-metadata storage layer using SQLite
// ABOUTME: CRUD for per-agent tool metadata, always scoped to a single agent

use chrono::Utc;
use serde_json::Value;
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::debug;

use super::types::{AgentToolMetadata, ToolMetadataCreateInput, ToolMetadataUpdateInput};
use toolkit_core::generate_id;
use toolkit_storage::{StorageError, StorageResult};

pub(crate) const RESOURCE: &str = "Agent tool metadata";

pub struct ToolMetadataStorage {
    pool: SqlitePool,
}

impl ToolMetadataStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all tool metadata for an agent
    pub async fn list_by_agent(&self, agent_id: &str) -> StorageResult<Vec<AgentToolMetadata>> {
        let mut conn = self.pool.acquire().await.map_err(StorageError::Sqlx)?;
        fetch_for_agents(&mut conn, &[agent_id]).await
    }

    /// Get a single entry by ID, regardless of owning agent
    pub async fn get(&self, metadata_id: &str) -> StorageResult<AgentToolMetadata> {
        let mut conn = self.pool.acquire().await.map_err(StorageError::Sqlx)?;
        fetch_one(&mut conn, metadata_id).await
    }

    /// Get a single entry that must belong to `agent_id`
    pub async fn get_for_agent(
        &self,
        agent_id: &str,
        metadata_id: &str,
    ) -> StorageResult<AgentToolMetadata> {
        let metadata = self.get(metadata_id).await?;
        if metadata.agent_id != agent_id {
            return Err(StorageError::not_found(RESOURCE, metadata_id));
        }
        Ok(metadata)
    }

    pub async fn create(
        &self,
        agent_id: &str,
        user_id: &str,
        input: ToolMetadataCreateInput,
    ) -> StorageResult<AgentToolMetadata> {
        let mut conn = self.pool.acquire().await.map_err(StorageError::Sqlx)?;
        insert(&mut conn, agent_id, user_id, &input).await
    }

    pub async fn update(
        &self,
        agent_id: &str,
        metadata_id: &str,
        input: ToolMetadataUpdateInput,
    ) -> StorageResult<AgentToolMetadata> {
        let mut conn = self.pool.acquire().await.map_err(StorageError::Sqlx)?;
        update(&mut conn, agent_id, metadata_id, &input).await
    }

    pub async fn delete(&self, agent_id: &str, metadata_id: &str) -> StorageResult<()> {
        let mut conn = self.pool.acquire().await.map_err(StorageError::Sqlx)?;
        delete(&mut conn, agent_id, metadata_id).await
    }
}

/// Fetch the tool metadata of every agent in `agent_ids`, oldest first
pub(crate) async fn fetch_for_agents(
    conn: &mut SqliteConnection,
    agent_ids: &[&str],
) -> StorageResult<Vec<AgentToolMetadata>> {
    if agent_ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; agent_ids.len()].join(", ");
    let query_str = format!(
        "SELECT * FROM agent_tool_metadata WHERE agent_id IN ({}) ORDER BY created_at, id",
        placeholders
    );

    let mut query = sqlx::query(&query_str);
    for agent_id in agent_ids {
        query = query.bind(*agent_id);
    }

    let rows = query
        .fetch_all(&mut *conn)
        .await
        .map_err(StorageError::Sqlx)?;

    rows.iter().map(row_to_tool_metadata).collect()
}

pub(crate) async fn fetch_one(
    conn: &mut SqliteConnection,
    metadata_id: &str,
) -> StorageResult<AgentToolMetadata> {
    debug!("Fetching tool metadata: {}", metadata_id);

    let row = sqlx::query("SELECT * FROM agent_tool_metadata WHERE id = ?")
        .bind(metadata_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| StorageError::from_missing_row(e, RESOURCE, metadata_id))?;

    row_to_tool_metadata(&row)
}

pub(crate) async fn insert(
    conn: &mut SqliteConnection,
    agent_id: &str,
    user_id: &str,
    input: &ToolMetadataCreateInput,
) -> StorageResult<AgentToolMetadata> {
    let metadata_id = generate_id("atm");
    let now = Utc::now();
    let artifacts = input
        .artifacts
        .clone()
        .unwrap_or_else(|| Value::Array(Vec::new()));

    debug!(
        "Creating tool metadata: {} (agent: {}, tool: {})",
        metadata_id, agent_id, input.tool_name
    );

    sqlx::query(
        r#"
        INSERT INTO agent_tool_metadata (
            id, agent_id, user_id, tool_name, artifacts, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&metadata_id)
    .bind(agent_id)
    .bind(user_id)
    .bind(&input.tool_name)
    .bind(serde_json::to_string(&artifacts)?)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await
    .map_err(|e| StorageError::from_unique_violation(e, &input.tool_name))?;

    fetch_one(conn, &metadata_id).await
}

pub(crate) async fn update(
    conn: &mut SqliteConnection,
    agent_id: &str,
    metadata_id: &str,
    input: &ToolMetadataUpdateInput,
) -> StorageResult<AgentToolMetadata> {
    debug!("Updating tool metadata: {} (agent: {})", metadata_id, agent_id);

    let mut updates = vec!["updated_at = ?"];
    if input.tool_name.is_some() {
        updates.push("tool_name = ?");
    }
    if input.artifacts.is_some() {
        updates.push("artifacts = ?");
    }

    let query_str = format!(
        "UPDATE agent_tool_metadata SET {} WHERE id = ? AND agent_id = ?",
        updates.join(", ")
    );

    let mut query = sqlx::query(&query_str).bind(Utc::now());
    if let Some(tool_name) = &input.tool_name {
        query = query.bind(tool_name);
    }
    if let Some(artifacts) = &input.artifacts {
        query = query.bind(serde_json::to_string(artifacts)?);
    }

    let result = query
        .bind(metadata_id)
        .bind(agent_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| match &input.tool_name {
            Some(tool_name) => StorageError::from_unique_violation(e, tool_name),
            None => StorageError::Sqlx(e),
        })?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found(RESOURCE, metadata_id));
    }

    fetch_one(conn, metadata_id).await
}

pub(crate) async fn delete(
    conn: &mut SqliteConnection,
    agent_id: &str,
    metadata_id: &str,
) -> StorageResult<()> {
    debug!("Deleting tool metadata: {} (agent: {})", metadata_id, agent_id);

    let result = sqlx::query("DELETE FROM agent_tool_metadata WHERE id = ? AND agent_id = ?")
        .bind(metadata_id)
        .bind(agent_id)
        .execute(&mut *conn)
        .await
        .map_err(StorageError::Sqlx)?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found(RESOURCE, metadata_id));
    }

    Ok(())
}

fn row_to_tool_metadata(row: &sqlx::sqlite::SqliteRow) -> StorageResult<AgentToolMetadata> {
    let artifacts: String = row.try_get("artifacts").map_err(StorageError::Sqlx)?;

    Ok(AgentToolMetadata {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        agent_id: row.try_get("agent_id").map_err(StorageError::Sqlx)?,
        user_id: row.try_get("user_id").map_err(StorageError::Sqlx)?,
        tool_name: row.try_get("tool_name").map_err(StorageError::Sqlx)?,
        artifacts: serde_json::from_str(&artifacts)?,
        created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
        updated_at: row.try_get("updated_at").map_err(StorageError::Sqlx)?,
    })
}
