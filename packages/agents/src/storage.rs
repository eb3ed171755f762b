// ABOUTME: Agent storage layer using SQLite
// ABOUTME: CRUD for agents, with tool metadata loaded alongside and reconciled on update

use std::collections::HashMap;

use chrono::Utc;
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::debug;

use super::reconcile::{reconcile_tool_metadata, ReconcileOutcome};
use super::store::AgentTransaction;
use super::tool_metadata;
use super::types::{Agent, AgentCreateInput, AgentUpdateInput, DEFAULT_TEMPERATURE};
use toolkit_core::generate_id;
use toolkit_storage::{StorageError, StorageResult};

pub(crate) const RESOURCE: &str = "Agent";

pub struct AgentStorage {
    pool: SqlitePool,
}

impl AgentStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all agents
    pub async fn list_agents(&self) -> StorageResult<Vec<Agent>> {
        let (agents, _) = self.list_agents_paginated(None, None).await?;
        Ok(agents)
    }

    /// List agents with pagination, oldest first
    pub async fn list_agents_paginated(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> StorageResult<(Vec<Agent>, i64)> {
        debug!("Fetching agents (limit: {:?}, offset: {:?})", limit, offset);

        let mut conn = self.pool.acquire().await.map_err(StorageError::Sqlx)?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM agents")
            .fetch_one(&mut *conn)
            .await
            .map_err(StorageError::Sqlx)?;

        let mut query = String::from("SELECT * FROM agents ORDER BY created_at, id");
        match (limit, offset) {
            (Some(lim), Some(off)) => query.push_str(&format!(" LIMIT {} OFFSET {}", lim, off)),
            (Some(lim), None) => query.push_str(&format!(" LIMIT {}", lim)),
            // SQLite requires a LIMIT before OFFSET
            (None, Some(off)) => query.push_str(&format!(" LIMIT -1 OFFSET {}", off)),
            (None, None) => {}
        }

        let rows = sqlx::query(&query)
            .fetch_all(&mut *conn)
            .await
            .map_err(StorageError::Sqlx)?;

        let mut agents = rows
            .iter()
            .map(row_to_agent)
            .collect::<Result<Vec<_>, _>>()?;

        attach_tool_metadata(&mut conn, &mut agents).await?;

        Ok((agents, count))
    }

    /// Get a single agent by ID
    pub async fn get_agent(&self, agent_id: &str) -> StorageResult<Agent> {
        let mut conn = self.pool.acquire().await.map_err(StorageError::Sqlx)?;
        fetch_agent(&mut conn, agent_id).await
    }

    /// Get a single agent by ID, `None` when it does not exist
    pub async fn find_agent(&self, agent_id: &str) -> StorageResult<Option<Agent>> {
        match self.get_agent(agent_id).await {
            Ok(agent) => Ok(Some(agent)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create an agent together with its initial tool metadata
    pub async fn create_agent(
        &self,
        user_id: &str,
        input: AgentCreateInput,
    ) -> StorageResult<Agent> {
        let agent_id = generate_id("agent");
        let now = Utc::now();

        debug!("Creating agent: {} (name: {})", agent_id, input.name);

        let mut tx = AgentTransaction::begin(&self.pool).await?;

        sqlx::query(
            r#"
            INSERT INTO agents (
                id, user_id, name, version, description, preamble, temperature,
                model, deployment, tools, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&agent_id)
        .bind(user_id)
        .bind(&input.name)
        .bind(input.version.unwrap_or(1))
        .bind(&input.description)
        .bind(&input.preamble)
        .bind(input.temperature.unwrap_or(DEFAULT_TEMPERATURE))
        .bind(&input.model)
        .bind(&input.deployment)
        .bind(serde_json::to_string(&input.tools)?)
        .bind(now)
        .bind(now)
        .execute(tx.connection())
        .await
        .map_err(StorageError::Sqlx)?;

        if let Some(requested) = &input.tools_metadata {
            let created = fetch_agent(tx.connection(), &agent_id).await?;
            reconcile_tool_metadata(&mut tx, &created, user_id, requested).await?;
        }

        tx.commit().await?;

        self.get_agent(&agent_id).await
    }

    /// Update an agent.
    ///
    /// When `input.tools_metadata` is present the stored tool metadata is
    /// reconciled to it before the agent's own columns change. The snapshot
    /// being reconciled is read inside the same transaction, and `updated_at`
    /// moves whenever anything was applied. The agent is re-read after commit.
    pub async fn update_agent(
        &self,
        agent_id: &str,
        user_id: &str,
        input: AgentUpdateInput,
    ) -> StorageResult<Agent> {
        let (agent, _) = self.update_agent_with_outcome(agent_id, user_id, input).await?;
        Ok(agent)
    }

    /// Same as [`AgentStorage::update_agent`], also reporting the reconciliation result
    pub async fn update_agent_with_outcome(
        &self,
        agent_id: &str,
        user_id: &str,
        input: AgentUpdateInput,
    ) -> StorageResult<(Agent, Option<ReconcileOutcome>)> {
        debug!("Updating agent: {}", agent_id);

        let mut tx = AgentTransaction::begin(&self.pool).await?;
        let existing = fetch_agent(tx.connection(), agent_id).await?;

        let outcome = match &input.tools_metadata {
            Some(requested) => {
                Some(reconcile_tool_metadata(&mut tx, &existing, user_id, requested).await?)
            }
            None => None,
        };

        // Reconciliation alone still counts as a change to the agent
        if input.has_field_updates() || outcome.is_some() {
            update_agent_columns(tx.connection(), agent_id, &input).await?;
        }

        tx.commit().await?;

        let agent = self.get_agent(agent_id).await?;
        Ok((agent, outcome))
    }

    /// Delete an agent; its tool metadata is removed by cascade
    pub async fn delete_agent(&self, agent_id: &str) -> StorageResult<()> {
        debug!("Deleting agent: {}", agent_id);

        let result = sqlx::query("DELETE FROM agents WHERE id = ?")
            .bind(agent_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found(RESOURCE, agent_id));
        }

        Ok(())
    }
}

async fn fetch_agent(conn: &mut SqliteConnection, agent_id: &str) -> StorageResult<Agent> {
    debug!("Fetching agent: {}", agent_id);

    let row = sqlx::query("SELECT * FROM agents WHERE id = ?")
        .bind(agent_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| StorageError::from_missing_row(e, RESOURCE, agent_id))?;

    let mut agent = row_to_agent(&row)?;
    agent.tools_metadata = tool_metadata::fetch_for_agents(conn, &[agent_id]).await?;

    Ok(agent)
}

async fn attach_tool_metadata(
    conn: &mut SqliteConnection,
    agents: &mut [Agent],
) -> StorageResult<()> {
    let agent_ids: Vec<&str> = agents.iter().map(|agent| agent.id.as_str()).collect();
    let metadata = tool_metadata::fetch_for_agents(conn, &agent_ids).await?;

    let mut by_agent: HashMap<String, Vec<_>> = HashMap::new();
    for entry in metadata {
        by_agent.entry(entry.agent_id.clone()).or_default().push(entry);
    }

    for agent in agents.iter_mut() {
        agent.tools_metadata = by_agent.remove(&agent.id).unwrap_or_default();
    }

    Ok(())
}

async fn update_agent_columns(
    conn: &mut SqliteConnection,
    agent_id: &str,
    input: &AgentUpdateInput,
) -> StorageResult<()> {
    // Build update query dynamically based on provided fields
    let mut updates = vec!["updated_at = ?"];

    if input.name.is_some() {
        updates.push("name = ?");
    }
    if input.version.is_some() {
        updates.push("version = ?");
    }
    if input.description.is_some() {
        updates.push("description = ?");
    }
    if input.preamble.is_some() {
        updates.push("preamble = ?");
    }
    if input.temperature.is_some() {
        updates.push("temperature = ?");
    }
    if input.model.is_some() {
        updates.push("model = ?");
    }
    if input.deployment.is_some() {
        updates.push("deployment = ?");
    }
    if input.tools.is_some() {
        updates.push("tools = ?");
    }

    let query_str = format!("UPDATE agents SET {} WHERE id = ?", updates.join(", "));
    let mut query = sqlx::query(&query_str).bind(Utc::now());

    // Bind parameters in the same order
    if let Some(name) = &input.name {
        query = query.bind(name);
    }
    if let Some(version) = input.version {
        query = query.bind(version);
    }
    if let Some(description) = &input.description {
        query = query.bind(description);
    }
    if let Some(preamble) = &input.preamble {
        query = query.bind(preamble);
    }
    if let Some(temperature) = input.temperature {
        query = query.bind(temperature);
    }
    if let Some(model) = &input.model {
        query = query.bind(model);
    }
    if let Some(deployment) = &input.deployment {
        query = query.bind(deployment);
    }
    if let Some(tools) = &input.tools {
        query = query.bind(serde_json::to_string(tools)?);
    }

    let result = query
        .bind(agent_id)
        .execute(&mut *conn)
        .await
        .map_err(StorageError::Sqlx)?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found(RESOURCE, agent_id));
    }

    Ok(())
}

fn row_to_agent(row: &sqlx::sqlite::SqliteRow) -> StorageResult<Agent> {
    let tools: String = row.try_get("tools").map_err(StorageError::Sqlx)?;

    Ok(Agent {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        user_id: row.try_get("user_id").map_err(StorageError::Sqlx)?,
        name: row.try_get("name").map_err(StorageError::Sqlx)?,
        version: row.try_get("version").map_err(StorageError::Sqlx)?,
        description: row.try_get("description").map_err(StorageError::Sqlx)?,
        preamble: row.try_get("preamble").map_err(StorageError::Sqlx)?,
        temperature: row.try_get("temperature").map_err(StorageError::Sqlx)?,
        model: row.try_get("model").map_err(StorageError::Sqlx)?,
        deployment: row.try_get("deployment").map_err(StorageError::Sqlx)?,
        tools: serde_json::from_str(&tools)?,
        tools_metadata: Vec::new(),
        created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
        updated_at: row.try_get("updated_at").map_err(StorageError::Sqlx)?,
    })
}
