// ABOUTME: Tool-metadata reconciliation for agent updates
// ABOUTME: Converges an agent's stored tool metadata to a requested list, keyed by tool name

use std::collections::HashSet;

use tracing::{debug, warn};

use super::store::ToolMetadataStore;
use super::types::{Agent, ToolMetadataInput};
use toolkit_storage::{StorageError, StorageResult};

/// Tool names touched by a reconciliation, per operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub deleted: Vec<String>,
}

impl ReconcileOutcome {
    pub fn is_update_only(&self) -> bool {
        self.created.is_empty() && self.deleted.is_empty()
    }
}

/// Apply the creates, updates, and deletes that make `agent`'s stored tool
/// metadata match `requested`.
///
/// Stale entries (names absent from `requested`) are deleted first. Each
/// requested entry then updates the stored entry with the same name, or the
/// entry named by its own `id`; anything else is created. An `id` that points
/// at a stored entry whose name is also requested is rejected with `Conflict`
/// before anything is written. The first failing operation aborts the run. `agent` is a snapshot and is not modified, so
/// callers re-read the agent afterwards.
pub async fn reconcile_tool_metadata<S>(
    store: &mut S,
    agent: &Agent,
    user_id: &str,
    requested: &[ToolMetadataInput],
) -> StorageResult<ReconcileOutcome>
where
    S: ToolMetadataStore + ?Sized,
{
    let requested_names: HashSet<&str> = requested
        .iter()
        .map(|entry| entry.tool_name.as_str())
        .collect();

    check_claimed_ids(agent, requested, &requested_names)?;

    let mut outcome = ReconcileOutcome::default();

    for existing in &agent.tools_metadata {
        if requested_names.contains(existing.tool_name.as_str()) {
            continue;
        }

        debug!(
            "Deleting stale tool metadata '{}' ({}) from agent {}",
            existing.tool_name, existing.id, agent.id
        );
        store
            .delete_tool_metadata(&agent.id, &existing.id)
            .await
            .map_err(|e| with_tool_name(e, &existing.tool_name))?;
        outcome.deleted.push(existing.tool_name.clone());
    }

    for entry in requested {
        let target_id = agent
            .tool_metadata_by_name(&entry.tool_name)
            .map(|existing| existing.id.as_str())
            .or(entry.id.as_deref());

        match target_id {
            Some(metadata_id) => {
                store
                    .update_tool_metadata(&agent.id, metadata_id, entry.to_update_input())
                    .await
                    .map_err(|e| with_tool_name(e, &entry.tool_name))?;
                outcome.updated.push(entry.tool_name.clone());
            }
            None => {
                store
                    .create_tool_metadata(&agent.id, user_id, entry.to_create_input())
                    .await
                    .map_err(|e| with_tool_name(e, &entry.tool_name))?;
                outcome.created.push(entry.tool_name.clone());
            }
        }
    }

    debug!(
        "Reconciled tool metadata for agent {}: {} created, {} updated, {} deleted",
        agent.id,
        outcome.created.len(),
        outcome.updated.len(),
        outcome.deleted.len()
    );

    Ok(outcome)
}

/// An entry updating by `id` would rename a stored entry that another
/// requested entry keeps by name
fn check_claimed_ids(
    agent: &Agent,
    requested: &[ToolMetadataInput],
    requested_names: &HashSet<&str>,
) -> StorageResult<()> {
    for entry in requested {
        if agent.tool_metadata_by_name(&entry.tool_name).is_some() {
            continue;
        }
        let Some(id) = entry.id.as_deref() else {
            continue;
        };

        let claimed = agent
            .tools_metadata
            .iter()
            .find(|existing| existing.id == id)
            .filter(|existing| requested_names.contains(existing.tool_name.as_str()));

        if let Some(existing) = claimed {
            warn!(
                "Tool metadata {} is requested both as '{}' and '{}'",
                id, existing.tool_name, entry.tool_name
            );
            return Err(StorageError::Conflict(entry.tool_name.clone()));
        }
    }

    Ok(())
}

/// Attach the failing tool name to errors that don't already identify the entry
fn with_tool_name(err: StorageError, tool_name: &str) -> StorageError {
    warn!("Tool metadata reconciliation failed for '{}': {}", tool_name, err);

    match err {
        StorageError::Conflict(_) | StorageError::NotFound { .. } => err,
        other => StorageError::Database(format!("Tool name {}: {}", tool_name, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MockToolMetadataStore;
    use crate::types::{AgentToolMetadata, ToolMetadataUpdateInput};
    use chrono::Utc;
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn metadata(id: &str, tool_name: &str) -> AgentToolMetadata {
        AgentToolMetadata {
            id: id.to_string(),
            agent_id: "agent-1".to_string(),
            user_id: "user-1".to_string(),
            tool_name: tool_name.to_string(),
            artifacts: Value::Array(Vec::new()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn agent_with(tools_metadata: Vec<AgentToolMetadata>) -> Agent {
        Agent {
            id: "agent-1".to_string(),
            user_id: "user-1".to_string(),
            name: "Researcher".to_string(),
            version: 1,
            description: None,
            preamble: None,
            temperature: 0.3,
            model: "command-r-plus".to_string(),
            deployment: "Cohere Platform".to_string(),
            tools: vec!["search".to_string(), "calc".to_string()],
            tools_metadata,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn echo_update(
        agent_id: &str,
        metadata_id: &str,
        input: ToolMetadataUpdateInput,
    ) -> StorageResult<AgentToolMetadata> {
        let mut updated = metadata(metadata_id, &input.tool_name.unwrap_or_default());
        updated.agent_id = agent_id.to_string();
        Ok(updated)
    }

    #[tokio::test]
    async fn test_same_names_only_update() {
        let agent = agent_with(vec![metadata("atm-1", "search"), metadata("atm-2", "calc")]);
        let requested = vec![
            ToolMetadataInput::new("search").with_artifacts(json!([{"url": "a"}])),
            ToolMetadataInput::new("calc"),
        ];

        let mut store = MockToolMetadataStore::new();
        store.expect_create_tool_metadata().times(0);
        store.expect_delete_tool_metadata().times(0);
        store
            .expect_update_tool_metadata()
            .times(2)
            .returning(|agent_id, metadata_id, input| echo_update(agent_id, metadata_id, input));

        let outcome = reconcile_tool_metadata(&mut store, &agent, "user-1", &requested)
            .await
            .unwrap();

        assert!(outcome.is_update_only());
        assert_eq!(outcome.updated, vec!["search", "calc"]);
    }

    #[tokio::test]
    async fn test_empty_request_deletes_everything() {
        let agent = agent_with(vec![metadata("atm-1", "search"), metadata("atm-2", "calc")]);

        let mut store = MockToolMetadataStore::new();
        store.expect_create_tool_metadata().times(0);
        store.expect_update_tool_metadata().times(0);
        store
            .expect_delete_tool_metadata()
            .times(2)
            .returning(|_, _| Ok(()));

        let outcome = reconcile_tool_metadata(&mut store, &agent, "user-1", &[])
            .await
            .unwrap();

        assert_eq!(outcome.deleted, vec!["search", "calc"]);
        assert!(outcome.created.is_empty());
    }

    #[tokio::test]
    async fn test_empty_agent_creates_everything() {
        let agent = agent_with(vec![]);
        let requested = vec![ToolMetadataInput::new("search"), ToolMetadataInput::new("calc")];

        let mut store = MockToolMetadataStore::new();
        store.expect_update_tool_metadata().times(0);
        store.expect_delete_tool_metadata().times(0);
        store
            .expect_create_tool_metadata()
            .times(2)
            .returning(|_, _, input| Ok(metadata("atm-new", &input.tool_name)));

        let outcome = reconcile_tool_metadata(&mut store, &agent, "user-1", &requested)
            .await
            .unwrap();

        assert_eq!(outcome.created, vec!["search", "calc"]);
    }

    #[tokio::test]
    async fn test_existing_name_resolves_identifier_by_name() {
        // Request entry carries no id; the stored entry's id must be used
        let agent = agent_with(vec![metadata("atm-1", "search")]);
        let requested = vec![ToolMetadataInput::new("search"), ToolMetadataInput::new("calc")];

        let mut store = MockToolMetadataStore::new();
        store.expect_delete_tool_metadata().times(0);
        store
            .expect_update_tool_metadata()
            .with(
                eq("agent-1"),
                eq("atm-1"),
                eq(ToolMetadataUpdateInput {
                    tool_name: Some("search".to_string()),
                    artifacts: None,
                }),
            )
            .times(1)
            .returning(|agent_id, metadata_id, input| echo_update(agent_id, metadata_id, input));
        store
            .expect_create_tool_metadata()
            .withf(|agent_id, user_id, input| {
                agent_id == "agent-1" && user_id == "user-1" && input.tool_name == "calc"
            })
            .times(1)
            .returning(|_, _, input| Ok(metadata("atm-2", &input.tool_name)));

        let outcome = reconcile_tool_metadata(&mut store, &agent, "user-1", &requested)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ReconcileOutcome {
                created: vec!["calc".to_string()],
                updated: vec!["search".to_string()],
                deleted: vec![],
            }
        );
    }

    #[tokio::test]
    async fn test_entry_with_unknown_name_and_id_updates_by_id() {
        let agent = agent_with(vec![]);
        let requested = vec![ToolMetadataInput::new("calc").with_id("atm-9")];

        let mut store = MockToolMetadataStore::new();
        store.expect_create_tool_metadata().times(0);
        store
            .expect_update_tool_metadata()
            .withf(|_, metadata_id, _| metadata_id == "atm-9")
            .times(1)
            .returning(|_, metadata_id, _| {
                Err(StorageError::not_found("Agent tool metadata", metadata_id))
            });

        let err = reconcile_tool_metadata(&mut store, &agent, "user-1", &requested)
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_id_claimed_by_another_requested_name_conflicts() {
        let agent = agent_with(vec![metadata("atm-1", "search")]);
        let requested = vec![
            ToolMetadataInput::new("search"),
            ToolMetadataInput::new("web").with_id("atm-1"),
        ];

        let mut store = MockToolMetadataStore::new();
        store.expect_create_tool_metadata().times(0);
        store.expect_update_tool_metadata().times(0);
        store.expect_delete_tool_metadata().times(0);

        let err = reconcile_tool_metadata(&mut store, &agent, "user-1", &requested)
            .await
            .unwrap_err();

        match err {
            StorageError::Conflict(name) => assert_eq!(name, "web"),
            other => panic!("Expected Conflict error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_first_failure_stops_processing() {
        let agent = agent_with(vec![]);
        let requested = vec![
            ToolMetadataInput::new("search"),
            ToolMetadataInput::new("calc"),
        ];

        let mut store = MockToolMetadataStore::new();
        store
            .expect_create_tool_metadata()
            .times(1)
            .returning(|_, _, input| Err(StorageError::Conflict(input.tool_name)));

        let err = reconcile_tool_metadata(&mut store, &agent, "user-1", &requested)
            .await
            .unwrap_err();

        match err {
            StorageError::Conflict(name) => assert_eq!(name, "search"),
            other => panic!("Expected Conflict error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generic_failure_is_annotated_with_tool_name() {
        let agent = agent_with(vec![]);
        let requested = vec![ToolMetadataInput::new("search")];

        let mut store = MockToolMetadataStore::new();
        store
            .expect_create_tool_metadata()
            .returning(|_, _, _| Err(StorageError::Sqlx(sqlx::Error::PoolTimedOut)));

        let err = reconcile_tool_metadata(&mut store, &agent, "user-1", &requested)
            .await
            .unwrap_err();

        match err {
            StorageError::Database(message) => assert!(message.contains("search")),
            other => panic!("Expected Database error, got {:?}", other),
        }
    }
}
