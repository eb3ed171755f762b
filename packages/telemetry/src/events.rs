// ABOUTME: Metrics event types for agent operations
// ABOUTME: Message types, agent snapshots, and the persisted event record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::SqlitePool;
use uuid::Uuid;

use toolkit_storage::{StorageError, StorageResult};

/// Identifier reported for the built-in default agent
pub const DEFAULT_AGENT_ID: &str = "9c300cfd-1506-408b-829d-a6464137a7c1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricsMessageType {
    AssistantCreated,
    AssistantAccessed,
    AssistantUpdated,
    AssistantDeleted,
    Unknown,
}

impl MetricsMessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AssistantCreated => "assistant_created",
            Self::AssistantAccessed => "assistant_accessed",
            Self::AssistantUpdated => "assistant_updated",
            Self::AssistantDeleted => "assistant_deleted",
            Self::Unknown => "unknown",
        }
    }
}

/// Snapshot of the agent configuration attached to a metrics event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsAgent {
    pub id: String,
    pub version: i64,
    pub name: String,
    pub temperature: f64,
    pub model: Option<String>,
    pub deployment: Option<String>,
    pub description: Option<String>,
    pub preamble: Option<String>,
}

impl MetricsAgent {
    /// The agent reported when a conversation runs without a stored agent
    pub fn default_agent() -> Self {
        Self {
            id: DEFAULT_AGENT_ID.to_string(),
            version: 1,
            name: "Default Agent".to_string(),
            temperature: 0.3,
            model: Some("command-r-plus".to_string()),
            deployment: Some("Cohere Platform".to_string()),
            description: Some("Default Agent".to_string()),
            preamble: Some(String::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsToolMetadata {
    pub id: String,
    pub agent_id: String,
    pub tool_name: String,
}

/// A finished metrics event, ready to be logged or stored
#[derive(Debug, Clone, Serialize)]
pub struct MetricsEvent {
    pub id: String,
    pub request_id: String,
    pub event_type: MetricsMessageType,
    pub user_id: Option<String>,
    pub agent_id: Option<String>,
    pub payload: Value,
    pub timestamp: DateTime<Utc>,
}

impl MetricsEvent {
    pub fn new(request_id: String, event_type: MetricsMessageType) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            request_id,
            event_type,
            user_id: None,
            agent_id: None,
            payload: Value::Null,
            timestamp: Utc::now(),
        }
    }

    pub async fn save_to_db(&self, pool: &SqlitePool) -> StorageResult<()> {
        let payload = serde_json::to_string(&self.payload)?;

        sqlx::query(
            r#"
            INSERT INTO metrics_events (
                id,
                request_id,
                event_type,
                user_id,
                agent_id,
                payload,
                created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&self.id)
        .bind(&self.request_id)
        .bind(self.event_type.as_str())
        .bind(&self.user_id)
        .bind(&self.agent_id)
        .bind(payload)
        .bind(self.timestamp)
        .execute(pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_serializes_snake_case() {
        let value = serde_json::to_value(MetricsMessageType::AssistantCreated).unwrap();
        assert_eq!(value, serde_json::json!("assistant_created"));
        assert_eq!(
            MetricsMessageType::AssistantDeleted.as_str(),
            "assistant_deleted"
        );
    }

    #[test]
    fn test_default_agent() {
        let agent = MetricsAgent::default_agent();
        assert_eq!(agent.id, DEFAULT_AGENT_ID);
        assert_eq!(agent.name, "Default Agent");
        assert_eq!(agent.version, 1);
    }
}
