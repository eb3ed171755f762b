// ABOUTME: Agent and tool-metadata type definitions
// ABOUTME: Stored records, their public views, and create/update inputs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sampling temperature applied when a request omits one
pub const DEFAULT_TEMPERATURE: f64 = 0.3;

/// A configured conversational assistant owned by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub version: i64,
    pub description: Option<String>,
    pub preamble: Option<String>,
    pub temperature: f64,
    pub model: String,
    pub deployment: String,
    pub tools: Vec<String>,
    pub tools_metadata: Vec<AgentToolMetadata>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Agent {
    /// Find the stored entry for `tool_name`, if any
    pub fn tool_metadata_by_name(&self, tool_name: &str) -> Option<&AgentToolMetadata> {
        self.tools_metadata
            .iter()
            .find(|metadata| metadata.tool_name == tool_name)
    }
}

/// Agent without owner information, returned by public endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentPublic {
    pub id: String,
    pub name: String,
    pub version: i64,
    pub description: Option<String>,
    pub preamble: Option<String>,
    pub temperature: f64,
    pub model: String,
    pub deployment: String,
    pub tools: Vec<String>,
    pub tools_metadata: Vec<AgentToolMetadataPublic>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Agent> for AgentPublic {
    fn from(agent: Agent) -> Self {
        Self {
            id: agent.id,
            name: agent.name,
            version: agent.version,
            description: agent.description,
            preamble: agent.preamble,
            temperature: agent.temperature,
            model: agent.model,
            deployment: agent.deployment,
            tools: agent.tools,
            tools_metadata: agent
                .tools_metadata
                .into_iter()
                .map(AgentToolMetadataPublic::from)
                .collect(),
            created_at: agent.created_at,
            updated_at: agent.updated_at,
        }
    }
}

/// Per-agent, per-tool artifact payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentToolMetadata {
    pub id: String,
    pub agent_id: String,
    pub user_id: String,
    pub tool_name: String,
    pub artifacts: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentToolMetadataPublic {
    pub id: String,
    pub agent_id: String,
    pub tool_name: String,
    pub artifacts: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AgentToolMetadata> for AgentToolMetadataPublic {
    fn from(metadata: AgentToolMetadata) -> Self {
        Self {
            id: metadata.id,
            agent_id: metadata.agent_id,
            tool_name: metadata.tool_name,
            artifacts: metadata.artifacts,
            created_at: metadata.created_at,
            updated_at: metadata.updated_at,
        }
    }
}

/// Tool-metadata entry as it appears inside an agent create/update request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolMetadataInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub tool_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<Value>,
}

impl ToolMetadataInput {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            id: None,
            tool_name: tool_name.into(),
            artifacts: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_artifacts(mut self, artifacts: Value) -> Self {
        self.artifacts = Some(artifacts);
        self
    }

    pub fn to_create_input(&self) -> ToolMetadataCreateInput {
        ToolMetadataCreateInput {
            tool_name: self.tool_name.clone(),
            artifacts: self.artifacts.clone(),
        }
    }

    pub fn to_update_input(&self) -> ToolMetadataUpdateInput {
        ToolMetadataUpdateInput {
            tool_name: Some(self.tool_name.clone()),
            artifacts: self.artifacts.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ToolMetadataCreateInput {
    pub tool_name: String,
    pub artifacts: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ToolMetadataUpdateInput {
    pub tool_name: Option<String>,
    pub artifacts: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AgentCreateInput {
    pub name: String,
    pub version: Option<i64>,
    pub description: Option<String>,
    pub preamble: Option<String>,
    pub temperature: Option<f64>,
    pub model: String,
    pub deployment: String,
    #[serde(default)]
    pub tools: Vec<String>,
    pub tools_metadata: Option<Vec<ToolMetadataInput>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AgentUpdateInput {
    pub name: Option<String>,
    pub version: Option<i64>,
    pub description: Option<String>,
    pub preamble: Option<String>,
    pub temperature: Option<f64>,
    pub model: Option<String>,
    pub deployment: Option<String>,
    pub tools: Option<Vec<String>>,
    /// When present, the agent's stored tool metadata is reconciled to this list
    pub tools_metadata: Option<Vec<ToolMetadataInput>>,
}

impl AgentUpdateInput {
    /// True when no scalar agent column would change
    pub fn has_field_updates(&self) -> bool {
        self.name.is_some()
            || self.version.is_some()
            || self.description.is_some()
            || self.preamble.is_some()
            || self.temperature.is_some()
            || self.model.is_some()
            || self.deployment.is_some()
            || self.tools.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_metadata_input_omits_absent_fields() {
        let input = ToolMetadataInput::new("search");
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value, json!({"tool_name": "search"}));
    }

    #[test]
    fn test_tool_metadata_input_deserializes_without_id() {
        let input: ToolMetadataInput =
            serde_json::from_value(json!({"tool_name": "calc", "artifacts": [{"k": "v"}]}))
                .unwrap();
        assert_eq!(input.id, None);
        assert_eq!(input.artifacts, Some(json!([{"k": "v"}])));
        assert_eq!(
            input.to_update_input().tool_name.as_deref(),
            Some("calc")
        );
    }

    #[test]
    fn test_update_input_field_detection() {
        assert!(!AgentUpdateInput::default().has_field_updates());

        let only_metadata = AgentUpdateInput {
            tools_metadata: Some(vec![]),
            ..Default::default()
        };
        assert!(!only_metadata.has_field_updates());

        let renamed = AgentUpdateInput {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };
        assert!(renamed.has_field_updates());
    }
}
