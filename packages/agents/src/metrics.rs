// ABOUTME: Conversions from agent records into metrics snapshots
// ABOUTME: Keeps the telemetry crate free of agent storage types

use toolkit_telemetry::{MetricsAgent, MetricsToolMetadata};

use super::types::{Agent, AgentToolMetadata};

impl From<&Agent> for MetricsAgent {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id.clone(),
            version: agent.version,
            name: agent.name.clone(),
            temperature: agent.temperature,
            model: Some(agent.model.clone()),
            deployment: Some(agent.deployment.clone()),
            description: agent.description.clone(),
            preamble: agent.preamble.clone(),
        }
    }
}

impl From<&AgentToolMetadata> for MetricsToolMetadata {
    fn from(metadata: &AgentToolMetadata) -> Self {
        Self {
            id: metadata.id.clone(),
            agent_id: metadata.agent_id.clone(),
            tool_name: metadata.tool_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_agent_snapshot_keeps_configuration() {
        let agent = Agent {
            id: "agent-1".to_string(),
            user_id: "user-1".to_string(),
            name: "Researcher".to_string(),
            version: 2,
            description: Some("Finds papers".to_string()),
            preamble: None,
            temperature: 0.5,
            model: "command-r".to_string(),
            deployment: "Cohere Platform".to_string(),
            tools: vec![],
            tools_metadata: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let snapshot = MetricsAgent::from(&agent);
        assert_eq!(snapshot.id, "agent-1");
        assert_eq!(snapshot.version, 2);
        assert_eq!(snapshot.model.as_deref(), Some("command-r"));
        assert_eq!(snapshot.description.as_deref(), Some("Finds papers"));
        assert!(snapshot.preamble.is_none());
    }
}
