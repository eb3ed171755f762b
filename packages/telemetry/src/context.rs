// ABOUTME: Request-scoped metrics context
// ABOUTME: Immutable builder threaded through a handler and turned into a MetricsEvent

use serde_json::json;
use uuid::Uuid;

use crate::events::{MetricsAgent, MetricsEvent, MetricsMessageType, MetricsToolMetadata};

/// Metrics facts accumulated while serving one request.
///
/// Each `with_*` call consumes the context and returns the extended copy, so a
/// context can be shared by reference without interior mutability.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    event_type: Option<MetricsMessageType>,
    user_id: Option<String>,
    agent_id: Option<String>,
    metrics_agent: Option<MetricsAgent>,
    tool_metadata: Option<MetricsToolMetadata>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            event_type: None,
            user_id: None,
            agent_id: None,
            metrics_agent: None,
            tool_metadata: None,
        }
    }

    pub fn with_event_type(mut self, event_type: MetricsMessageType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    pub fn with_user(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn with_agent(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }

    pub fn with_metrics_agent(mut self, metrics_agent: MetricsAgent) -> Self {
        if self.agent_id.is_none() {
            self.agent_id = Some(metrics_agent.id.clone());
        }
        self.metrics_agent = Some(metrics_agent);
        self
    }

    pub fn with_agent_tool_metadata(mut self, tool_metadata: MetricsToolMetadata) -> Self {
        self.tool_metadata = Some(tool_metadata);
        self
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn event_type(&self) -> Option<MetricsMessageType> {
        self.event_type
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn agent_id(&self) -> Option<&str> {
        self.agent_id.as_deref()
    }

    /// Build the event for this request; `None` when no event type was set
    pub fn to_event(&self) -> Option<MetricsEvent> {
        let event_type = self.event_type?;

        let mut event = MetricsEvent::new(self.request_id.clone(), event_type);
        event.user_id = self.user_id.clone();
        event.agent_id = self.agent_id.clone();
        event.payload = json!({
            "agent": self.metrics_agent,
            "tool_metadata": self.tool_metadata,
        });

        Some(event)
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
