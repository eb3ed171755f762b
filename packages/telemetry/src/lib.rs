// ABOUTME: Request-scoped metrics context for the Toolkit agent service
// ABOUTME: Event builder passed through handlers plus a recorder that logs and persists events

pub mod context;
pub mod events;
pub mod recorder;

pub use context::RequestContext;
pub use events::{
    MetricsAgent, MetricsEvent, MetricsMessageType, MetricsToolMetadata, DEFAULT_AGENT_ID,
};
pub use recorder::MetricsRecorder;
