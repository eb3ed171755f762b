// ABOUTME: Shared state for API handlers
// ABOUTME: Holds the SQLite pool, storage layers, metrics recorder, and request validator

use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::debug;

use crate::validation::AgentValidator;
use toolkit_agents::{AgentStorage, ToolMetadataStorage};
use toolkit_telemetry::MetricsRecorder;

/// Shared database state for API handlers
#[derive(Clone)]
pub struct DbState {
    pub pool: SqlitePool,
    pub agent_storage: Arc<AgentStorage>,
    pub tool_metadata_storage: Arc<ToolMetadataStorage>,
    pub metrics: Arc<MetricsRecorder>,
    pub validator: Arc<AgentValidator>,
}

impl DbState {
    /// State with metrics logged but not persisted and no allow-lists
    pub fn new(pool: SqlitePool) -> Self {
        debug!("Initializing API state");

        Self {
            agent_storage: Arc::new(AgentStorage::new(pool.clone())),
            tool_metadata_storage: Arc::new(ToolMetadataStorage::new(pool.clone())),
            metrics: Arc::new(MetricsRecorder::disabled()),
            validator: Arc::new(AgentValidator::new()),
            pool,
        }
    }

    pub fn with_metrics(mut self, persist: bool) -> Self {
        self.metrics = Arc::new(MetricsRecorder::new(self.pool.clone(), persist));
        self
    }

    pub fn with_validator(mut self, validator: AgentValidator) -> Self {
        self.validator = Arc::new(validator);
        self
    }
}
