// ABOUTME: Core constants and utilities for the Toolkit agent service
// ABOUTME: Foundational package shared by storage, agents, and the HTTP API

pub mod constants;
pub mod pagination;
pub mod utils;

// Re-export constants
pub use constants::{default_database_path, toolkit_dir, API_PREFIX, SERVICE_NAME};

// Re-export utilities
pub use utils::generate_id;
