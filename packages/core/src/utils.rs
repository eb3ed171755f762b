// ABOUTME: Shared utility functions for Toolkit
// ABOUTME: Prefixed ID generation for persisted resources

/// Generate a unique, prefixed resource ID such as `agent-V1StGXR8_Z5jdHi6B-myT`
pub fn generate_id(prefix: &str) -> String {
    format!("{}-{}", prefix, nanoid::nanoid!())
}
