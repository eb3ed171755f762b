use std::env;
use std::path::PathBuf;

/// Version prefix shared by every public route
pub const API_PREFIX: &str = "/v1";

/// Service name reported by health checks and logs
pub const SERVICE_NAME: &str = "toolkit";

/// Get the path to the Toolkit directory (~/.toolkit)
pub fn toolkit_dir() -> PathBuf {
    // First try HOME environment variable (useful for tests)
    if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(".toolkit")
    } else {
        dirs::home_dir()
            .unwrap_or_else(env::temp_dir)
            .join(".toolkit")
    }
}

/// Get the path to the default SQLite database (~/.toolkit/toolkit.db)
pub fn default_database_path() -> PathBuf {
    toolkit_dir().join("toolkit.db")
}
