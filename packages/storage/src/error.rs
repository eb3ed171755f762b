use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },
    #[error("Duplicate tool name: {0}")]
    Conflict(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Translate a unique-constraint violation into `Conflict(name)`
    pub fn from_unique_violation(err: sqlx::Error, name: &str) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::Conflict(name.to_string())
            }
            _ => Self::Sqlx(err),
        }
    }

    /// Translate `RowNotFound` into `NotFound { resource, id }`
    pub fn from_missing_row(err: sqlx::Error, resource: &'static str, id: &str) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::not_found(resource, id),
            other => Self::Sqlx(other),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
