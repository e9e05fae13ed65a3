use thiserror::Error;

/// Failures raised by a storage backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed stored value: {0}")]
    Json(#[from] serde_json::Error),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("invalid record kind `{0}`")]
    UnknownKind(String),

    #[error("user id must not be empty")]
    EmptyUser,
}

pub type Result<T> = std::result::Result<T, StoreError>;
