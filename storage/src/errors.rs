use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Filesystem operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("MongoDB operation failed: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Refusing to use {0:?} as a document id")]
    InvalidId(String),
}
