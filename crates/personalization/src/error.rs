use thiserror::Error;

pub type Result<T> = std::result::Result<T, PersonalizationError>;

#[derive(Debug, Error)]
pub enum PersonalizationError {
    #[error("failed to read preference store: {0}")]
    StoreIo(#[from] std::io::Error),

    #[error("failed to parse preference store: {0}")]
    StoreParse(#[from] serde_json::Error),

    #[error("unsupported preference store schema version {0}")]
    UnsupportedSchema(u32),
}
