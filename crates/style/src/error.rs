use thiserror::Error;

pub type Result<T> = std::result::Result<T, StyleError>;

#[derive(Error, Debug)]
pub enum StyleError {
    #[error("Failed to read style catalog: {0}")]
    CatalogIo(#[from] std::io::Error),

    #[error("Style catalog is not valid JSON: {0}")]
    CatalogParse(#[from] serde_json::Error),

    #[error("Unsupported style catalog schema_version {0} (expected 1)")]
    UnsupportedSchema(u32),

    #[error("Style catalog contains no styles")]
    EmptyCatalog,

    #[error("Empty message")]
    EmptyMessage,
}
