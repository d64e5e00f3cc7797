use thiserror::Error;

pub type Result<T> = std::result::Result<T, KnowledgeError>;

#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("Failed to read knowledge pack: {0}")]
    PackIo(#[from] std::io::Error),

    #[error("Knowledge pack is not valid JSON: {0}")]
    PackParse(#[from] serde_json::Error),

    #[error("Knowledge pack '{0}' has no snippets")]
    EmptyPack(String),

    #[error("Embedding request failed: {0}")]
    Embedding(String),
}
