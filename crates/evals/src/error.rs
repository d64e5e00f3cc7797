use thiserror::Error;

pub type Result<T> = std::result::Result<T, EvalError>;

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("no eval cases to run")]
    NoCases,

    #[error("eval case {0} is invalid: {1}")]
    InvalidCase(String, String),

    #[error("failed to read case file: {0}")]
    CaseIo(#[source] std::io::Error),

    #[error("failed to parse case file: {0}")]
    CaseParse(#[source] serde_json::Error),

    #[error("unsupported case file schema version {0}")]
    UnsupportedSchema(u32),

    #[error("failed to access run store: {0}")]
    StoreIo(#[source] std::io::Error),

    #[error("failed to parse stored run: {0}")]
    StoreParse(#[source] serde_json::Error),

    #[error("no stored eval runs found")]
    NoRuns,
}
