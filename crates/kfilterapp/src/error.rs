use thiserror::Error;

#[derive(Error, Debug)]
pub enum KfilterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("View parse error: {0}")]
    ViewParse(#[from] toml::de::Error),

    #[error("Invalid view: {0}")]
    InvalidView(String),

    #[error("Duplicate filter param: {0}")]
    DuplicateParam(String),

    #[error("Unknown filter param: {0}")]
    UnknownParam(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, KfilterError>;
