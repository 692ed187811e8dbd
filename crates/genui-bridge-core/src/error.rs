use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("History error: {0}")]
    History(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
