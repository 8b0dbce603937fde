use ft_agent::AgentError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("fleet configuration error: {0}")]
    Config(String),

    #[error("density table is at zoom {weights} but the fleet is configured for zoom {config}")]
    ZoomMismatch { config: u8, weights: u8 },

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error("invalid fleet config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
