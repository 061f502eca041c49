use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("player name is required")]
    MissingAlias,
    #[error("player name must be between {min} and {max} characters")]
    AliasLength { min: usize, max: usize },
    #[error("this mode needs {expected} players, got {got}")]
    SeatCount { expected: usize, got: usize },
    #[error("configuration must be a JSON object")]
    ConfigShape,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("configuration parse error: {0}")]
    ConfigJson(#[from] serde_json::Error),
}
