//! Crate-level error type.

use thiserror::Error;

use crate::config::loader::ConfigError;

#[derive(Debug, Error)]
pub enum RouterError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("No route matches {location:?}")]
    NoMatch { location: String },

    #[error("Failed to parse replay script: {0}")]
    Script(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}
