//! Errors for the configuration surface
//!
//! The simulation itself has no error channel; only loading a scene
//! configuration from outside the process can fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read scene config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid scene config: {0}")]
    Parse(#[from] serde_json::Error),
}
