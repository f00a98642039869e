//! Render error types.

use thiserror::Error;

/// Errors that can occur while configuring or running a renderer.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Tree error.
    #[error("Tree error: {0}")]
    Tree(#[from] gentry_tree::TreeError),
}

impl RenderError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
