use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by the engine's construction and configuration surface.
///
/// Runtime failures inside the generation pipeline never reach this type:
/// a slot that fails to load is reported through `is_loaded() == false`, a
/// failed generation degrades to an empty string, and a parse miss resolves
/// to a fallback value. Only misconfiguration and backend seam errors are
/// worth propagating.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("configuration error for {parameter}: {message}")]
    Configuration { parameter: String, message: String },

    #[error("failed to load model '{name}' from {path}: {message}")]
    ModelLoad {
        name: String,
        path: PathBuf,
        message: String,
    },

    #[error("inference backend error: {message}")]
    Backend {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl EngineError {
    pub(crate) fn configuration(parameter: &str, message: impl Into<String>) -> Self {
        Self::Configuration {
            parameter: parameter.to_string(),
            message: message.into(),
        }
    }
}
