use std::path::PathBuf;
use std::sync::Arc;

use crate::backend::{CandleBackend, ModelBackend};
use crate::config::EngineConfig;
use crate::error::Result;

use super::QuizEngine;

/// Builder for a [`QuizEngine`] instance.
///
/// The backend defaults to candle; tests and embedders can substitute any
/// [`ModelBackend`] implementation.
pub struct EngineBuilder {
    config: Option<EngineConfig>,
    backend: Option<Arc<dyn ModelBackend>>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            backend: None,
        }
    }

    /// Set the full engine configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Shorthand: configure just the three weight directories, keeping
    /// default names and tunables.
    pub fn with_model_paths(
        self,
        quiz: impl Into<PathBuf>,
        psychometric: impl Into<PathBuf>,
        analysis: impl Into<PathBuf>,
    ) -> Self {
        self.with_config(EngineConfig::with_model_paths(quiz, psychometric, analysis))
    }

    /// Substitute the inference backend.
    pub fn with_backend(mut self, backend: Arc<dyn ModelBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Validate the configuration and construct the engine, blocking until
    /// all slots have attempted their parallel load. A slot whose weights
    /// cannot be loaded stays inert; construction itself only fails on
    /// invalid configuration.
    pub fn build(self) -> Result<QuizEngine> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let backend = self
            .backend
            .unwrap_or_else(|| Arc::new(CandleBackend::new()));

        Ok(QuizEngine::new(backend, config))
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_rejects_empty_config() {
        let result = EngineBuilder::new().build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_accepts_model_paths() {
        // Paths do not exist; the candle backend fails softly and every
        // slot stays inert, but construction succeeds.
        let engine = EngineBuilder::new()
            .with_model_paths("/nonexistent/quiz", "/nonexistent/psych", "/nonexistent/analysis")
            .build()
            .unwrap();
        assert!(!engine.models_loaded());
    }
}
