//! Quiz Engine - multi-model local text generation for quiz and
//! personality-assessment content.
//!
//! The engine keeps one small language model loaded per task (quiz
//! questions, psychometric questions, personality analysis), drives each
//! through prompt templates with a deterministic token-sampling loop, and
//! recovers typed domain objects from the raw output with tolerant,
//! fallback-backed parsing. Personality classification itself is fully
//! deterministic; the analysis model only elaborates descriptions.
//!
//! ```no_run
//! use quiz_engine::QuizEngine;
//!
//! let engine = QuizEngine::builder()
//!     .with_model_paths("models/quiz", "models/psychometric", "models/analysis")
//!     .build()
//!     .expect("valid configuration");
//!
//! let question = engine.generate_quiz_question("Science", "Medium", "Ada");
//! println!("{}", question.question);
//! ```

// Public modules
pub mod backend;
pub mod config;
pub mod error;
pub mod types;

// Internal modules
mod engine;
mod generation;
mod metrics;
mod model;
mod parser;
mod scoring;
mod templates;
mod utils;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-exports for the public API
pub use backend::{CandleBackend, LanguageModel, LoadParams, ModelBackend};
pub use config::{EngineConfig, GenerationConfig, SlotConfig};
pub use engine::{EngineBuilder, QuizEngine};
pub use error::{EngineError, Result};
pub use model::ModelTask;
pub use parser::{extract_answers, extract_correct_answer, extract_options, extract_question};
pub use scoring::{classify, confidence, trait_scores, Dichotomy};
pub use templates::{quiz_prompt, CATEGORIES, DIFFICULTIES, FACETS};
pub use types::{
    EngineStats, ModelInfo, PersonalityAnswer, PersonalityResult, PsychometricQuestion,
    QuizQuestion, SlotInfo,
};
pub use utils::logging::init_logging;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_public_surface_reachable() {
        assert_eq!(CATEGORIES.len(), 4);
        assert_eq!(DIFFICULTIES.len(), 3);
        assert_eq!(FACETS.len(), 8);
        assert_eq!(ModelTask::ALL.len(), 3);
    }
}
