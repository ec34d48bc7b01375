use std::path::PathBuf;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::model::ModelTask;

/// Top-level engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub slots: SlotsConfig,
    pub generation: GenerationConfig,
}

/// Weight locations for the three task-dedicated model slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotsConfig {
    pub quiz: SlotConfig,
    pub psychometric: SlotConfig,
    pub analysis: SlotConfig,
}

/// One model slot: a weights directory and a display name used in logs
/// and provenance tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotConfig {
    pub path: PathBuf,
    pub name: String,
}

impl SlotConfig {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

/// Process-wide generation tunables, read by every generation call.
///
/// Mutation goes through the bounded setters; out-of-range values clamp to
/// the safe range rather than erroring. Ranges are sized for small local
/// models.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    context_size: usize,
    max_tokens: usize,
    temperature: f32,
}

impl GenerationConfig {
    pub const CONTEXT_SIZE_RANGE: (usize, usize) = (512, 2048);
    pub const MAX_TOKENS_RANGE: (usize, usize) = (32, 256);
    pub const TEMPERATURE_RANGE: (f32, f32) = (0.1, 1.5);

    pub fn context_size(&self) -> usize {
        self.context_size
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Context window in tokens, applied at the next slot (re)load.
    pub fn set_context_size(&mut self, size: usize) {
        let (lo, hi) = Self::CONTEXT_SIZE_RANGE;
        self.context_size = size.clamp(lo, hi);
    }

    /// Per-call generation cap.
    pub fn set_max_tokens(&mut self, tokens: usize) {
        let (lo, hi) = Self::MAX_TOKENS_RANGE;
        self.max_tokens = tokens.clamp(lo, hi);
    }

    /// Sampling temperature.
    pub fn set_temperature(&mut self, temperature: f32) {
        let (lo, hi) = Self::TEMPERATURE_RANGE;
        self.temperature = temperature.clamp(lo, hi);
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            context_size: 1024,
            max_tokens: 128,
            temperature: 0.7,
        }
    }
}

impl EngineConfig {
    /// Build a configuration from the three weight directories, with
    /// default slot names and generation tunables.
    pub fn with_model_paths(
        quiz: impl Into<PathBuf>,
        psychometric: impl Into<PathBuf>,
        analysis: impl Into<PathBuf>,
    ) -> Self {
        Self {
            slots: SlotsConfig {
                quiz: SlotConfig::new(quiz, "Quiz-Model"),
                psychometric: SlotConfig::new(psychometric, "Psychometric-Model"),
                analysis: SlotConfig::new(analysis, "Analysis-Model"),
            },
            generation: GenerationConfig::default(),
        }
    }

    pub fn slot(&self, task: ModelTask) -> &SlotConfig {
        match task {
            ModelTask::Quiz => &self.slots.quiz,
            ModelTask::Psychometric => &self.slots.psychometric,
            ModelTask::Analysis => &self.slots.analysis,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for task in ModelTask::ALL {
            let slot = self.slot(task);
            if slot.path.as_os_str().is_empty() {
                return Err(EngineError::configuration(
                    task.key(),
                    "model path cannot be empty",
                ));
            }
            if slot.name.is_empty() {
                return Err(EngineError::configuration(
                    task.key(),
                    "model name cannot be empty",
                ));
            }
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::with_model_paths("", "", "")
    }
}
