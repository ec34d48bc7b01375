//! Model lifecycle: one independently lockable slot per task, managed as a
//! fixed set by [`ModelManager`].

mod manager;
mod slot;

pub use manager::ModelManager;
pub use slot::ModelSlot;

use serde::{Deserialize, Serialize};

/// The tasks the engine keeps a dedicated model for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelTask {
    Quiz,
    Psychometric,
    Analysis,
}

impl ModelTask {
    pub const ALL: [ModelTask; 3] = [ModelTask::Quiz, ModelTask::Psychometric, ModelTask::Analysis];

    pub fn key(self) -> &'static str {
        match self {
            ModelTask::Quiz => "quiz",
            ModelTask::Psychometric => "psychometric",
            ModelTask::Analysis => "analysis",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            ModelTask::Quiz => 0,
            ModelTask::Psychometric => 1,
            ModelTask::Analysis => 2,
        }
    }
}
