//! Public facade over the model, generation, parsing and scoring layers.

mod builder;
#[allow(clippy::module_inception)]
mod engine;

pub use builder::EngineBuilder;
pub use engine::QuizEngine;
