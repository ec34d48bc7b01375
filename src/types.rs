//! Domain types produced by the engine.
//!
//! Every type here is created per request and owned by the caller once the
//! producing call returns. Field names serialize in camelCase to match the
//! JSON surface of the surrounding service.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

use crate::scoring::Dichotomy;

/// A generated multiple-choice quiz question.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    /// Exactly three answer options.
    pub answers: Vec<String>,
    /// Index into `answers`, always in 0..=2.
    pub correct_answer_index: usize,
    pub category: String,
    pub difficulty: String,
    pub correct_answer_price_multiplier: f64,
    pub wrong_answer_price_multiplier: f64,
    pub steal_chance: f64,
    pub steal_percentage: f64,
    /// False when the content came from fallbacks rather than the model.
    pub generated: bool,
    #[serde(rename = "aiModel")]
    pub model_tag: String,
    pub generation_time_ms: u64,
}

/// A generated psychometric assessment question.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PsychometricQuestion {
    pub id: u32,
    pub question: String,
    /// Exactly three options ordered positive / neutral / negative for the
    /// dichotomy's first letter.
    pub options: Vec<String>,
    #[serde(rename = "trait")]
    pub dichotomy: Dichotomy,
    /// Facet label the question was generated for, e.g. "E/I_Social".
    pub category: String,
    pub generated: bool,
    #[serde(rename = "aiModel")]
    pub model_tag: String,
    pub generation_time_ms: u64,
}

/// One answered psychometric question, as submitted by the caller.
///
/// The `trait_label` is informational only; scoring assigns the answer to a
/// dichotomy from `question_id` alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalityAnswer {
    pub question_id: u32,
    /// 0 leans toward the dichotomy's first letter, 2 toward the second,
    /// 1 is neutral.
    pub selected_option: u8,
    #[serde(rename = "trait", default)]
    pub trait_label: String,
}

impl PersonalityAnswer {
    pub fn new(question_id: u32, selected_option: u8, trait_label: &str) -> Self {
        Self {
            question_id,
            selected_option,
            trait_label: trait_label.to_string(),
        }
    }
}

/// Outcome of a personality analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalityResult {
    /// Four letters over {E,I}{S,N}{T,F}{J,P}, e.g. "INTJ".
    #[serde(rename = "personalityType")]
    pub type_code: String,
    pub title: String,
    pub description: String,
    /// All eight trait letters mapped to [0, 1]; paired letters sum to 1.
    pub scores: BTreeMap<char, f64>,
    pub strengths: Vec<String>,
    pub growth_areas: Vec<String>,
    /// 1.0 when every dichotomy scored at an extreme, 0.0 when all neutral.
    pub confidence: f64,
    pub ai_generated: bool,
    pub analysis_model: String,
    pub analysis_time_ms: u64,
}

/// Aggregate usage statistics for the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStats {
    pub total_questions_generated: u64,
    pub total_generation_time_ms: u64,
    pub average_generation_time_ms: f64,
    pub questions_per_minute: f64,
    pub psychometric_questions_generated: u64,
    pub personality_analyses: u64,
    pub uptime_seconds: u64,
}

/// Snapshot of one slot's state, for the model-info surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotInfo {
    pub task: String,
    pub name: String,
    pub loaded: bool,
    pub usage_count: u64,
    /// Backend-supplied model description, present only while loaded.
    pub description: Option<String>,
}

/// Snapshot of the whole model layer plus the active generation tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub slots: Vec<SlotInfo>,
    pub context_size: usize,
    pub max_tokens: usize,
    pub temperature: f32,
}
