use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::backend::ModelBackend;
use crate::config::{EngineConfig, GenerationConfig};
use crate::metrics::StatsCollector;
use crate::model::{ModelManager, ModelTask};
use crate::parser;
use crate::scoring;
use crate::templates;
use crate::types::{
    EngineStats, ModelInfo, PersonalityAnswer, PersonalityResult, PsychometricQuestion,
    QuizQuestion,
};

/// Maximum length of a model-elaborated personality description.
const DESCRIPTION_LIMIT: usize = 200;
/// Elaborations shorter than this are treated as generation noise.
const DESCRIPTION_MIN: usize = 50;

const FALLBACK_TAG: &str = "Fallback";

/// The multi-model generation engine.
///
/// Owns one model slot per task; every public operation degrades to a
/// usable, clearly flagged result rather than failing, so a broken or
/// missing model never takes a request down with it.
pub struct QuizEngine {
    manager: ModelManager,
    generation: Arc<RwLock<GenerationConfig>>,
    stats: StatsCollector,
}

impl QuizEngine {
    pub fn builder() -> super::EngineBuilder {
        super::EngineBuilder::new()
    }

    /// Construct the engine, loading all slots in parallel. Blocks until
    /// every load has finished, successfully or not.
    pub(crate) fn new(backend: Arc<dyn ModelBackend>, config: EngineConfig) -> Self {
        let generation = Arc::new(RwLock::new(config.generation.clone()));
        let manager = ModelManager::new(backend, &config, generation.clone());
        info!(all_loaded = manager.all_loaded(), "engine constructed");

        Self {
            manager,
            generation,
            stats: StatsCollector::new(),
        }
    }

    /// Generate one quiz question. A missing quiz model yields a flagged
    /// placeholder naming the category instead of an error.
    pub fn generate_quiz_question(
        &self,
        category: &str,
        difficulty: &str,
        player_name: &str,
    ) -> QuizQuestion {
        let start = Instant::now();
        debug!(player = player_name, category, difficulty, "generating quiz question");

        if !self.manager.is_loaded(ModelTask::Quiz) {
            debug!("quiz model not loaded, serving fallback question");
            return self.fallback_quiz_question(category, difficulty, start);
        }

        let prompt = templates::quiz_prompt(category, difficulty);
        let response = self.manager.generate(ModelTask::Quiz, prompt);

        let mut question = parser::parse_quiz_response(&response, category, difficulty);
        question.model_tag = self.manager.slot_name(ModelTask::Quiz).to_string();
        question.generation_time_ms = start.elapsed().as_millis() as u64;

        self.stats.record_quiz_question(start.elapsed());
        debug!(
            elapsed_ms = question.generation_time_ms,
            generated = question.generated,
            "quiz question ready"
        );
        question
    }

    fn fallback_quiz_question(
        &self,
        category: &str,
        difficulty: &str,
        start: Instant,
    ) -> QuizQuestion {
        let modifiers = templates::difficulty_modifiers(difficulty);
        QuizQuestion {
            question: format!("What is an important concept in {category}?"),
            answers: vec![
                "Concept A".to_string(),
                "Concept B".to_string(),
                "Concept C".to_string(),
            ],
            correct_answer_index: 0,
            category: category.to_string(),
            difficulty: difficulty.to_string(),
            correct_answer_price_multiplier: modifiers.correct_price_multiplier,
            wrong_answer_price_multiplier: modifiers.wrong_price_multiplier,
            steal_chance: modifiers.steal_chance,
            steal_percentage: modifiers.steal_percentage,
            generated: false,
            model_tag: FALLBACK_TAG.to_string(),
            generation_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Generate a balanced psychometric questionnaire. The count silently
    /// caps at the number of configured facets; question ids follow facet
    /// order so they line up with the scoring engine's id banding.
    pub fn generate_psychometric_questions(&self, count: usize) -> Vec<PsychometricQuestion> {
        let count = count.min(templates::FACETS.len());
        let loaded = self.manager.is_loaded(ModelTask::Psychometric);
        if !loaded {
            debug!("psychometric model not loaded, serving fallback questions");
        }

        let questions: Vec<PsychometricQuestion> = templates::FACETS[..count]
            .iter()
            .enumerate()
            .map(|(i, facet)| {
                let start = Instant::now();
                let response = if loaded {
                    self.manager
                        .generate(ModelTask::Psychometric, templates::psychometric_prompt(facet.name))
                } else {
                    String::new()
                };

                let mut question = parser::parse_psychometric_response(
                    &response,
                    (i + 1) as u32,
                    facet.dichotomy,
                    facet.name,
                );
                question.model_tag = if question.generated {
                    self.manager.slot_name(ModelTask::Psychometric).to_string()
                } else {
                    FALLBACK_TAG.to_string()
                };
                question.generation_time_ms = start.elapsed().as_millis() as u64;
                question
            })
            .collect();

        self.stats.record_psychometric_questions(questions.len() as u64);
        questions
    }

    /// Score an answer sequence into a personality classification.
    ///
    /// The caller-side rule that the answer set must be non-empty is
    /// enforced at the service boundary; an empty slice here simply yields
    /// the all-neutral result.
    pub fn analyze_personality(&self, answers: &[PersonalityAnswer]) -> PersonalityResult {
        let start = Instant::now();
        debug!(answer_count = answers.len(), "analyzing personality");

        let scores = scoring::trait_scores(answers);
        let type_code = scoring::classify(&scores);
        let confidence = scoring::confidence(&scores);

        let (title, static_description) = templates::type_profile(&type_code);
        let elaborated = self.elaborated_description(&type_code);
        let ai_generated = elaborated.is_some();
        let analysis_model = if ai_generated {
            format!("MBTI + {}", self.manager.slot_name(ModelTask::Analysis))
        } else {
            "MBTI-Static".to_string()
        };

        self.stats.record_personality_analysis();
        let result = PersonalityResult {
            title: title.to_string(),
            description: elaborated.unwrap_or_else(|| static_description.to_string()),
            strengths: templates::strengths(&type_code),
            growth_areas: templates::growth_areas(&type_code),
            scores,
            confidence,
            ai_generated,
            analysis_model,
            analysis_time_ms: start.elapsed().as_millis() as u64,
            type_code,
        };
        debug!(type_code = %result.type_code, confidence, "personality analysis complete");
        result
    }

    /// Ask the analysis model to elaborate on a type description. Returns
    /// `None` when the slot is unloaded or the output is too thin to use;
    /// overlong output truncates with an ellipsis marker.
    fn elaborated_description(&self, type_code: &str) -> Option<String> {
        if !self.manager.is_loaded(ModelTask::Analysis) {
            return None;
        }

        let prompt =
            format!("Describe {type_code} personality type. Key traits and characteristics:");
        let text = self.manager.generate(ModelTask::Analysis, &prompt);

        let chars = text.chars().count();
        if chars <= DESCRIPTION_MIN {
            return None;
        }
        if chars > DESCRIPTION_LIMIT {
            let truncated: String = text.chars().take(DESCRIPTION_LIMIT).collect();
            Some(format!("{truncated}..."))
        } else {
            Some(text)
        }
    }

    pub fn models_loaded(&self) -> bool {
        self.manager.all_loaded()
    }

    /// Tear down and reload every slot; blocks all generation until done.
    pub fn reload_models(&self) -> bool {
        self.manager.reload_all()
    }

    pub fn stats(&self) -> EngineStats {
        self.stats.snapshot()
    }

    pub fn model_info(&self) -> ModelInfo {
        let generation = self.generation.read();
        ModelInfo {
            slots: self.manager.slot_infos(),
            context_size: generation.context_size(),
            max_tokens: generation.max_tokens(),
            temperature: generation.temperature(),
        }
    }

    pub fn set_temperature(&self, temperature: f32) {
        self.generation.write().set_temperature(temperature);
    }

    pub fn set_max_tokens(&self, tokens: usize) {
        self.generation.write().set_max_tokens(tokens);
    }

    /// Takes effect at the next slot (re)load.
    pub fn set_context_size(&self, size: usize) {
        self.generation.write().set_context_size(size);
    }

    pub fn categories(&self) -> Vec<String> {
        templates::CATEGORIES.iter().map(|c| c.to_string()).collect()
    }

    pub fn difficulties(&self) -> Vec<String> {
        templates::DIFFICULTIES.iter().map(|d| d.to_string()).collect()
    }

    pub fn category_topics(&self) -> HashMap<String, Vec<String>> {
        templates::category_topics()
    }

    pub fn personality_traits(&self) -> Vec<String> {
        templates::trait_names()
    }

    pub fn personality_types(&self) -> Vec<String> {
        templates::personality_types()
    }
}
