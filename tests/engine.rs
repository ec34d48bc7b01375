//! End-to-end facade tests driven by a scripted inference backend, so the
//! full prompt -> generate -> parse -> score pipeline runs without model
//! weights.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use pretty_assertions::assert_eq;

use quiz_engine::{
    EngineBuilder, LanguageModel, LoadParams, ModelBackend, PersonalityAnswer, QuizEngine,
};

const EOS: u32 = 256;

/// Replays a fixed byte string one token per decode step, then EOS.
struct ScriptedModel {
    script: Vec<u32>,
    emitted: usize,
}

impl ScriptedModel {
    fn new(script: &str) -> Self {
        Self {
            script: script.bytes().map(u32::from).collect(),
            emitted: 0,
        }
    }
}

impl LanguageModel for ScriptedModel {
    fn tokenize(&self, text: &str) -> anyhow::Result<Vec<u32>> {
        anyhow::ensure!(!text.is_empty(), "empty prompt");
        Ok(text.bytes().map(u32::from).collect())
    }

    fn decode(&mut self, _tokens: &[u32]) -> anyhow::Result<Vec<f32>> {
        let next = self.script.get(self.emitted).copied().unwrap_or(EOS);
        self.emitted += 1;
        let mut logits = vec![0.0; 257];
        logits[next as usize] = 8.0;
        Ok(logits)
    }

    fn token_text(&self, token: u32) -> String {
        u8::try_from(token)
            .ok()
            .map(|b| (b as char).to_string())
            .unwrap_or_default()
    }

    fn eos_token(&self) -> u32 {
        EOS
    }

    fn reset_context(&mut self) -> anyhow::Result<()> {
        self.emitted = 0;
        Ok(())
    }

    fn description(&self) -> String {
        format!("scripted ({} tokens)", self.script.len())
    }
}

/// Serves a script per path fragment; paths without a script fail to load.
struct ScriptedBackend {
    scripts: HashMap<&'static str, String>,
}

impl ScriptedBackend {
    fn new(entries: &[(&'static str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            scripts: entries
                .iter()
                .map(|(key, script)| (*key, script.to_string()))
                .collect(),
        })
    }
}

impl ModelBackend for ScriptedBackend {
    fn load(&self, path: &Path, _: &LoadParams) -> anyhow::Result<Box<dyn LanguageModel>> {
        let path = path.to_string_lossy();
        let script = self
            .scripts
            .iter()
            .find(|(key, _)| path.contains(*key))
            .map(|(_, script)| script.clone());
        match script {
            Some(script) => Ok(Box::new(ScriptedModel::new(&script))),
            None => anyhow::bail!("no weights at {path}"),
        }
    }
}

const QUIZ_SCRIPT: &str = "Question: Ok?\nA) Yes\nB) No\nC) Eh\nAnswer: B";
const PSYCH_SCRIPT: &str =
    "Question: Do you seek out big gatherings?\nA) Often\nB) Rarely\nC) Never";
const ANALYSIS_SCRIPT: &str = "A strategist at heart, this type pursues long-range plans with \
                               quiet, relentless focus and expects the same rigor from others.";

fn full_engine() -> QuizEngine {
    let backend = ScriptedBackend::new(&[
        ("quiz", QUIZ_SCRIPT),
        ("psych", PSYCH_SCRIPT),
        ("analysis", ANALYSIS_SCRIPT),
    ]);
    EngineBuilder::new()
        .with_model_paths("/m/quiz", "/m/psych", "/m/analysis")
        .with_backend(backend)
        .build()
        .unwrap()
}

/// Engine whose quiz and analysis slots fail to load.
fn degraded_engine() -> QuizEngine {
    let backend = ScriptedBackend::new(&[("psych", PSYCH_SCRIPT)]);
    EngineBuilder::new()
        .with_model_paths("/m/quiz", "/m/psych", "/m/analysis")
        .with_backend(backend)
        .build()
        .unwrap()
}

#[test]
fn quiz_question_comes_back_structured() {
    let engine = full_engine();
    assert!(engine.models_loaded());

    let question = engine.generate_quiz_question("Science", "Easy", "Ada");
    assert_eq!(question.question, "Ok?");
    assert_eq!(question.answers, vec!["Yes", "No", "Eh"]);
    assert_eq!(question.correct_answer_index, 1);
    assert_eq!(question.category, "Science");
    assert_eq!(question.difficulty, "Easy");
    assert!(question.generated);
    assert_eq!(question.model_tag, "Quiz-Model");
    assert_eq!(question.correct_answer_price_multiplier, 0.9);
    assert_eq!(question.steal_chance, 5.0);
}

#[test]
fn unloaded_quiz_slot_degrades_to_flagged_fallback() {
    let engine = degraded_engine();
    assert!(!engine.models_loaded());

    let question = engine.generate_quiz_question("Chemistry", "Medium", "Grace");
    assert!(question.question.contains("Chemistry"));
    assert!(!question.generated);
    assert_eq!(question.model_tag, "Fallback");
    assert_eq!(question.answers.len(), 3);
    assert_eq!(question.correct_answer_index, 0);
    // Modifiers still come from the difficulty table.
    assert_eq!(question.wrong_answer_price_multiplier, 1.3);
}

#[test]
fn psychometric_count_caps_at_facets() {
    let engine = full_engine();

    let questions = engine.generate_psychometric_questions(12);
    assert_eq!(questions.len(), 8);

    let mut seen_ids: Vec<u32> = questions.iter().map(|q| q.id).collect();
    seen_ids.sort_unstable();
    assert_eq!(seen_ids, (1..=8).collect::<Vec<u32>>());

    for question in &questions {
        assert!(["E/I", "S/N", "T/F", "J/P"].contains(&question.dichotomy.label()));
        assert_eq!(question.options, vec!["Often", "Rarely", "Never"]);
        assert!(question.generated);
        assert_eq!(question.question, "Do you seek out big gatherings?");
    }
}

#[test]
fn psychometric_degrades_per_question_when_slot_is_empty() {
    let backend = ScriptedBackend::new(&[("quiz", QUIZ_SCRIPT)]);
    let engine = EngineBuilder::new()
        .with_model_paths("/m/quiz", "/m/psych", "/m/analysis")
        .with_backend(backend)
        .build()
        .unwrap();

    let questions = engine.generate_psychometric_questions(3);
    assert_eq!(questions.len(), 3);
    for question in &questions {
        assert!(!question.generated);
        assert_eq!(question.model_tag, "Fallback");
        assert_eq!(question.options.len(), 3);
        assert!(!question.question.is_empty());
    }
}

#[test]
fn personality_analysis_mixed_scenario_ends_in_p() {
    let engine = full_engine();
    let answers = vec![
        PersonalityAnswer::new(1, 0, "E/I"),
        PersonalityAnswer::new(3, 1, "S/N"),
        PersonalityAnswer::new(5, 0, "T/F"),
        PersonalityAnswer::new(7, 2, "J/P"),
    ];

    let result = engine.analyze_personality(&answers);
    assert_eq!(result.type_code, "ESTP");
    assert_eq!(result.type_code.chars().nth(3), Some('P'));
    assert!(result.confidence > 0.0 && result.confidence <= 1.0);
    assert_eq!(result.scores.len(), 8);
    for dichotomy in [('E', 'I'), ('S', 'N'), ('T', 'F'), ('J', 'P')] {
        let sum = result.scores[&dichotomy.0] + result.scores[&dichotomy.1];
        assert!((sum - 1.0).abs() < 1e-12);
    }
    assert_eq!(result.strengths.len(), 3);
    assert_eq!(result.growth_areas.len(), 3);

    // The analysis model elaborated the description.
    assert!(result.ai_generated);
    assert!(result.description.starts_with("A strategist at heart"));
    assert_eq!(result.analysis_model, "MBTI + Analysis-Model");
}

#[test]
fn personality_analysis_without_analysis_model_uses_static_text() {
    let engine = degraded_engine();
    let result = engine.analyze_personality(&[PersonalityAnswer::new(1, 0, "E/I")]);

    assert!(!result.ai_generated);
    assert_eq!(result.analysis_model, "MBTI-Static");
    assert!(!result.description.is_empty());
    assert!(result.title.starts_with("The "));
}

#[test]
fn long_elaboration_truncates_with_ellipsis() {
    let long_script = "x".repeat(240);
    let backend = ScriptedBackend::new(&[
        ("quiz", QUIZ_SCRIPT),
        ("psych", PSYCH_SCRIPT),
        ("analysis", &long_script),
    ]);
    let engine = EngineBuilder::new()
        .with_model_paths("/m/quiz", "/m/psych", "/m/analysis")
        .with_backend(backend)
        .build()
        .unwrap();
    engine.set_max_tokens(256);

    let result = engine.analyze_personality(&[PersonalityAnswer::new(1, 0, "E/I")]);
    assert!(result.ai_generated);
    assert!(result.description.ends_with("..."));
    assert_eq!(result.description.chars().count(), 203);
}

#[test]
fn stats_track_requests() {
    let engine = full_engine();
    engine.generate_quiz_question("Science", "Easy", "Ada");
    engine.generate_quiz_question("Technology", "Hard", "Ada");
    engine.generate_psychometric_questions(4);
    engine.analyze_personality(&[PersonalityAnswer::new(1, 0, "E/I")]);

    let stats = engine.stats();
    assert_eq!(stats.total_questions_generated, 2);
    assert_eq!(stats.psychometric_questions_generated, 4);
    assert_eq!(stats.personality_analyses, 1);
}

#[test]
fn model_info_reports_slots_and_tunables() {
    let engine = full_engine();
    engine.generate_quiz_question("Science", "Easy", "Ada");

    let info = engine.model_info();
    assert_eq!(info.slots.len(), 3);
    assert_eq!(info.context_size, 1024);
    assert_eq!(info.max_tokens, 128);

    let quiz = info.slots.iter().find(|s| s.task == "quiz").unwrap();
    assert!(quiz.loaded);
    assert_eq!(quiz.name, "Quiz-Model");
    assert!(quiz.usage_count >= 1);
    assert!(quiz.description.is_some());
}

#[test]
fn setters_clamp_into_safe_ranges() {
    let engine = full_engine();
    engine.set_temperature(99.0);
    engine.set_max_tokens(5);
    engine.set_context_size(9000);

    let info = engine.model_info();
    assert!((info.temperature - 1.5).abs() < f32::EPSILON);
    assert_eq!(info.max_tokens, 32);
    assert_eq!(info.context_size, 2048);
}

#[test]
fn reload_keeps_working_slots_loaded() {
    let engine = full_engine();
    engine.generate_quiz_question("Science", "Easy", "Ada");

    assert!(engine.reload_models());
    assert!(engine.models_loaded());

    // Usage counters survive the reload.
    let info = engine.model_info();
    let quiz = info.slots.iter().find(|s| s.task == "quiz").unwrap();
    assert!(quiz.usage_count >= 1);

    let question = engine.generate_quiz_question("Science", "Easy", "Ada");
    assert!(question.generated);
}

#[test]
fn metadata_getters_expose_static_tables() {
    let engine = full_engine();
    assert_eq!(engine.categories().len(), 4);
    assert_eq!(engine.difficulties().len(), 3);
    assert_eq!(engine.personality_traits().len(), 4);
    assert_eq!(engine.personality_types().len(), 16);
    assert_eq!(engine.category_topics()["Science"].len(), 4);
}
