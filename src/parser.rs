//! Tolerant extraction of structured fields from raw generated text.
//!
//! Small models rarely follow the prompt format exactly, so every
//! extractor pairs a pattern with a deterministic fallback; callers always
//! get a usable structure no matter what the model produced.

use lazy_static::lazy_static;
use rand::distributions::{Distribution, WeightedIndex};
use regex::Regex;

use crate::scoring::Dichotomy;
use crate::templates;
use crate::types::{PsychometricQuestion, QuizQuestion};

/// Fallback weights over answer indices 0/1/2 when no explicit answer
/// marker is present, biased toward the first option.
const ANSWER_FALLBACK_WEIGHTS: [u32; 3] = [50, 30, 20];

const OPTION_COUNT: usize = 3;

lazy_static! {
    static ref QUESTION_RE: Regex = Regex::new(r"Question:\s*([^?]+\?)").unwrap();
    /// Any first sentence ending in a question mark.
    static ref ANY_QUESTION_RE: Regex = Regex::new(r"([^.!?]*\?)").unwrap();
    /// "A) ...", "B) ...", "C) ..." fragments; the fragment runs until the
    /// next option letter or line break.
    static ref OPTION_RE: Regex = Regex::new(r"[ABC]\)\s*([^AB\n]+)").unwrap();
    static ref ANSWER_RE: Regex = Regex::new(r"Answer:\s*([ABC])").unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
    static ref TRAILING_PUNCT_RE: Regex = Regex::new(r"[,;]\s*$").unwrap();
}

fn tidy(fragment: &str) -> String {
    let collapsed = WHITESPACE_RE.replace_all(fragment, " ");
    TRAILING_PUNCT_RE.replace(collapsed.trim(), "").into_owned()
}

/// Extract the question text: a "Question:" span ending in "?", or any
/// sentence ending in "?", or empty when neither exists (the caller then
/// substitutes a templated default).
pub fn extract_question(text: &str) -> String {
    for pattern in [&*QUESTION_RE, &*ANY_QUESTION_RE] {
        if let Some(captures) = pattern.captures(text) {
            let question = tidy(&captures[1]);
            if !question.is_empty() {
                return question;
            }
        }
    }
    String::new()
}

fn extract_fragments(text: &str) -> Vec<String> {
    OPTION_RE
        .captures_iter(text)
        .map(|captures| tidy(&captures[1]))
        .filter(|fragment| !fragment.is_empty())
        .take(OPTION_COUNT)
        .collect()
}

/// Quiz answers: always exactly three entries, padded with numbered
/// placeholders when the model produced fewer.
pub fn extract_answers(text: &str) -> Vec<String> {
    let mut answers = extract_fragments(text);
    while answers.len() < OPTION_COUNT {
        answers.push(format!("Option {}", answers.len() + 1));
    }
    answers
}

/// Psychometric options: same scan, but missing slots fill with the
/// agree/neutral/disagree scale positions.
pub fn extract_options(text: &str) -> Vec<String> {
    const SCALE: [&str; 3] = ["Strongly agree", "Neutral", "Strongly disagree"];
    let mut options = extract_fragments(text);
    while options.len() < OPTION_COUNT {
        options.push(SCALE[options.len()].to_string());
    }
    options
}

/// The correct answer index: an explicit "Answer: A/B/C" marker when
/// present, otherwise a weighted draw over {0,1,2} with the fixed
/// 50/30/20 bias toward the first option.
pub fn extract_correct_answer(text: &str) -> usize {
    if let Some(captures) = ANSWER_RE.captures(text) {
        let letter = captures[1].chars().next().unwrap_or('A');
        return (letter as usize).saturating_sub('A' as usize).min(2);
    }

    match WeightedIndex::new(ANSWER_FALLBACK_WEIGHTS) {
        Ok(dist) => dist.sample(&mut rand::thread_rng()),
        Err(_) => 0,
    }
}

/// Assemble a quiz question from raw model output, applying every fallback
/// and the difficulty's price/steal modifiers. `generated` flags whether
/// any model text backed the result.
pub fn parse_quiz_response(response: &str, category: &str, difficulty: &str) -> QuizQuestion {
    let mut question = extract_question(response);
    if question.is_empty() {
        question = format!("What is a fundamental concept in {category}?");
    }

    let answers = extract_answers(response);
    let correct_answer_index = extract_correct_answer(response).min(2);

    let modifiers = templates::difficulty_modifiers(difficulty);

    QuizQuestion {
        question,
        answers,
        correct_answer_index,
        category: category.to_string(),
        difficulty: difficulty.to_string(),
        correct_answer_price_multiplier: modifiers.correct_price_multiplier,
        wrong_answer_price_multiplier: modifiers.wrong_price_multiplier,
        steal_chance: modifiers.steal_chance,
        steal_percentage: modifiers.steal_percentage,
        generated: !response.is_empty(),
        model_tag: String::new(),
        generation_time_ms: 0,
    }
}

/// Assemble a psychometric question from raw model output.
pub fn parse_psychometric_response(
    response: &str,
    id: u32,
    dichotomy: Dichotomy,
    facet: &str,
) -> PsychometricQuestion {
    let mut question = extract_question(response);
    if question.is_empty() {
        question = "How would you describe yourself in most situations?".to_string();
    }

    PsychometricQuestion {
        id,
        question,
        options: extract_options(response),
        dichotomy,
        category: facet.to_string(),
        generated: !response.is_empty(),
        model_tag: String::new(),
        generation_time_ms: 0,
    }
}
