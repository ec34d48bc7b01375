//! Static knowledge bases: prompt templates, difficulty modifiers, and the
//! per-type personality content. Populated once at startup and read-only
//! afterwards; this is configuration data, not logic.

use std::collections::HashMap;
use lazy_static::lazy_static;

use crate::scoring::Dichotomy;

pub const CATEGORIES: [&str; 4] = ["Science", "Technology", "Mathematics", "Engineering"];
pub const DIFFICULTIES: [&str; 3] = ["Easy", "Medium", "Hard"];

pub const FALLBACK_CATEGORY: &str = "Science";
pub const FALLBACK_DIFFICULTY: &str = "Medium";

/// Price/steal modifiers attached to a question, looked up from its
/// difficulty (never computed).
#[derive(Debug, Clone, Copy)]
pub struct DifficultyModifiers {
    pub correct_price_multiplier: f64,
    pub wrong_price_multiplier: f64,
    pub steal_chance: f64,
    pub steal_percentage: f64,
}

/// One psychometric facet: a dichotomy sub-topic used to diversify
/// generated questions.
#[derive(Debug, Clone, Copy)]
pub struct Facet {
    pub name: &'static str,
    pub dichotomy: Dichotomy,
}

/// Fixed facet order; question ids are assigned from positions here, which
/// keeps ids 1-2 on E/I, 3-4 on S/N, 5-6 on T/F and 7-8 on J/P — the same
/// banding the scoring engine assumes.
pub const FACETS: [Facet; 8] = [
    Facet { name: "E/I_Social", dichotomy: Dichotomy::EI },
    Facet { name: "E/I_Energy", dichotomy: Dichotomy::EI },
    Facet { name: "S/N_Information", dichotomy: Dichotomy::SN },
    Facet { name: "S/N_Future", dichotomy: Dichotomy::SN },
    Facet { name: "T/F_Decisions", dichotomy: Dichotomy::TF },
    Facet { name: "T/F_Conflict", dichotomy: Dichotomy::TF },
    Facet { name: "J/P_Structure", dichotomy: Dichotomy::JP },
    Facet { name: "J/P_Deadlines", dichotomy: Dichotomy::JP },
];

const QUIZ_PROMPT_SUFFIX: &str =
    "Question: [question]? A) [option1] B) [option2] C) [option3] Answer: [A/B/C]\nQuestion:";

const PSYCHOMETRIC_FALLBACK_PROMPT: &str =
    "Create a personality question with 3 options. \
     Question: [question]? A) [option1] B) [option2] C) [option3]\nQuestion:";

lazy_static! {
    static ref DIFFICULTY_MODIFIERS: HashMap<&'static str, DifficultyModifiers> = {
        let mut m = HashMap::new();
        m.insert("Easy", DifficultyModifiers {
            correct_price_multiplier: 0.9,
            wrong_price_multiplier: 1.1,
            steal_chance: 5.0,
            steal_percentage: 2.0,
        });
        m.insert("Medium", DifficultyModifiers {
            correct_price_multiplier: 0.8,
            wrong_price_multiplier: 1.3,
            steal_chance: 15.0,
            steal_percentage: 5.0,
        });
        m.insert("Hard", DifficultyModifiers {
            correct_price_multiplier: 0.6,
            wrong_price_multiplier: 1.5,
            steal_chance: 25.0,
            steal_percentage: 10.0,
        });
        m
    };

    /// (category, difficulty) -> quiz prompt. Prompts stay short and
    /// pattern-heavy so small models imitate the answer format.
    static ref QUIZ_PROMPTS: HashMap<(&'static str, &'static str), String> = {
        let subjects: [(&str, &str); 4] = [
            ("Science", "science"),
            ("Technology", "tech"),
            ("Mathematics", "math"),
            ("Engineering", "engineering"),
        ];
        let levels: [(&str, &str); 3] = [
            ("Easy", "a basic"),
            ("Medium", "a"),
            ("Hard", "an advanced"),
        ];

        let mut m = HashMap::new();
        for (category, subject) in subjects {
            for (difficulty, level) in levels {
                // "a engineering" reads badly; the unqualified Medium level
                // takes "an" before a vowel.
                let lead = if level == "a" && subject.starts_with('e') {
                    "an"
                } else {
                    level
                };
                m.insert(
                    (category, difficulty),
                    format!("Create {lead} {subject} question with 3 options. {QUIZ_PROMPT_SUFFIX}"),
                );
            }
        }
        m
    };

    /// Facet name -> psychometric prompt. Option placeholders name the
    /// pole each slot leans toward.
    static ref PSYCHOMETRIC_PROMPTS: HashMap<&'static str, String> = {
        let topics: [(&str, &str); 8] = [
            ("E/I_Social", "social preferences"),
            ("E/I_Energy", "energy and social recharging"),
            ("S/N_Information", "information processing"),
            ("S/N_Future", "future planning"),
            ("T/F_Decisions", "decision making"),
            ("T/F_Conflict", "handling conflict"),
            ("J/P_Structure", "structure and organization"),
            ("J/P_Deadlines", "deadlines and time management"),
        ];
        let poles: [(&str, &str, &str); 4] = [
            ("E/I", "extroverted", "introverted"),
            ("S/N", "sensing", "intuition"),
            ("T/F", "thinking", "feeling"),
            ("J/P", "judging", "perceiving"),
        ];

        let mut m = HashMap::new();
        for (facet, topic) in topics {
            let (_, positive, negative) = poles
                .iter()
                .find(|(label, _, _)| facet.starts_with(label))
                .copied()
                .unwrap_or(("", "option1", "option3"));
            m.insert(
                facet,
                format!(
                    "Create a personality question about {topic}. \
                     Question: [question]? A) [{positive}] B) [neutral] C) [{negative}]\nQuestion:"
                ),
            );
        }
        m
    };

    static ref TYPE_PROFILES: HashMap<&'static str, (&'static str, &'static str)> = {
        let mut m = HashMap::new();
        m.insert("INTJ", ("The Architect", "Strategic, independent, and driven by their vision."));
        m.insert("INTP", ("The Thinker", "Analytical, innovative, and fascinated by concepts."));
        m.insert("ENTJ", ("The Commander", "Bold, strategic leaders who organize resources."));
        m.insert("ENTP", ("The Debater", "Curious, innovative, and excellent at generating ideas."));
        m.insert("INFJ", ("The Advocate", "Idealistic, principled, and driven to help others."));
        m.insert("INFP", ("The Mediator", "Creative, caring, and guided by values."));
        m.insert("ENFJ", ("The Protagonist", "Charismatic, inspiring leaders who care about others."));
        m.insert("ENFP", ("The Campaigner", "Enthusiastic, creative, and socially free-spirited."));
        m.insert("ISTJ", ("The Logistician", "Practical, reliable, and committed to duties."));
        m.insert("ISFJ", ("The Protector", "Caring, loyal, and ready to defend loved ones."));
        m.insert("ESTJ", ("The Executive", "Organized, practical leaders who get things done."));
        m.insert("ESFJ", ("The Consul", "Caring, social, and eager to help others succeed."));
        m.insert("ISTP", ("The Virtuoso", "Practical, observant, skilled at understanding things."));
        m.insert("ISFP", ("The Adventurer", "Gentle, caring, eager to explore possibilities."));
        m.insert("ESTP", ("The Entrepreneur", "Energetic, perceptive, skilled at adapting."));
        m.insert("ESFP", ("The Entertainer", "Enthusiastic, spontaneous, eager to help others have fun."));
        m
    };

    static ref STRENGTHS: HashMap<&'static str, [&'static str; 3]> = {
        let mut m = HashMap::new();
        m.insert("INTJ", ["Strategic thinking", "Independent problem-solving", "Long-term vision"]);
        m.insert("INTP", ["Logical analysis", "Creative problem-solving", "Intellectual curiosity"]);
        m.insert("ENTJ", ["Leadership", "Strategic planning", "Decision-making"]);
        m.insert("ENTP", ["Innovation", "Enthusiasm", "Communication"]);
        m.insert("INFJ", ["Empathy", "Insight", "Idealism"]);
        m.insert("INFP", ["Authenticity", "Creativity", "Compassion"]);
        m.insert("ENFJ", ["Inspiring others", "Communication", "Empathy"]);
        m.insert("ENFP", ["Enthusiasm", "Creativity", "People skills"]);
        m.insert("ISTJ", ["Reliability", "Organization", "Attention to detail"]);
        m.insert("ISFJ", ["Caring nature", "Loyalty", "Supportiveness"]);
        m.insert("ESTJ", ["Leadership", "Organization", "Efficiency"]);
        m.insert("ESFJ", ["People skills", "Organization", "Loyalty"]);
        m.insert("ISTP", ["Problem-solving", "Practical skills", "Adaptability"]);
        m.insert("ISFP", ["Creativity", "Empathy", "Authenticity"]);
        m.insert("ESTP", ["Adaptability", "People skills", "Problem-solving"]);
        m.insert("ESFP", ["Enthusiasm", "People skills", "Creativity"]);
        m
    };

    static ref GROWTH_AREAS: HashMap<&'static str, [&'static str; 3]> = {
        let mut m = HashMap::new();
        m.insert("INTJ", ["Interpersonal communication", "Flexibility", "Patience"]);
        m.insert("INTP", ["Follow-through", "Practical application", "Time management"]);
        m.insert("ENTJ", ["Patience", "Active listening", "Work-life balance"]);
        m.insert("ENTP", ["Focus and follow-through", "Attention to detail", "Routine tasks"]);
        m.insert("INFJ", ["Assertiveness", "Practical decisions", "Self-care"]);
        m.insert("INFP", ["Structure", "Deadlines", "Conflict handling"]);
        m.insert("ENFJ", ["Personal boundaries", "Self-focus", "Saying no"]);
        m.insert("ENFP", ["Organization", "Follow-through", "Detail attention"]);
        m.insert("ISTJ", ["Flexibility", "Innovation", "Emotional expression"]);
        m.insert("ISFJ", ["Assertiveness", "Personal needs", "Change adaptation"]);
        m.insert("ESTJ", ["Emotional awareness", "Flexibility", "Patience"]);
        m.insert("ESFJ", ["Personal boundaries", "Criticism handling", "Self-advocacy"]);
        m.insert("ISTP", ["Long-term planning", "Emotional expression", "Teamwork"]);
        m.insert("ISFP", ["Assertiveness", "Structure", "Conflict engagement"]);
        m.insert("ESTP", ["Long-term planning", "Detail attention", "Reflection"]);
        m.insert("ESFP", ["Organization", "Long-term focus", "Criticism handling"]);
        m
    };

    static ref CATEGORY_TOPICS: HashMap<&'static str, [&'static str; 4]> = {
        let mut m = HashMap::new();
        m.insert("Science", ["Physics", "Chemistry", "Biology", "Earth Science"]);
        m.insert("Technology", ["Programming", "Computer Science", "AI", "Networking"]);
        m.insert("Mathematics", ["Algebra", "Geometry", "Calculus", "Statistics"]);
        m.insert("Engineering", ["Civil", "Mechanical", "Electrical", "Software"]);
        m
    };
}

/// Quiz prompt for a category/difficulty pair, falling back to
/// Science/Medium for unconfigured values.
pub fn quiz_prompt(category: &str, difficulty: &str) -> &'static str {
    let category = if CATEGORIES.contains(&category) {
        category
    } else {
        FALLBACK_CATEGORY
    };
    let difficulty = if DIFFICULTIES.contains(&difficulty) {
        difficulty
    } else {
        FALLBACK_DIFFICULTY
    };

    QUIZ_PROMPTS
        .iter()
        .find(|((c, d), _)| *c == category && *d == difficulty)
        .map(|(_, prompt)| prompt.as_str())
        .unwrap_or(QUIZ_PROMPT_SUFFIX)
}

/// Psychometric prompt for a facet, with a generic fallback for unknown
/// facet names.
pub fn psychometric_prompt(facet: &str) -> &'static str {
    PSYCHOMETRIC_PROMPTS
        .get(facet)
        .map(|p| p.as_str())
        .unwrap_or(PSYCHOMETRIC_FALLBACK_PROMPT)
}

/// Modifiers for a difficulty, falling back to Medium.
pub fn difficulty_modifiers(difficulty: &str) -> DifficultyModifiers {
    DIFFICULTY_MODIFIERS
        .get(difficulty)
        .or_else(|| DIFFICULTY_MODIFIERS.get(FALLBACK_DIFFICULTY))
        .copied()
        .unwrap_or(DifficultyModifiers {
            correct_price_multiplier: 0.8,
            wrong_price_multiplier: 1.3,
            steal_chance: 15.0,
            steal_percentage: 5.0,
        })
}

/// Title and baseline description for a type code. Unknown codes get a
/// generic profile; the table covers all 16 codes in normal operation.
pub fn type_profile(code: &str) -> (&'static str, &'static str) {
    TYPE_PROFILES.get(code).copied().unwrap_or((
        "Unique Personality",
        "A distinctive personality pattern with unique traits.",
    ))
}

pub fn strengths(code: &str) -> Vec<String> {
    STRENGTHS
        .get(code)
        .map(|items| items.iter().map(|s| s.to_string()).collect())
        .unwrap_or_else(|| {
            vec![
                "Unique perspective".to_string(),
                "Personal authenticity".to_string(),
                "Individual strengths".to_string(),
            ]
        })
}

pub fn growth_areas(code: &str) -> Vec<String> {
    GROWTH_AREAS
        .get(code)
        .map(|items| items.iter().map(|s| s.to_string()).collect())
        .unwrap_or_else(|| {
            vec![
                "Continued learning".to_string(),
                "Skill development".to_string(),
                "Personal growth".to_string(),
            ]
        })
}

pub fn category_topics() -> HashMap<String, Vec<String>> {
    CATEGORY_TOPICS
        .iter()
        .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
        .collect()
}

/// Human-readable names of the four dichotomies.
pub fn trait_names() -> Vec<String> {
    vec![
        "Extroversion/Introversion".to_string(),
        "Sensing/Intuition".to_string(),
        "Thinking/Feeling".to_string(),
        "Judging/Perceiving".to_string(),
    ]
}

/// The 16 known type codes, sorted.
pub fn personality_types() -> Vec<String> {
    let mut types: Vec<String> = TYPE_PROFILES.keys().map(|k| k.to_string()).collect();
    types.sort();
    types
}
