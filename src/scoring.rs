//! Deterministic personality scoring.
//!
//! Answers accumulate into per-letter trait scores through an
//! order-sensitive running mean, then the four winning letters form the
//! type code. Everything here is pure; the model-elaborated description
//! lives in the facade.

use std::collections::BTreeMap;
use std::fmt;
use serde::{Deserialize, Serialize};

use crate::types::PersonalityAnswer;

/// The four binary personality axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dichotomy {
    #[serde(rename = "E/I")]
    EI,
    #[serde(rename = "S/N")]
    SN,
    #[serde(rename = "T/F")]
    TF,
    #[serde(rename = "J/P")]
    JP,
}

impl Dichotomy {
    pub const ALL: [Dichotomy; 4] = [Dichotomy::EI, Dichotomy::SN, Dichotomy::TF, Dichotomy::JP];

    /// The label form used in facet names and answer payloads.
    pub fn label(self) -> &'static str {
        match self {
            Dichotomy::EI => "E/I",
            Dichotomy::SN => "S/N",
            Dichotomy::TF => "T/F",
            Dichotomy::JP => "J/P",
        }
    }

    /// First-listed letter of the pair; the one a directional score of 0.8
    /// pulls toward, and the tie-break winner.
    pub fn positive(self) -> char {
        match self {
            Dichotomy::EI => 'E',
            Dichotomy::SN => 'S',
            Dichotomy::TF => 'T',
            Dichotomy::JP => 'J',
        }
    }

    pub fn negative(self) -> char {
        match self {
            Dichotomy::EI => 'I',
            Dichotomy::SN => 'N',
            Dichotomy::TF => 'F',
            Dichotomy::JP => 'P',
        }
    }

    /// Fixed question-id banding: 1-2, 3-4, 5-6, then everything else.
    /// The answer's own trait label never overrides this.
    pub fn from_question_id(id: u32) -> Self {
        match id {
            0..=2 => Dichotomy::EI,
            3..=4 => Dichotomy::SN,
            5..=6 => Dichotomy::TF,
            _ => Dichotomy::JP,
        }
    }
}

impl fmt::Display for Dichotomy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// All eight letters at the maximally neutral starting point.
fn neutral_scores() -> BTreeMap<char, f64> {
    let mut scores = BTreeMap::new();
    for dichotomy in Dichotomy::ALL {
        scores.insert(dichotomy.positive(), 0.5);
        scores.insert(dichotomy.negative(), 0.5);
    }
    scores
}

/// Directional score of one answer: option 0 pulls toward the positive
/// letter, option 2 away, anything else is neutral.
fn directional_score(selected_option: u8) -> f64 {
    match selected_option {
        0 => 0.8,
        2 => 0.2,
        _ => 0.5,
    }
}

/// Accumulate trait scores from an answer sequence.
///
/// Each answer updates its dichotomy's positive letter as the mean of the
/// prior value and the new directional score, so later answers weigh more
/// than earlier ones. The paired letter is kept at `1 - positive`, which
/// makes every pair sum to exactly 1.
pub fn trait_scores(answers: &[PersonalityAnswer]) -> BTreeMap<char, f64> {
    let mut scores = neutral_scores();

    for answer in answers {
        let dichotomy = Dichotomy::from_question_id(answer.question_id);
        let score = directional_score(answer.selected_option);

        let positive = dichotomy.positive();
        let negative = dichotomy.negative();

        let updated = (scores[&positive] + score) / 2.0;
        scores.insert(positive, updated);
        scores.insert(negative, 1.0 - updated);
    }

    scores
}

/// Derive the 4-letter type code, one winning letter per dichotomy.
/// Ties resolve toward the first-listed letter (E, S, T, J).
pub fn classify(scores: &BTreeMap<char, f64>) -> String {
    Dichotomy::ALL
        .iter()
        .map(|d| {
            let positive = scores.get(&d.positive()).copied().unwrap_or(0.5);
            let negative = scores.get(&d.negative()).copied().unwrap_or(0.5);
            if positive >= negative {
                d.positive()
            } else {
                d.negative()
            }
        })
        .collect()
}

/// Classification confidence in [0, 1]: the mean distance of each
/// dichotomy's winning score from neutral, scaled so that all-extreme
/// scores give 1.0.
pub fn confidence(scores: &BTreeMap<char, f64>) -> f64 {
    let total: f64 = Dichotomy::ALL
        .iter()
        .map(|d| {
            let positive = scores.get(&d.positive()).copied().unwrap_or(0.5);
            let negative = scores.get(&d.negative()).copied().unwrap_or(0.5);
            (positive.max(negative) - 0.5).abs()
        })
        .sum();

    (total / Dichotomy::ALL.len() as f64 * 2.0).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn answer(id: u32, option: u8, label: &str) -> PersonalityAnswer {
        PersonalityAnswer::new(id, option, label)
    }

    #[test]
    fn test_neutral_start() {
        let scores = trait_scores(&[]);
        assert_eq!(scores.len(), 8);
        for value in scores.values() {
            assert_eq!(*value, 0.5);
        }
        assert_eq!(classify(&scores), "ESTJ");
        assert_eq!(confidence(&scores), 0.0);
    }

    #[test]
    fn test_pairs_sum_to_one() {
        let answers = vec![
            answer(1, 0, "E/I"),
            answer(2, 2, "E/I"),
            answer(3, 0, "S/N"),
            answer(5, 1, "T/F"),
            answer(7, 2, "J/P"),
            answer(9, 0, "J/P"),
        ];
        let scores = trait_scores(&answers);
        for dichotomy in Dichotomy::ALL {
            let sum = scores[&dichotomy.positive()] + scores[&dichotomy.negative()];
            assert!((sum - 1.0).abs() < 1e-12);
        }
        for value in scores.values() {
            assert!((0.0..=1.0).contains(value));
        }
    }

    #[test]
    fn test_running_mean_is_order_sensitive() {
        // Two option-0 answers on the same dichotomy: (0.5+0.8)/2 = 0.65,
        // then (0.65+0.8)/2 = 0.725.
        let scores = trait_scores(&[answer(1, 0, "E/I"), answer(2, 0, "E/I")]);
        assert!((scores[&'E'] - 0.725).abs() < 1e-12);

        // Opposite order of a mixed pair lands elsewhere than the plain
        // average would.
        let first = trait_scores(&[answer(1, 0, "E/I"), answer(2, 2, "E/I")]);
        let second = trait_scores(&[answer(1, 2, "E/I"), answer(2, 0, "E/I")]);
        assert!((first[&'E'] - second[&'E']).abs() > 1e-6);
    }

    #[test]
    fn test_question_id_banding_ignores_label() {
        // Declared label says E/I, but id 7 belongs to J/P.
        let scores = trait_scores(&[answer(7, 0, "E/I")]);
        assert_eq!(scores[&'E'], 0.5);
        assert!((scores[&'J'] - 0.65).abs() < 1e-12);
    }

    #[test]
    fn test_classify_alphabet() {
        let alphabets: [&[char]; 4] = [&['E', 'I'], &['S', 'N'], &['T', 'F'], &['J', 'P']];
        let cases: Vec<Vec<PersonalityAnswer>> = vec![
            vec![],
            vec![answer(1, 0, ""), answer(3, 2, ""), answer(5, 0, ""), answer(8, 2, "")],
            vec![answer(1, 2, ""), answer(4, 0, ""), answer(6, 2, ""), answer(7, 0, "")],
        ];
        for answers in cases {
            let code = classify(&trait_scores(&answers));
            assert_eq!(code.len(), 4);
            for (i, letter) in code.chars().enumerate() {
                assert!(alphabets[i].contains(&letter), "bad letter {letter} at {i}");
            }
        }
    }

    #[test]
    fn test_mixed_answer_scenario_ends_in_p() {
        let answers = vec![
            answer(1, 0, "E/I"),
            answer(3, 1, "S/N"),
            answer(5, 0, "T/F"),
            answer(7, 2, "J/P"),
        ];
        let scores = trait_scores(&answers);
        assert!((scores[&'E'] - 0.65).abs() < 1e-12);
        assert_eq!(scores[&'S'], 0.5);
        assert!((scores[&'T'] - 0.65).abs() < 1e-12);
        assert!((scores[&'P'] - 0.65).abs() < 1e-12);

        let code = classify(&scores);
        assert_eq!(code.chars().nth(3), Some('P'));
        assert_eq!(code, "ESTP");
    }

    #[test]
    fn test_confidence_bounds() {
        let neutral = trait_scores(&[]);
        assert_eq!(confidence(&neutral), 0.0);

        let mut extreme = BTreeMap::new();
        for dichotomy in Dichotomy::ALL {
            extreme.insert(dichotomy.positive(), 1.0);
            extreme.insert(dichotomy.negative(), 0.0);
        }
        assert_eq!(confidence(&extreme), 1.0);

        let some = trait_scores(&[answer(1, 0, ""), answer(5, 2, "")]);
        let value = confidence(&some);
        assert!(value > 0.0 && value < 1.0);
    }
}
