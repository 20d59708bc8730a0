// File: src/core/validator.rs
use serde::{Serialize, Serializer};
use std::fmt;

const NUMBER_PENALTY: f64 = 0.3;
const ENTITY_PENALTY: f64 = 0.2;
const LENGTH_PENALTY: f64 = 0.1;
/// A translation longer than this many times its source is suspect...
const LENGTH_RATIO: usize = 4;
/// ...unless the source is this short or shorter.
const MIN_SOURCE_LEN: usize = 5;

const NUMBER_WORDS: [(&str, &str); 5] = [("1", "one"), ("2", "two"), ("3", "three"), ("10", "ten"), ("5", "five")];

const ENTITY_GLOSSES: [(&str, &[&str]); 5] = [
    ("KÙ.BABBAR", &["silver", "money"]),
    ("KÙ.GI", &["gold"]),
    ("AN.NA", &["tin", "lead"]),
    ("TÚG", &["textile", "garment", "cloth"]),
    ("DUMU", &["son"]),
];

/// A consistency problem found in a candidate translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFlag {
    MissingNumber(String),
    MissingEntity(String),
    PossibleHallucinationLength,
}

impl fmt::Display for ValidationFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationFlag::MissingNumber(n) => write!(f, "MISSING_NUMBER_{}", n),
            ValidationFlag::MissingEntity(key) => write!(f, "MISSING_ENTITY_{}", key),
            ValidationFlag::PossibleHallucinationLength => f.write_str("POSSIBLE_HALLUCINATION_LENGTH"),
        }
    }
}

impl Serialize for ValidationFlag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Confidence in [0, 1] plus the flags that lowered it, in check order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub score: f64,
    pub flags: Vec<ValidationFlag>,
}

impl ValidationResult {
    pub fn flag_codes(&self) -> Vec<String> {
        self.flags.iter().map(ToString::to_string).collect()
    }
}

/// Judges a neural translation against its transliterated source.
///
/// Only produces a score; accept/reject thresholds belong to the caller.
#[derive(Debug, Clone)]
pub struct ConsistencyValidator {
    number_words: Vec<(String, String)>,
    entity_glosses: Vec<(String, Vec<String>)>,
}

impl Default for ConsistencyValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsistencyValidator {
    pub fn new() -> Self {
        Self {
            number_words: NUMBER_WORDS
                .iter()
                .map(|&(d, w)| (d.to_string(), w.to_string()))
                .collect(),
            entity_glosses: ENTITY_GLOSSES
                .iter()
                .map(|&(key, words)| (key.to_string(), words.iter().map(|w| w.to_string()).collect()))
                .collect(),
        }
    }

    fn number_word<'a>(&'a self, digits: &'a str) -> &'a str {
        self.number_words
            .iter()
            .find(|(d, _)| d == digits)
            .map_or(digits, |(_, w)| w.as_str())
    }

    pub fn validate(&self, source: &str, translation: &str) -> ValidationResult {
        let mut flags = Vec::new();
        let mut score = 1.0_f64;
        let translation_lower = translation.to_lowercase();

        // 1. Numbers must survive, as digits or as a word.
        for digits in distinct_digit_runs(source) {
            let word = self.number_word(digits);
            if !translation.contains(digits) && !translation_lower.contains(word) {
                flags.push(ValidationFlag::MissingNumber(digits.to_string()));
                score -= NUMBER_PENALTY;
            }
        }

        // 2. Commodity and kinship logograms need a matching gloss.
        for (key, glosses) in &self.entity_glosses {
            if source.contains(key.as_str()) && !glosses.iter().any(|g| translation_lower.contains(g.as_str())) {
                flags.push(ValidationFlag::MissingEntity(key.clone()));
                score -= ENTITY_PENALTY;
            }
        }

        // 3. Runaway length.
        let source_len = source.chars().count();
        if translation.chars().count() > source_len * LENGTH_RATIO && source_len > MIN_SOURCE_LEN {
            flags.push(ValidationFlag::PossibleHallucinationLength);
            score -= LENGTH_PENALTY;
        }

        ValidationResult {
            score: score.max(0.0),
            flags,
        }
    }
}

/// Maximal ASCII digit runs, deduplicated, in order of first appearance.
///
/// Digits are `0`-`9` only, matching [`is_numeric`](crate::core::types::is_numeric).
fn distinct_digit_runs(text: &str) -> Vec<&str> {
    let mut runs: Vec<&str> = Vec::new();
    let mut start = None;

    for (i, c) in text.char_indices().chain(std::iter::once((text.len(), ' '))) {
        match (c.is_ascii_digit(), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                let run = &text[s..i];
                if !runs.contains(&run) {
                    runs.push(run);
                }
                start = None;
            }
            _ => {}
        }
    }
    runs
}
