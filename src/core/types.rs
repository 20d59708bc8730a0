// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single transliterated sign as emitted by the upstream tokenizer.
/// Logogram-internal dots (e.g. "É.GAL") are part of the token.
pub type Token = String;

/// The marker the upstream tokenizer emits for a damaged sign.
pub const CORRUPTION_MARKER: &str = "[BROKEN]";

/// Gloss rendered in place of a corrupt sign.
pub const CORRUPT_GLOSS: &str = "[...]";

/// Grammatical tag carried by a sense. Unknown tags are kept verbatim
/// and route to the "other" bucket during reconstruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SenseType {
    Role,
    Person,
    VerbRoot,
    Prep,
    Obj,
    Loc,
    Num,
    Adj,
    Suffix,
    #[default]
    Misc,
    Other(String),
}

impl SenseType {
    pub fn as_str(&self) -> &str {
        match self {
            SenseType::Role => "ROLE",
            SenseType::Person => "PERSON",
            SenseType::VerbRoot => "VERB_ROOT",
            SenseType::Prep => "PREP",
            SenseType::Obj => "OBJ",
            SenseType::Loc => "LOC",
            SenseType::Num => "NUM",
            SenseType::Adj => "ADJ",
            SenseType::Suffix => "SUFFIX",
            SenseType::Misc => "MISC",
            SenseType::Other(tag) => tag,
        }
    }
}

impl From<String> for SenseType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "ROLE" => SenseType::Role,
            "PERSON" => SenseType::Person,
            "VERB_ROOT" => SenseType::VerbRoot,
            "PREP" => SenseType::Prep,
            "OBJ" => SenseType::Obj,
            "LOC" => SenseType::Loc,
            "NUM" => SenseType::Num,
            "ADJ" => SenseType::Adj,
            "SUFFIX" => SenseType::Suffix,
            "MISC" => SenseType::Misc,
            _ => SenseType::Other(tag),
        }
    }
}

impl From<&str> for SenseType {
    fn from(tag: &str) -> Self {
        SenseType::from(tag.to_string())
    }
}

impl From<SenseType> for String {
    fn from(kind: SenseType) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for SenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reading of a sign: its grammatical tag, English gloss and an
/// optional prime weight used by the fingerprint hasher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sense {
    #[serde(rename = "type", default)]
    pub kind: SenseType,
    #[serde(default)]
    pub english: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prime: Option<u64>,
}

impl Sense {
    pub fn new(kind: impl Into<SenseType>, english: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            english: english.into(),
            prime: None,
        }
    }

    pub fn with_prime(mut self, prime: u64) -> Self {
        self.prime = Some(prime);
        self
    }
}

/// Left-context guard on a candidate sense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// The previous raw token is a numeric literal.
    PrevNumeric,
    /// The previous raw token equals this string exactly.
    PrevLiteral(String),
}

impl Rule {
    /// Parses the `prev` value of a cipher rule.
    pub fn from_prev(prev: &str) -> Self {
        if prev == "NUMERIC" {
            Rule::PrevNumeric
        } else {
            Rule::PrevLiteral(prev.to_string())
        }
    }

    pub fn matches(&self, prev: Option<&str>) -> bool {
        match (self, prev) {
            (_, None) => false,
            (Rule::PrevNumeric, Some(p)) => is_numeric(p),
            (Rule::PrevLiteral(expected), Some(p)) => expected == p,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub sense: Sense,
    pub rule: Option<Rule>,
}

impl Candidate {
    pub fn new(sense: Sense, rule: Option<Rule>) -> Self {
        Self { sense, rule }
    }
}

/// A cipher table value, decided once at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CipherEntry {
    Fixed(Sense),
    /// Non-empty, in the order given by the cipher source.
    Candidates(Vec<Candidate>),
}

impl CipherEntry {
    /// Declared prime of a fixed entry. Ambiguous entries carry none.
    pub fn prime(&self) -> Option<u64> {
        match self {
            CipherEntry::Fixed(sense) => sense.prime,
            CipherEntry::Candidates(_) => None,
        }
    }
}

/// Per-position output of the disambiguator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClassifiedToken {
    Numeric { raw: String },
    Corrupt { gloss: String },
    Quarantined { placeholder: String },
    Resolved { sense: Sense },
}

impl ClassifiedToken {
    pub fn corrupt() -> Self {
        ClassifiedToken::Corrupt {
            gloss: CORRUPT_GLOSS.to_string(),
        }
    }

    /// Text contributed by this token to a reconstructed sentence.
    pub fn gloss(&self) -> &str {
        match self {
            ClassifiedToken::Numeric { raw } => raw,
            ClassifiedToken::Corrupt { gloss } => gloss,
            ClassifiedToken::Quarantined { placeholder } => placeholder,
            ClassifiedToken::Resolved { sense } => &sense.english,
        }
    }
}

/// A token is numeric iff, after removing at most one '.', it is a
/// non-empty run of ASCII digits.
///
/// Only `0`-`9` count. Transliterations write numerals in ASCII, and the
/// validator's digit runs use the same definition, so a token the
/// disambiguator treats as a number is always one the validator checks.
pub fn is_numeric(token: &str) -> bool {
    let stripped = token.replacen('.', "", 1);
    !stripped.is_empty() && stripped.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_test_allows_single_decimal_point() {
        assert!(is_numeric("5"));
        assert!(is_numeric("10"));
        assert!(is_numeric("1.5"));
        assert!(is_numeric("5."));
        assert!(!is_numeric("1.2.3"));
        assert!(!is_numeric("."));
        assert!(!is_numeric(""));
        assert!(!is_numeric("5a"));
        assert!(!is_numeric("É.GAL"));
        // Non-ASCII digits and numeric symbols are not numerals here.
        assert!(!is_numeric("٥"));
        assert!(!is_numeric("²"));
        assert!(!is_numeric("Ⅻ"));
    }

    #[test]
    fn sense_type_keeps_unknown_tags() {
        assert_eq!(SenseType::from("VERB_ROOT"), SenseType::VerbRoot);
        let odd = SenseType::from("DETERMINATIVE");
        assert_eq!(odd, SenseType::Other("DETERMINATIVE".into()));
        assert_eq!(odd.to_string(), "DETERMINATIVE");
    }

    #[test]
    fn rules_never_match_without_left_context() {
        assert!(!Rule::PrevNumeric.matches(None));
        assert!(Rule::PrevNumeric.matches(Some("3")));
        assert!(Rule::from_prev("KÙ").matches(Some("KÙ")));
        assert!(!Rule::from_prev("KÙ").matches(Some("kù")));
    }

    #[test]
    fn classified_gloss_per_variant() {
        assert_eq!(ClassifiedToken::corrupt().gloss(), "[...]");
        let q = ClassifiedToken::Quarantined {
            placeholder: "UNK_2".into(),
        };
        assert_eq!(q.gloss(), "UNK_2");
        let r = ClassifiedToken::Resolved {
            sense: Sense::new("OBJ", "tablet"),
        };
        assert_eq!(r.gloss(), "tablet");
    }
}
