// File: src/core/cipher.rs
use crate::core::types::{Candidate, CipherEntry, Rule, Sense, SenseType};
use crate::error::{Result, SdicError};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

/// Weights used by the fingerprint hasher when the cipher file is missing.
const FALLBACK_PRIMES: [(&str, u64); 4] = [("KÙ.BABBAR", 2), ("AN.NA", 3), ("TÚG", 5), ("DUMU", 7)];

#[derive(Deserialize)]
struct RawRule {
    prev: String,
}

#[derive(Deserialize)]
struct RawSense {
    #[serde(rename = "type", default)]
    kind: SenseType,
    #[serde(default)]
    english: String,
    #[serde(default)]
    prime: Option<u64>,
    #[serde(default)]
    rule: Option<RawRule>,
}

impl RawSense {
    /// A declared prime of 0 would zero every fingerprint it touches, so
    /// such senses are dropped.
    fn into_candidate(self, token: &str) -> Option<Candidate> {
        if self.prime == Some(0) {
            warn!(token, english = %self.english, "dropping cipher sense with prime 0");
            return None;
        }
        let rule = self.rule.map(|r| Rule::from_prev(&r.prev));
        Some(Candidate::new(
            Sense {
                kind: self.kind,
                english: self.english,
                prime: self.prime,
            },
            rule,
        ))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Many(Vec<RawSense>),
    One(RawSense),
}

/// Read-only mapping from sign to its sense(s).
///
/// Built once (from JSON or an iterator) and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct CipherTable {
    entries: HashMap<String, CipherEntry>,
    fallback_primes: HashMap<String, u64>,
}

impl CipherTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a cipher document. A top-level `registry` object is unwrapped
    /// when present; otherwise the document itself is the table.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let doc: Value = serde_json::from_str(json)?;
        let table = match doc {
            Value::Object(mut map) => match map.remove("registry") {
                Some(inner @ Value::Object(_)) => inner,
                Some(other) => {
                    map.insert("registry".to_string(), other);
                    Value::Object(map)
                }
                None => Value::Object(map),
            },
            _ => {
                return Err(SdicError::InvalidCipher(
                    "expected an object mapping tokens to senses".to_string(),
                ))
            }
        };

        let raw: HashMap<String, RawEntry> = serde_json::from_value(table)?;
        let mut entries = HashMap::with_capacity(raw.len());
        for (key, entry) in raw {
            match entry {
                RawEntry::One(sense) => {
                    if let Some(candidate) = sense.into_candidate(&key) {
                        entries.insert(key, CipherEntry::Fixed(candidate.sense));
                    }
                }
                RawEntry::Many(list) => {
                    let candidates: Vec<Candidate> =
                        list.into_iter().filter_map(|sense| sense.into_candidate(&key)).collect();
                    if candidates.is_empty() {
                        warn!(token = %key, "skipping cipher entry with no candidate senses");
                    } else {
                        entries.insert(key, CipherEntry::Candidates(candidates));
                    }
                }
            }
        }

        Ok(Self {
            entries,
            fallback_primes: HashMap::new(),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let table = Self::from_json_str(&json)?;
        info!(path = %path.display(), entries = table.len(), "cipher table loaded");
        Ok(table)
    }

    /// Loads the cipher, degrading to an empty table on any failure.
    /// A missing file also enables the built-in fallback prime weights.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(table) => table,
            Err(SdicError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "cipher file not found; every sign will be quarantined");
                Self::with_fallback_primes()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cipher file unusable; using an empty table");
                Self::new()
            }
        }
    }

    /// An empty table that still weights a handful of common commodities.
    pub fn with_fallback_primes() -> Self {
        Self {
            entries: HashMap::new(),
            fallback_primes: FALLBACK_PRIMES
                .iter()
                .map(|&(k, p)| (k.to_string(), p))
                .collect(),
        }
    }

    pub fn get(&self, token: &str) -> Option<&CipherEntry> {
        self.entries.get(token)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.entries.contains_key(token)
    }

    /// Fingerprint weight for an already upper-cased key.
    /// Present entries yield their declared prime, or nothing.
    pub fn prime_for(&self, key: &str) -> Option<u64> {
        match self.entries.get(key) {
            Some(entry) => entry.prime(),
            None => self.fallback_primes.get(key).copied(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, CipherEntry)> for CipherTable {
    fn from_iter<I: IntoIterator<Item = (String, CipherEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
            fallback_primes: HashMap::new(),
        }
    }
}
