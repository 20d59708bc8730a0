// File: src/core/disambiguator.rs
use crate::core::cipher::CipherTable;
use crate::core::types::{is_numeric, CipherEntry, Candidate, ClassifiedToken, Sense, CORRUPTION_MARKER};
use tracing::debug;

/// Context-sensitive sign resolver.
///
/// Walks the token stream left to right with a one-token lookback window.
/// The window always holds the *raw* previous token, never its resolved
/// sense, so a resolution can't cascade into the next one.
pub struct Disambiguator<'a> {
    table: &'a CipherTable,
    corruption_marker: String,
}

impl<'a> Disambiguator<'a> {
    pub fn new(table: &'a CipherTable) -> Self {
        Self::with_marker(table, CORRUPTION_MARKER)
    }

    pub fn with_marker(table: &'a CipherTable, marker: impl Into<String>) -> Self {
        Self {
            table,
            corruption_marker: marker.into(),
        }
    }

    /// Classifies every token. Output is 1:1 with input, in order.
    /// O(n) in the token count; candidate lists are scanned linearly.
    pub fn resolve<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<ClassifiedToken> {
        let mut prev: Option<&str> = None;
        let mut classified = Vec::with_capacity(tokens.len());

        for (i, token) in tokens.iter().enumerate() {
            let token = token.as_ref();
            classified.push(self.classify_at(i, token, prev));
            prev = Some(token);
        }
        classified
    }

    fn classify_at(&self, index: usize, token: &str, prev: Option<&str>) -> ClassifiedToken {
        if token == self.corruption_marker {
            return ClassifiedToken::corrupt();
        }

        // Numerals never quarantine, with or without a cipher entry.
        if is_numeric(token) {
            return ClassifiedToken::Numeric {
                raw: token.to_string(),
            };
        }

        let sense = match self.table.get(token) {
            Some(CipherEntry::Fixed(sense)) => Some(sense),
            Some(CipherEntry::Candidates(list)) => select_candidate(list, prev),
            None => None,
        };
        match sense {
            Some(sense) => ClassifiedToken::Resolved {
                sense: sense.clone(),
            },
            None => {
                debug!(index, token, "quarantining unknown sign");
                ClassifiedToken::Quarantined {
                    placeholder: format!("UNK_{}", index),
                }
            }
        }
    }
}

/// First candidate whose rule matches the previous raw token, else the
/// first candidate in stored order.
fn select_candidate<'c>(list: &'c [Candidate], prev: Option<&str>) -> Option<&'c Sense> {
    list.iter()
        .find(|c| c.rule.as_ref().map_or(false, |rule| rule.matches(prev)))
        .or_else(|| list.first())
        .map(|c| &c.sense)
}
