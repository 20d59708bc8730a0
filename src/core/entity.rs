// File: src/core/entity.rs
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntityKind {
    BrokenEntity,
    Person,
    Deity,
    Location,
    Commodity,
    Unknown,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::BrokenEntity => "BrokenEntity",
            EntityKind::Person => "Person",
            EntityKind::Deity => "Deity",
            EntityKind::Location => "Location",
            EntityKind::Commodity => "Commodity",
            EntityKind::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// Ontology in lookup order. The first key found as a substring wins.
const ONTOLOGY: [(&str, EntityKind); 5] = [
    ("Puzur-Aššur", EntityKind::Person),
    ("Enlil", EntityKind::Deity),
    ("Kanesh", EntityKind::Location),
    ("kaspum", EntityKind::Commodity),
    ("KÙ.BABBAR", EntityKind::Commodity),
];

const BROKEN_TAG: &str = "<BROKEN>";

/// A candidate entity found in running text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityMention {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: EntityKind,
}

#[derive(Debug, Clone)]
pub struct EntityClassifier {
    ontology: Vec<(String, EntityKind)>,
}

impl Default for EntityClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityClassifier {
    pub fn new() -> Self {
        Self::with_ontology(ONTOLOGY.iter().map(|&(k, kind)| (k.to_string(), kind)))
    }

    /// Custom ontology; order is preserved and decides ties.
    pub fn with_ontology<I: IntoIterator<Item = (String, EntityKind)>>(ontology: I) -> Self {
        Self {
            ontology: ontology.into_iter().collect(),
        }
    }

    pub fn classify(&self, token: &str) -> EntityKind {
        if has_broken_marker(token) {
            return EntityKind::BrokenEntity;
        }

        let normalized = token.replace('.', " ");
        let normalized = normalized.trim();
        self.ontology
            .iter()
            .find(|(key, _)| normalized.contains(key.as_str()))
            .map_or(EntityKind::Unknown, |&(_, kind)| kind)
    }

    /// Whitespace-split mentions: capitalised tokens and tokens carrying a
    /// broken marker, in text order.
    pub fn extract_entities(&self, text: &str) -> Vec<EntityMention> {
        text.split_whitespace()
            .filter(|t| t.chars().next().map_or(false, char::is_uppercase) || has_broken_marker(t))
            .map(|t| EntityMention {
                text: t.to_string(),
                kind: self.classify(t),
            })
            .collect()
    }
}

/// Matches `[x…]`, `[.…]` (one or more of the same filler) or `<BROKEN>`
/// anywhere in the token.
pub fn has_broken_marker(token: &str) -> bool {
    if token.contains(BROKEN_TAG) {
        return true;
    }
    let bytes = token.as_bytes();
    bytes.iter().enumerate().any(|(i, &b)| {
        if b != b'[' {
            return false;
        }
        let rest = &bytes[i + 1..];
        ['x', '.'].iter().any(|&fill| {
            let run = rest.iter().take_while(|&&c| c == fill as u8).count();
            run > 0 && rest.get(run) == Some(&b']')
        })
    })
}
