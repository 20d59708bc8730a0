// File: src/core/reconstructor.rs
use crate::core::types::{ClassifiedToken, SenseType};
use serde::Serialize;

/// Target-language slots, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntacticRole {
    Subject,
    Verb,
    DirectObject,
    IndirectObject,
    Other,
}

impl SyntacticRole {
    fn of(kind: &SenseType) -> Self {
        match kind {
            SenseType::Role | SenseType::Person => SyntacticRole::Subject,
            SenseType::VerbRoot => SyntacticRole::Verb,
            SenseType::Prep => SyntacticRole::IndirectObject,
            SenseType::Obj | SenseType::Loc | SenseType::Num | SenseType::Adj | SenseType::Suffix => {
                SyntacticRole::DirectObject
            }
            SenseType::Misc | SenseType::Other(_) => SyntacticRole::Other,
        }
    }
}

/// Glosses sorted into the five role buckets, each in encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoleBuckets {
    pub subject: Vec<String>,
    pub verb: Vec<String>,
    pub direct_object: Vec<String>,
    pub indirect_object: Vec<String>,
    pub other: Vec<String>,
}

impl RoleBuckets {
    fn push(&mut self, role: SyntacticRole, gloss: &str) {
        let bucket = match role {
            SyntacticRole::Subject => &mut self.subject,
            SyntacticRole::Verb => &mut self.verb,
            SyntacticRole::DirectObject => &mut self.direct_object,
            SyntacticRole::IndirectObject => &mut self.indirect_object,
            SyntacticRole::Other => &mut self.other,
        };
        bucket.push(gloss.to_string());
    }

    /// Joins the buckets as Subject Verb DirectObject IndirectObject Other,
    /// dropping blank glosses and capitalising the first character.
    pub fn assemble(&self) -> String {
        let sentence = self
            .subject
            .iter()
            .chain(&self.verb)
            .chain(&self.direct_object)
            .chain(&self.indirect_object)
            .chain(&self.other)
            .filter(|g| !g.trim().is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        capitalize_first(&sentence)
    }
}

/// Remaps a verb-final classified sequence into verb-medial English order.
///
/// This is a structural shuffle over flat buckets, not a parser: there is
/// no nesting and no agreement checking.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntacticReconstructor;

impl SyntacticReconstructor {
    pub fn new() -> Self {
        Self
    }

    pub fn buckets(&self, classified: &[ClassifiedToken]) -> RoleBuckets {
        let mut buckets = RoleBuckets::default();
        let mut i = 0;

        while i < classified.len() {
            let token = &classified[i];
            match token {
                ClassifiedToken::Corrupt { .. } | ClassifiedToken::Quarantined { .. } => {
                    buckets.push(SyntacticRole::Other, token.gloss());
                }
                ClassifiedToken::Numeric { raw } => {
                    buckets.push(SyntacticRole::DirectObject, raw);
                }
                ClassifiedToken::Resolved { sense } => {
                    let role = SyntacticRole::of(&sense.kind);
                    buckets.push(role, &sense.english);
                    // A preposition binds its right neighbour whatever its type.
                    if sense.kind == SenseType::Prep {
                        if let Some(next) = classified.get(i + 1) {
                            buckets.push(SyntacticRole::IndirectObject, next.gloss());
                            i += 1;
                        }
                    }
                }
            }
            i += 1;
        }
        buckets
    }

    pub fn reassemble(&self, classified: &[ClassifiedToken]) -> String {
        self.buckets(classified).assemble()
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
