use crate::config::EngineConfig;
use crate::core::cipher::CipherTable;
use crate::core::disambiguator::Disambiguator;
use crate::core::entity::{EntityClassifier, EntityMention};
use crate::core::hasher::{Fingerprint, FingerprintHasher};
use crate::core::reconstructor::SyntacticReconstructor;
use crate::core::types::ClassifiedToken;
use crate::core::validator::{ConsistencyValidator, ValidationResult};
use rayon::prelude::*;
use serde::Serialize;

/// Output of the deterministic path for one text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Translation {
    pub classified: Vec<ClassifiedToken>,
    pub text: String,
    pub fingerprint: Fingerprint,
}

// The engine is composed of the loaded cipher and the stateless stages.
// Nothing in here mutates after construction, so one engine can be shared
// across worker threads. The prime registry is deliberately not owned here.
pub struct SdicEngine {
    cipher: CipherTable,
    reconstructor: SyntacticReconstructor,
    validator: ConsistencyValidator,
    classifier: EntityClassifier,
    corruption_marker: String,
}

impl SdicEngine {
    pub fn new(cipher: CipherTable) -> Self {
        Self::with_config(cipher, &EngineConfig::default())
    }

    fn with_config(cipher: CipherTable, config: &EngineConfig) -> Self {
        Self {
            cipher,
            reconstructor: SyntacticReconstructor::new(),
            validator: ConsistencyValidator::new(),
            classifier: EntityClassifier::new(),
            corruption_marker: config.corruption_marker.clone(),
        }
    }

    /// Loads the cipher named by the config; an unusable file yields an
    /// engine that quarantines every sign.
    pub fn from_config(config: &EngineConfig) -> Self {
        let cipher = CipherTable::load_or_empty(&config.cipher_path);
        Self::with_config(cipher, config)
    }

    pub fn disambiguator(&self) -> Disambiguator<'_> {
        Disambiguator::with_marker(&self.cipher, self.corruption_marker.as_str())
    }

    pub fn classify<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<ClassifiedToken> {
        self.disambiguator().resolve(tokens)
    }

    pub fn reconstruct(&self, classified: &[ClassifiedToken]) -> String {
        self.reconstructor.reassemble(classified)
    }

    pub fn fingerprint<S: AsRef<str>>(&self, tokens: &[S]) -> Fingerprint {
        FingerprintHasher::new(&self.cipher).fingerprint(tokens)
    }

    pub fn translate<S: AsRef<str>>(&self, tokens: &[S]) -> Translation {
        let classified = self.classify(tokens);
        let text = self.reconstruct(&classified);
        Translation {
            text,
            fingerprint: self.fingerprint(tokens),
            classified,
        }
    }

    /// Independent texts in parallel; results keep input order.
    pub fn translate_batch<S: AsRef<str> + Sync>(&self, texts: &[Vec<S>]) -> Vec<Translation> {
        texts.par_iter().map(|tokens| self.translate(tokens.as_slice())).collect()
    }

    pub fn judge(&self, source: &str, candidate: &str) -> ValidationResult {
        self.validator.validate(source, candidate)
    }

    pub fn entities(&self, text: &str) -> Vec<EntityMention> {
        self.classifier.extract_entities(text)
    }

    pub fn cipher(&self) -> &CipherTable {
        &self.cipher
    }

    pub fn entity_classifier(&self) -> &EntityClassifier {
        &self.classifier
    }
}
