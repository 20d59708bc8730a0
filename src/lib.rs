// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod persistence;

pub use crate::config::EngineConfig;
pub use crate::core::cipher::CipherTable;
pub use crate::core::disambiguator::Disambiguator;
pub use crate::core::engine::{SdicEngine, Translation};
pub use crate::core::entity::{EntityClassifier, EntityKind, EntityMention};
pub use crate::core::hasher::{contains, Fingerprint, FingerprintHasher, WeightSource};
pub use crate::core::reconstructor::{RoleBuckets, SyntacticReconstructor};
pub use crate::core::registry::{GematriaValue, PrimeRegistry, SharedPrimeRegistry};
pub use crate::core::types::{CipherEntry, ClassifiedToken, Sense, SenseType};
pub use crate::core::validator::{ConsistencyValidator, ValidationFlag, ValidationResult};
pub use crate::error::{Result, SdicError};
