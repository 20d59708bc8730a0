//! Error type for the loading and persistence surfaces.
//!
//! The translation components themselves never fail: unknown signs,
//! unregistered lookups and missing tables degrade to sentinel values.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdicError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cipher JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The cipher document parsed but is not a token → sense mapping.
    #[error("invalid cipher table: {0}")]
    InvalidCipher(String),

    #[error("lexicon CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("registry snapshot encoding error: {0}")]
    Snapshot(#[from] bincode::Error),

    /// A snapshot decoded cleanly but breaks the prime assignment invariant.
    #[error("corrupt registry snapshot at {path}: {reason}")]
    CorruptSnapshot { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, SdicError>;
