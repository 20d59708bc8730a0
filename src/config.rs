// File: src/config.rs
use crate::core::types::CORRUPTION_MARKER;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CIPHER_PATH: &str = "config/master_cipher.json";
const DEFAULT_REGISTRY_PATH: &str = "registry.bin";

/// Process-level settings. Every field has a default, so a config file
/// only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub cipher_path: PathBuf,
    pub registry_path: PathBuf,
    pub corruption_marker: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cipher_path: PathBuf::from(DEFAULT_CIPHER_PATH),
            registry_path: PathBuf::from(DEFAULT_REGISTRY_PATH),
            corruption_marker: CORRUPTION_MARKER.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
