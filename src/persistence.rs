// File: src/persistence.rs
use crate::core::registry::{is_prime, PrimeRegistry};
use crate::error::{Result, SdicError};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// The serializable state of a prime registry.
#[derive(Serialize, Deserialize)]
struct RegistrySnapshot {
    /// Token and prime, in registration order.
    entries: Vec<(String, u64)>,
    cursor: u64,
}

impl RegistrySnapshot {
    fn capture(registry: &PrimeRegistry) -> Self {
        Self {
            entries: registry
                .entries()
                .map(|(token, prime)| (token.to_string(), prime))
                .collect(),
            cursor: registry.cursor(),
        }
    }

    /// Every value prime, strictly increasing, tokens unique, and the cursor
    /// past the last assignment.
    fn check(&self) -> std::result::Result<(), String> {
        let mut last = 0u64;
        let mut seen = std::collections::HashSet::with_capacity(self.entries.len());
        for (token, prime) in &self.entries {
            if !is_prime(*prime) {
                return Err(format!("{} is assigned non-prime {}", token, prime));
            }
            if *prime <= last {
                return Err(format!("{} breaks increasing order at {}", token, prime));
            }
            if !seen.insert(token.as_str()) {
                return Err(format!("{} is registered twice", token));
            }
            last = *prime;
        }
        if self.cursor <= last {
            return Err(format!("cursor {} does not advance past {}", self.cursor, last));
        }
        Ok(())
    }
}

pub fn save_registry(registry: &PrimeRegistry, path: &Path) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let snapshot = RegistrySnapshot::capture(registry);

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        bincode::serialize_into(&mut writer, &snapshot)?;
        writer.flush()?;
    }

    temp_file.persist(path).map_err(|e| SdicError::Io(e.error))?;
    info!(path = %path.display(), signs = snapshot.entries.len(), "registry saved");
    Ok(())
}

pub fn load_registry(path: &Path) -> Result<PrimeRegistry> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let snapshot: RegistrySnapshot = bincode::deserialize_from(reader)?;

    snapshot.check().map_err(|reason| SdicError::CorruptSnapshot {
        path: path.to_path_buf(),
        reason,
    })?;

    Ok(PrimeRegistry::from_parts(snapshot.entries, snapshot.cursor))
}

/// Loads the snapshot at `path`, or starts a fresh registry when there is none.
pub fn load_registry_or_new(path: &Path) -> Result<PrimeRegistry> {
    if path.exists() {
        load_registry(path)
    } else {
        Ok(PrimeRegistry::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_round_trip_preserves_order_and_cursor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("registry.bin");

        let mut registry = PrimeRegistry::seeded();
        registry.register("KÙ.BABBAR");
        save_registry(&registry, &path).unwrap();

        let mut restored = load_registry(&path).unwrap();
        let original: Vec<(String, u64)> = registry.entries().map(|(t, p)| (t.to_string(), p)).collect();
        let loaded: Vec<(String, u64)> = restored.entries().map(|(t, p)| (t.to_string(), p)).collect();
        assert_eq!(original, loaded);
        assert_eq!(restored.cursor(), registry.cursor());

        // Assignment resumes after the restored cursor.
        assert_eq!(restored.register("AN.NA"), registry.clone().register("AN.NA"));
    }

    #[test]
    fn tampered_snapshot_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.bin");
        let bad = RegistrySnapshot {
            entries: vec![("A".into(), 2), ("B".into(), 4)],
            cursor: 5,
        };
        fs::write(&path, bincode::serialize(&bad).unwrap()).unwrap();

        match load_registry(&path) {
            Err(SdicError::CorruptSnapshot { reason, .. }) => assert!(reason.contains("non-prime")),
            other => panic!("expected a corrupt snapshot error, got {:?}", other.map(|r| r.len())),
        }
    }

    #[test]
    fn stale_cursor_is_rejected() {
        let bad = RegistrySnapshot {
            entries: vec![("A".into(), 2), ("B".into(), 3)],
            cursor: 3,
        };
        assert!(bad.check().is_err());
    }

    #[test]
    fn missing_snapshot_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let registry = load_registry_or_new(&dir.path().join("absent.bin")).unwrap();
        assert!(registry.is_empty());
        assert_eq!(registry.cursor(), 2);
    }
}
