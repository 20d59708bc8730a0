// File: src/core/registry.rs
use crate::core::hasher::WeightSource;
use crate::error::{Result, SdicError};
use parking_lot::Mutex;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Tokens that always carry gematria value 0.
pub const SENTINEL_TOKENS: [&str; 4] = ["[DMG]", "[MISSING]", "[UNK]", "x"];

/// Signs registered by [`PrimeRegistry::seeded`].
pub const SEED_SIGNS: [&str; 7] = ["É", "GAL", "DUMU", "MUNUS", "be", "lí", "ni"];

pub fn is_sentinel(token: &str) -> bool {
    SENTINEL_TOKENS.contains(&token)
}

/// Key under which the fingerprint hasher looks signs up.
fn fold(token: &str) -> String {
    token.to_uppercase()
}

/// Trial division up to √n.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    let mut d = 2u64;
    while d.saturating_mul(d) <= n {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}

/// Result of looking a token up in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GematriaValue {
    Registered(u64),
    /// One of [`SENTINEL_TOKENS`]; valued 0 regardless of registration.
    Sentinel,
    /// Never registered; valued 0 but signals a registration gap.
    Unregistered,
}

impl GematriaValue {
    pub fn value(self) -> u64 {
        match self {
            GematriaValue::Registered(p) => p,
            GematriaValue::Sentinel | GematriaValue::Unregistered => 0,
        }
    }
}

/// Append-only token → prime assignment.
///
/// Primes are handed out in strictly increasing order, one per distinct
/// token, and never reassigned for the lifetime of the instance.
///
/// Registration is case-sensitive, but weights are served by upper-cased
/// key. Spellings that differ only in case all weigh the prime of the one
/// registered first.
#[derive(Debug, Clone)]
pub struct PrimeRegistry {
    sign_map: HashMap<String, u64>,
    /// Upper-cased token → prime of its first-registered spelling.
    folded: HashMap<String, u64>,
    /// Tokens in registration order.
    order: Vec<String>,
    /// Next integer to test for primality.
    cursor: u64,
}

impl Default for PrimeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PrimeRegistry {
    pub fn new() -> Self {
        Self {
            sign_map: HashMap::new(),
            folded: HashMap::new(),
            order: Vec::new(),
            cursor: 2,
        }
    }

    /// A registry pre-populated with a few common signs.
    pub fn seeded() -> Self {
        let mut registry = Self::new();
        registry.register_all(SEED_SIGNS);
        registry
    }

    /// Rebuilds a registry from snapshot parts. The caller is responsible
    /// for having validated the prime invariant.
    pub(crate) fn from_parts(entries: Vec<(String, u64)>, cursor: u64) -> Self {
        let mut registry = Self {
            sign_map: HashMap::with_capacity(entries.len()),
            folded: HashMap::with_capacity(entries.len()),
            order: Vec::with_capacity(entries.len()),
            cursor,
        };
        for (token, prime) in entries {
            registry.folded.entry(fold(&token)).or_insert(prime);
            registry.sign_map.insert(token.clone(), prime);
            registry.order.push(token);
        }
        registry
    }

    fn next_prime(&mut self) -> u64 {
        while !is_prime(self.cursor) {
            self.cursor += 1;
        }
        let prime = self.cursor;
        self.cursor += 1;
        prime
    }

    /// Returns the token's prime, assigning the next free one on first sight.
    pub fn register(&mut self, token: &str) -> u64 {
        if let Some(&prime) = self.sign_map.get(token) {
            return prime;
        }
        let prime = self.next_prime();
        debug!(token, prime, "registered sign");
        let weight = *self.folded.entry(fold(token)).or_insert(prime);
        if weight != prime {
            debug!(token, weight, "case variant of a registered sign");
        }
        self.sign_map.insert(token.to_string(), prime);
        self.order.push(token.to_string());
        prime
    }

    pub fn register_all<I, S>(&mut self, tokens: I) -> Vec<u64>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tokens.into_iter().map(|t| self.register(t.as_ref())).collect()
    }

    pub fn lookup(&self, token: &str) -> GematriaValue {
        if is_sentinel(token) {
            return GematriaValue::Sentinel;
        }
        match self.sign_map.get(token) {
            Some(&prime) => GematriaValue::Registered(prime),
            None => GematriaValue::Unregistered,
        }
    }

    /// Prime of a registered token, 0 for sentinels and unregistered tokens.
    pub fn value_of(&self, token: &str) -> u64 {
        let value = self.lookup(token);
        if value == GematriaValue::Unregistered {
            warn!(token, "lookup of unregistered sign");
        }
        value.value()
    }

    /// Sum of [`Self::value_of`] over the sequence.
    ///
    /// This is not the multiplicative fingerprint; sums don't support a
    /// containment test.
    pub fn additive_signature<S: AsRef<str>>(&self, tokens: &[S]) -> u64 {
        tokens
            .iter()
            .map(|t| self.value_of(t.as_ref()))
            .fold(0u64, u64::saturating_add)
    }

    /// Registered tokens with their primes, in registration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.order
            .iter()
            .map(move |t| (t.as_str(), self.sign_map[t.as_str()]))
    }

    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl WeightSource for PrimeRegistry {
    /// Sentinels are neutral in any case; everything else resolves through
    /// the upper-cased index.
    fn weight(&self, key: &str) -> Option<u64> {
        let key = fold(key);
        if SENTINEL_TOKENS.iter().any(|s| fold(s) == key) {
            return None;
        }
        self.folded.get(&key).copied()
    }
}

/// One lexicon row. Extra columns (e.g. `interpretation`) are ignored.
#[derive(Debug, Deserialize)]
struct LexiconRow {
    #[serde(default)]
    sign: Option<String>,
    #[serde(default)]
    reading: Option<String>,
}

impl LexiconRow {
    /// The reading, or the sign when the row has no reading.
    fn into_key(self) -> Option<String> {
        self.reading
            .filter(|r| !r.is_empty())
            .or(self.sign)
            .filter(|k| !k.is_empty())
    }
}

/// Keys of a lexicon CSV with a header row, in file order.
pub fn read_lexicon_keys(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));
    let mut keys = Vec::new();
    for row in reader.deserialize::<LexiconRow>() {
        if let Some(key) = row?.into_key() {
            keys.push(key);
        }
    }
    Ok(keys)
}

impl PrimeRegistry {
    /// A registry holding every lexicon key in file order.
    ///
    /// A missing or unreadable lexicon yields [`PrimeRegistry::seeded`].
    pub fn from_lexicon(path: &Path) -> Self {
        match read_lexicon_keys(path) {
            Ok(keys) => {
                let mut registry = Self::new();
                registry.register_all(&keys);
                info!(path = %path.display(), rows = keys.len(), signs = registry.len(), "lexicon loaded");
                registry
            }
            Err(SdicError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "lexicon not found, using seed signs");
                Self::seeded()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable lexicon, using seed signs");
                Self::seeded()
            }
        }
    }
}

/// A registry shared between worker threads.
///
/// Every `register` takes the lock, so each prime is handed out exactly once
/// even under concurrent first sightings of different tokens.
#[derive(Debug, Clone, Default)]
pub struct SharedPrimeRegistry {
    inner: Arc<Mutex<PrimeRegistry>>,
}

impl SharedPrimeRegistry {
    pub fn new(registry: PrimeRegistry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    pub fn register(&self, token: &str) -> u64 {
        self.inner.lock().register(token)
    }

    pub fn value_of(&self, token: &str) -> u64 {
        self.inner.lock().value_of(token)
    }

    pub fn additive_signature<S: AsRef<str>>(&self, tokens: &[S]) -> u64 {
        self.inner.lock().additive_signature(tokens)
    }

    /// Point-in-time copy, e.g. for persistence or read-only fan-out.
    pub fn snapshot(&self) -> PrimeRegistry {
        self.inner.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
