// File: src/core/hasher.rs
use crate::core::cipher::CipherTable;
use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Product of per-token prime weights. Unbounded: a few dozen distinct
/// primes already overflow 64 bits.
pub type Fingerprint = BigUint;

/// Something that can weight an (already upper-cased) token with a prime.
///
/// Implementors must never give two different keys the same weight or a
/// weight of 0, or divisibility stops meaning containment.
pub trait WeightSource {
    fn weight(&self, key: &str) -> Option<u64>;
}

impl WeightSource for CipherTable {
    fn weight(&self, key: &str) -> Option<u64> {
        self.prime_for(key)
    }
}

/// Multiplicative semantic hash over a token sequence.
pub struct FingerprintHasher<'a, W: WeightSource + ?Sized> {
    source: &'a W,
}

impl<'a, W: WeightSource + ?Sized> FingerprintHasher<'a, W> {
    pub fn new(source: &'a W) -> Self {
        Self { source }
    }

    /// Weight of one token; tokens without a weight are neutral (1).
    pub fn weight_of(&self, token: &str) -> u64 {
        self.source.weight(&token.to_uppercase()).unwrap_or(1)
    }

    /// V(sequence) = Π weight(token). The empty sequence hashes to 1.
    pub fn fingerprint<S: AsRef<str>>(&self, tokens: &[S]) -> Fingerprint {
        tokens.iter().fold(Fingerprint::one(), |acc, t| {
            acc * self.weight_of(t.as_ref())
        })
    }
}

/// True iff `b` divides `a` exactly, i.e. the sign multiset behind `b` is
/// contained in the one behind `a`.
pub fn contains(a: &Fingerprint, b: &Fingerprint) -> bool {
    if b.is_zero() {
        return false;
    }
    (a % b).is_zero()
}
