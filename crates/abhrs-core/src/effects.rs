//! Injectable randomness and id allocation
//!
//! Every protocol operation that needs fresh randomness or fresh identifiers
//! takes an [`Effects`] bundle instead of reaching for ambient state:
//! - Production: OS entropy, one allocator per process
//! - Testing: seeded ChaCha20 stream, one allocator per test run

use crate::config::{RandomnessConfig, RandomnessMode};
use crate::identifiers::IdAllocator;
use parking_lot::Mutex;
use rand::rngs::OsRng;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::sync::Arc;

// ========== Random Source Abstraction ==========

/// Abstract randomness source - OS entropy or a seeded deterministic stream
pub trait RandomSource: Send + Sync {
    /// Fill a byte buffer with random data
    fn fill_bytes(&self, dest: &mut [u8]);

    /// Generate a random u64
    fn gen_u64(&self) -> u64;

    /// Whether the stream is reproducible from a seed
    fn is_deterministic(&self) -> bool {
        false
    }
}

/// Cryptographically unpredictable randomness from the operating system
#[derive(Debug, Clone, Default)]
pub struct OsRandomSource;

impl OsRandomSource {
    /// Create a new OS random source
    pub fn new() -> Self {
        OsRandomSource
    }
}

impl RandomSource for OsRandomSource {
    fn fill_bytes(&self, dest: &mut [u8]) {
        OsRng.fill_bytes(dest);
    }

    fn gen_u64(&self) -> u64 {
        OsRng.next_u64()
    }
}

/// Seeded deterministic stream for tests and reproducible simulations
///
/// Same seed, same sequence. Access is serialized so concurrent callers see
/// a single interleaved stream.
#[derive(Debug, Clone)]
pub struct SeededRandomSource {
    rng: Arc<Mutex<ChaCha20Rng>>,
}

impl SeededRandomSource {
    /// Create a new seeded source
    pub fn new(seed: u64) -> Self {
        SeededRandomSource {
            rng: Arc::new(Mutex::new(ChaCha20Rng::seed_from_u64(seed))),
        }
    }

    /// Derive the seed from a test name for isolation between tests
    pub fn from_test_name(test_name: &str) -> Self {
        let digest = blake3::hash(test_name.as_bytes());
        let mut seed = [0u8; 8];
        seed.copy_from_slice(&digest.as_bytes()[..8]);
        Self::new(u64::from_le_bytes(seed))
    }
}

impl RandomSource for SeededRandomSource {
    fn fill_bytes(&self, dest: &mut [u8]) {
        self.rng.lock().fill_bytes(dest);
    }

    fn gen_u64(&self) -> u64 {
        self.rng.lock().next_u64()
    }

    fn is_deterministic(&self) -> bool {
        true
    }
}

// ========== RNG Adapter ==========

/// Adapter exposing a [`RandomSource`] through the `rand` traits
///
/// Needed for `SliceRandom::shuffle` and anything else that expects `impl Rng`.
/// Not a `CryptoRng`: behind a seeded source the stream is predictable, so key
/// material is drawn through [`Effects::random_bytes`] instead.
pub struct EffectsRng {
    source: Arc<dyn RandomSource>,
}

impl RngCore for EffectsRng {
    fn next_u32(&mut self) -> u32 {
        (self.source.gen_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.source.gen_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.source.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

// ========== Effect Bundle ==========

/// Bundle of injectable effects
///
/// Cloning shares the same random stream and the same allocator.
#[derive(Clone)]
pub struct Effects {
    /// Randomness provider
    pub random: Arc<dyn RandomSource>,
    /// Shared identifier allocator
    pub ids: Arc<IdAllocator>,
}

impl Effects {
    /// Production effects: OS randomness and a fresh allocator
    pub fn production() -> Self {
        Effects {
            random: Arc::new(OsRandomSource::new()),
            ids: Arc::new(IdAllocator::new()),
        }
    }

    /// Deterministic effects from a seed
    pub fn deterministic(seed: u64) -> Self {
        Effects {
            random: Arc::new(SeededRandomSource::new(seed)),
            ids: Arc::new(IdAllocator::new()),
        }
    }

    /// Deterministic effects isolated by test name
    pub fn for_test(test_name: &str) -> Self {
        Effects {
            random: Arc::new(SeededRandomSource::from_test_name(test_name)),
            ids: Arc::new(IdAllocator::new()),
        }
    }

    /// Select the randomness provider from configuration
    pub fn from_config(config: &RandomnessConfig) -> Self {
        match config.mode {
            RandomnessMode::Os => Self::production(),
            RandomnessMode::Seeded => Self::deterministic(config.seed),
        }
    }

    /// Replace the randomness provider, keeping the allocator
    pub fn with_random(&self, random: Arc<dyn RandomSource>) -> Self {
        Effects {
            random,
            ids: self.ids.clone(),
        }
    }

    /// Generate a fixed-size random array
    pub fn random_bytes<const N: usize>(&self) -> [u8; N] {
        let mut bytes = [0u8; N];
        self.random.fill_bytes(&mut bytes);
        bytes
    }

    /// Allocate a typed identifier from the shared allocator
    pub fn allocate<T: From<u64>>(&self) -> T {
        self.ids.allocate()
    }

    /// Get an RNG adapter that implements the standard rand traits
    pub fn rng(&self) -> EffectsRng {
        EffectsRng {
            source: self.random.clone(),
        }
    }

    /// Whether randomness is reproducible
    pub fn is_deterministic(&self) -> bool {
        self.random.is_deterministic()
    }
}

impl Default for Effects {
    fn default() -> Self {
        Self::production()
    }
}

impl std::fmt::Debug for Effects {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Effects")
            .field("deterministic", &self.is_deterministic())
            .field("ids", &self.ids)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_source_reproducible() {
        let a = Effects::deterministic(42);
        let b = Effects::deterministic(42);
        assert_eq!(a.random_bytes::<32>(), b.random_bytes::<32>());
        assert!(a.is_deterministic());
    }

    #[test]
    fn test_seeded_sources_differ_by_seed() {
        let a = Effects::deterministic(1);
        let b = Effects::deterministic(2);
        assert_ne!(a.random_bytes::<32>(), b.random_bytes::<32>());
    }

    #[test]
    fn test_clone_shares_allocator() {
        let effects = Effects::for_test("clone_shares_allocator");
        let clone = effects.clone();
        let first: u64 = effects.ids.next_raw();
        let second: u64 = clone.ids.next_raw();
        assert_ne!(first, second);
    }

    #[test]
    fn test_production_not_deterministic() {
        assert!(!Effects::production().is_deterministic());
    }

    #[test]
    fn test_rng_adapter_follows_the_seeded_stream() {
        let a = Effects::deterministic(7);
        let b = Effects::deterministic(7);
        let mut rng = a.rng();
        assert_eq!(rng.next_u64(), b.random.gen_u64());
        let mut bytes = [0u8; 16];
        rng.fill_bytes(&mut bytes);
        assert_eq!(bytes, b.random_bytes::<16>());
    }
}
