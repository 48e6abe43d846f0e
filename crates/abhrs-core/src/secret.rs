//! Epoch secret key material

use crate::effects::Effects;
use crate::hash::{self, Hash32};
use std::fmt;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Secret key material for one epoch
///
/// Zeroized on drop and never serialized. Equality is constant-time.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EpochSecret([u8; 32]);

impl EpochSecret {
    /// Wrap raw key bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Sample a fresh initial secret
    pub fn generate(effects: &Effects) -> Self {
        Self(effects.random_bytes())
    }

    /// Borrow the raw key bytes
    pub fn expose_secret(&self) -> &[u8; 32] {
        &self.0
    }

    /// Public, non-invertible fingerprint for logs and tests
    pub fn fingerprint(&self) -> Hash32 {
        hash::hash("abhrs/epoch-secret/fingerprint/v1", &self.0)
    }
}

impl PartialEq for EpochSecret {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for EpochSecret {}

impl fmt::Debug for EpochSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fingerprint = self.fingerprint();
        write!(f, "EpochSecret({}..)", hex::encode(&fingerprint[..4]))
    }
}
