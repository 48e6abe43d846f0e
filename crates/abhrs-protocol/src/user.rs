//! Enrolled users

use crate::epoch::EpochState;
use abhrs_core::{
    AttributeSet, CaId, Effects, EpochSecret, KeyId, PublicKeyRecord, Result, Theta, UserId,
};

/// A user with a ring public key and a live epoch secret
#[derive(Debug, Clone)]
pub struct User {
    /// User identifier
    pub id: UserId,
    /// Attribute map
    pub attributes: AttributeSet,
    /// Ring public-key record
    pub public_key: PublicKeyRecord,
    epoch: EpochState,
}

impl User {
    /// Enroll under `ca` with a fresh key id and initial secret
    pub fn enroll(id: UserId, attributes: AttributeSet, ca: CaId, effects: &Effects) -> Self {
        let key: KeyId = effects.allocate();
        Self {
            public_key: PublicKeyRecord::honest(key, id.clone(), ca),
            id,
            attributes,
            epoch: EpochState::new(EpochSecret::generate(effects)),
        }
    }

    /// Current epoch index
    pub fn epoch(&self) -> u64 {
        self.epoch.index()
    }

    /// Current epoch secret
    pub fn secret(&self) -> &EpochSecret {
        self.epoch.secret()
    }

    /// Evolve to the next epoch without signing
    pub fn advance(&mut self, theta: &Theta) -> Result<u64> {
        self.epoch.advance(theta)
    }

    pub(crate) fn install_secret(&mut self, next: EpochSecret) -> Result<u64> {
        self.epoch.install(next)
    }
}
