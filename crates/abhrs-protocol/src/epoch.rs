//! Epoch key management
//!
//! Each user holds exactly one live epoch secret. Advancing replaces it with
//! `evolve_key(previous, theta)`; the previous secret is zeroized when it is
//! dropped, so a compromised current secret says nothing about earlier ones.

use abhrs_core::{AbhrsError, EpochSecret, Result, Theta, UserId};
use abhrs_crypto::evolve_key;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Epoch index plus the live secret
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpochState {
    index: u64,
    secret: EpochSecret,
}

impl EpochState {
    /// Epoch 0 with an initial secret
    pub fn new(initial: EpochSecret) -> Self {
        Self {
            index: 0,
            secret: initial,
        }
    }

    /// Current epoch index
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Current epoch secret
    pub fn secret(&self) -> &EpochSecret {
        &self.secret
    }

    /// Evolve to the next epoch
    pub fn advance(&mut self, theta: &Theta) -> Result<u64> {
        let next = evolve_key(&self.secret, theta)?;
        self.install(next)
    }

    /// Replace the live secret with an already-evolved successor
    pub(crate) fn install(&mut self, next: EpochSecret) -> Result<u64> {
        self.index = self
            .index
            .checked_add(1)
            .ok_or_else(|| AbhrsError::internal("epoch index overflow"))?;
        self.secret = next;
        Ok(self.index)
    }
}

/// Per-user epoch state
#[derive(Debug, Default)]
pub struct EpochKeyManager {
    states: RwLock<HashMap<UserId, EpochState>>,
}

impl EpochKeyManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `user` at epoch 0
    pub fn enroll(&self, user: UserId, initial: EpochSecret) -> Result<()> {
        let mut states = self.states.write();
        if states.contains_key(&user) {
            return Err(AbhrsError::invalid(format!("{user} is already enrolled")));
        }
        states.insert(user, EpochState::new(initial));
        Ok(())
    }

    /// Advance `user` one epoch, returning the new index
    pub fn advance(&self, user: &UserId, theta: &Theta) -> Result<u64> {
        let mut states = self.states.write();
        let state = states
            .get_mut(user)
            .ok_or_else(|| AbhrsError::invalid(format!("{user} is not enrolled")))?;
        let index = state.advance(theta)?;
        tracing::debug!(user = %user, epoch = index, "Advanced epoch");
        Ok(index)
    }

    /// Current epoch state of `user`
    pub fn current(&self, user: &UserId) -> Option<EpochState> {
        self.states.read().get(user).cloned()
    }

    /// Number of enrolled users
    pub fn len(&self) -> usize {
        self.states.read().len()
    }

    /// Whether no users are enrolled
    pub fn is_empty(&self) -> bool {
        self.states.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_replaces_secret() {
        let theta = Theta::new(4, 0.5);
        let mut state = EpochState::new(EpochSecret::from_bytes([1; 32]));
        let before = state.secret().clone();
        assert_eq!(state.advance(&theta).unwrap(), 1);
        assert_ne!(state.secret(), &before);
        assert_eq!(state.secret(), &evolve_key(&before, &theta).unwrap());
    }

    #[test]
    fn test_manager_tracks_users_independently() {
        let theta = Theta::new(4, 0.5);
        let manager = EpochKeyManager::new();
        manager
            .enroll(UserId::new("a"), EpochSecret::from_bytes([1; 32]))
            .unwrap();
        manager
            .enroll(UserId::new("b"), EpochSecret::from_bytes([2; 32]))
            .unwrap();

        manager.advance(&UserId::new("a"), &theta).unwrap();
        manager.advance(&UserId::new("a"), &theta).unwrap();

        assert_eq!(manager.current(&UserId::new("a")).unwrap().index(), 2);
        assert_eq!(manager.current(&UserId::new("b")).unwrap().index(), 0);
        assert!(manager.advance(&UserId::new("c"), &theta).is_err());
        assert!(manager
            .enroll(UserId::new("a"), EpochSecret::from_bytes([3; 32]))
            .is_err());
    }

    #[test]
    fn test_epoch_chain_has_no_repeats() {
        let theta = Theta::new(4, 0.5);
        let mut state = EpochState::new(EpochSecret::from_bytes([5; 32]));
        let mut seen = vec![state.secret().fingerprint()];
        for _ in 0..16 {
            state.advance(&theta).unwrap();
            let fingerprint = state.secret().fingerprint();
            assert!(!seen.contains(&fingerprint));
            seen.push(fingerprint);
        }
    }
}
