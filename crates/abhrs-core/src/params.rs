//! Parameter vector (theta) and its versioned snapshot store
//!
//! Theta is process-wide configuration. Signers, verifiers and the ring
//! builder only ever see an immutable `Arc<Theta>` snapshot for the duration of
//! a call; the tuner is the sole writer and publishes whole new versions
//! between rounds.

use crate::{AbhrsError, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Tunable anonymity/cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Theta {
    /// Minimum ring size; rings are padded with decoys up to this size
    pub target_ring_size: usize,
    /// Target fraction of decoys in a ring
    pub decoy_ratio: f64,
    /// Snapshot version, bumped on every publish
    pub version: u64,
}

impl Theta {
    /// Create an initial (version 0) parameter vector
    pub fn new(target_ring_size: usize, decoy_ratio: f64) -> Self {
        Self {
            target_ring_size,
            decoy_ratio,
            version: 0,
        }
    }

    /// Check the parameter domain
    pub fn validate(&self) -> Result<()> {
        if self.target_ring_size == 0 {
            return Err(AbhrsError::invalid("target ring size must be at least 1"));
        }
        if !self.decoy_ratio.is_finite() || !(0.0..=1.0).contains(&self.decoy_ratio) {
            return Err(AbhrsError::invalid(format!(
                "decoy ratio must lie in [0, 1], got {}",
                self.decoy_ratio
            )));
        }
        Ok(())
    }

    /// Whether two snapshots carry the same tunable values, ignoring version
    pub fn same_parameters(&self, other: &Theta) -> bool {
        self.target_ring_size == other.target_ring_size
            && self.decoy_ratio.to_bits() == other.decoy_ratio.to_bits()
    }

    /// Successor snapshot with a new ring size
    pub fn with_target_ring_size(&self, target_ring_size: usize) -> Self {
        Self {
            target_ring_size,
            decoy_ratio: self.decoy_ratio,
            version: self.version + 1,
        }
    }
}

#[derive(Debug)]
struct StoreState {
    current: Arc<Theta>,
    history: Vec<Arc<Theta>>,
}

/// Versioned holder of the live parameter vector
///
/// Readers clone the current `Arc`, so a publish never exposes a partially
/// updated vector. Every published version stays retrievable so verifiers can
/// pin the snapshot that was live at signing time.
#[derive(Debug)]
pub struct ParameterStore {
    state: RwLock<StoreState>,
}

impl ParameterStore {
    /// Create a store whose first snapshot is `initial`
    pub fn new(initial: Theta) -> Self {
        let current = Arc::new(initial);
        Self {
            state: RwLock::new(StoreState {
                current: current.clone(),
                history: vec![current],
            }),
        }
    }

    /// Current immutable snapshot
    pub fn snapshot(&self) -> Arc<Theta> {
        self.state.read().current.clone()
    }

    /// Publish a new snapshot; the version is assigned by the store
    pub fn publish(&self, mut next: Theta) -> Arc<Theta> {
        let mut state = self.state.write();
        next.version = state.current.version + 1;
        let published = Arc::new(next);
        state.history.push(published.clone());
        state.current = published.clone();
        tracing::debug!(
            version = published.version,
            target_ring_size = published.target_ring_size,
            decoy_ratio = published.decoy_ratio,
            "Published parameter snapshot"
        );
        published
    }

    /// Snapshot that was published as `version`
    pub fn at_version(&self, version: u64) -> Option<Arc<Theta>> {
        self.state
            .read()
            .history
            .iter()
            .find(|theta| theta.version == version)
            .cloned()
    }

    /// Number of snapshots published, including the initial one
    pub fn history_len(&self) -> usize {
        self.state.read().history.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_domain() {
        assert!(Theta::new(4, 0.5).validate().is_ok());
        assert!(Theta::new(0, 0.5).validate().is_err());
        assert!(Theta::new(4, 1.5).validate().is_err());
        assert!(Theta::new(4, f64::NAN).validate().is_err());
    }

    #[test]
    fn test_publish_keeps_old_snapshots_intact() {
        let store = ParameterStore::new(Theta::new(4, 0.5));
        let before = store.snapshot();
        store.publish(before.with_target_ring_size(5));

        assert_eq!(before.target_ring_size, 4);
        assert_eq!(store.snapshot().target_ring_size, 5);
        assert_eq!(store.snapshot().version, 1);
        assert_eq!(store.at_version(0).map(|t| t.target_ring_size), Some(4));
        assert_eq!(store.history_len(), 2);
    }

    #[test]
    fn test_same_parameters_ignores_version() {
        let a = Theta::new(6, 0.5);
        let b = Theta { version: 9, ..a };
        assert!(a.same_parameters(&b));
        assert!(!a.same_parameters(&a.with_target_ring_size(7)));
    }
}
