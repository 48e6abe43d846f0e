//! Anonymity rings

use super::keys::PublicKeyRecord;
use crate::identifiers::{KeyId, RingId};
use serde::{Deserialize, Serialize};

/// Honest keys plus decoys, in randomized order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ring {
    /// Unique ring identifier
    pub id: RingId,
    /// Ring members after permutation
    pub members: Vec<PublicKeyRecord>,
}

impl Ring {
    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the ring has no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Member ids in ring order
    pub fn member_ids(&self) -> Vec<KeyId> {
        self.members.iter().map(|m| m.id).collect()
    }

    /// Member ids as a sorted identity set
    pub fn identity_set(&self) -> Vec<KeyId> {
        let mut ids = self.member_ids();
        ids.sort_unstable();
        ids
    }

    /// Whether `id` is a member
    pub fn contains(&self, id: KeyId) -> bool {
        self.members.iter().any(|m| m.id == id)
    }

    /// Number of decoy members
    pub fn decoy_count(&self) -> usize {
        self.members.iter().filter(|m| m.is_decoy()).count()
    }

    /// Number of honest members
    pub fn honest_count(&self) -> usize {
        self.len() - self.decoy_count()
    }
}
