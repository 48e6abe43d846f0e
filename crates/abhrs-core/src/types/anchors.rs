//! Trust anchor snapshot

use super::keys::CaPublicKey;
use crate::identifiers::{CaId, RootId};
use std::collections::BTreeMap;

/// Explicit trust input for chain validation and verification
///
/// A point-in-time snapshot of the registry: the trusted roots with their
/// keys, and every registered authority. Holding it by value keeps the
/// validator and verifier free of implicit registry access.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustAnchorSet {
    roots: BTreeMap<RootId, [u8; 32]>,
    authorities: BTreeMap<CaId, CaPublicKey>,
}

impl TrustAnchorSet {
    /// Create an empty anchor set
    pub fn new() -> Self {
        Self::default()
    }

    /// Trust a root and its key
    pub fn add_root(&mut self, root: RootId, key: [u8; 32]) {
        self.roots.insert(root, key);
    }

    /// Register an authority
    pub fn add_authority(&mut self, authority: CaPublicKey) {
        self.authorities.insert(authority.id.clone(), authority);
    }

    /// Whether `root` is trusted with exactly this key
    pub fn is_trusted_root(&self, root: &RootId, key: &[u8; 32]) -> bool {
        self.roots.get(root) == Some(key)
    }

    /// Look up a registered authority
    pub fn authority(&self, ca: &CaId) -> Option<&CaPublicKey> {
        self.authorities.get(ca)
    }

    /// All registered authorities
    pub fn authorities(&self) -> impl Iterator<Item = &CaPublicKey> {
        self.authorities.values()
    }

    /// Number of trusted roots
    pub fn root_count(&self) -> usize {
        self.roots.len()
    }
}
