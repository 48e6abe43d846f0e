//! Public key handles

use crate::identifiers::{CaId, KeyId, RootId, UserId};
use serde::{Deserialize, Serialize};

/// Public-key handle of a certification authority
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaPublicKey {
    /// Authority identifier
    pub id: CaId,
    /// Root the authority is certified under
    pub root: RootId,
    /// Ed25519 verifying key bytes
    pub key: [u8; 32],
}

/// Who vouches for a ring member key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KeyIssuer {
    /// Honest key certified by an authority
    Authority(CaId),
    /// Padding key with no owner
    Decoy,
}

/// Public-key record of a ring member
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKeyRecord {
    /// Key identifier, unique across honest and decoy keys
    pub id: KeyId,
    /// Owning user; `None` for decoys
    pub owner: Option<UserId>,
    /// Issuing authority or the decoy tag
    pub issuer: KeyIssuer,
}

impl PublicKeyRecord {
    /// Honest key owned by `owner` under `ca`
    pub fn honest(id: KeyId, owner: UserId, ca: CaId) -> Self {
        Self {
            id,
            owner: Some(owner),
            issuer: KeyIssuer::Authority(ca),
        }
    }

    /// Ownerless decoy key
    pub fn decoy(id: KeyId) -> Self {
        Self {
            id,
            owner: None,
            issuer: KeyIssuer::Decoy,
        }
    }

    /// Whether this record is a decoy
    pub fn is_decoy(&self) -> bool {
        matches!(self.issuer, KeyIssuer::Decoy)
    }
}
