//! Attribute credentials

use crate::attributes::AttributeSet;
use crate::identifiers::{CaId, CredentialId};
use crate::{serialization, Result};
use serde::{Deserialize, Serialize};

/// Attribute credential issued under a CA's authority
///
/// Immutable once issued; later referenced only as witness material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Globally unique credential id
    pub id: CredentialId,
    /// Issuing authority
    pub issuer: CaId,
    /// Attribute snapshot at issuance
    pub attributes: AttributeSet,
    /// Issuer's Ed25519 signature over [`Credential::body_bytes`]
    #[serde(with = "serde_bytes")]
    pub signature: Vec<u8>,
}

#[derive(Serialize)]
struct CredentialBody<'a> {
    id: CredentialId,
    issuer: &'a CaId,
    attributes: &'a AttributeSet,
}

impl Credential {
    /// Canonical bytes covered by the issuer signature
    pub fn body_bytes(id: CredentialId, issuer: &CaId, attributes: &AttributeSet) -> Result<Vec<u8>> {
        serialization::to_vec(&CredentialBody {
            id,
            issuer,
            attributes,
        })
    }

    /// Canonical signed bytes of this credential
    pub fn signed_bytes(&self) -> Result<Vec<u8>> {
        Self::body_bytes(self.id, &self.issuer, &self.attributes)
    }
}
