//! Certificates and leaf-to-root chains

use crate::identifiers::{CaId, KeyId, RootId, UserId};
use crate::{serialization, Result};
use serde::{Deserialize, Serialize};

/// What a certificate vouches for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CertificateSubject {
    /// Self-signed trust anchor
    Root {
        /// Root identifier
        root: RootId,
    },
    /// Intermediate certification authority
    Authority {
        /// Authority identifier
        ca: CaId,
    },
    /// End user and their ring public key
    User {
        /// User identifier
        user: UserId,
        /// Public-key record id
        key: KeyId,
    },
}

/// Issuer reference carried by a certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssuerRef {
    /// Issued by a root
    Root(RootId),
    /// Issued by an authority
    Authority(CaId),
}

/// A single certificate in a chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    /// Subject payload
    pub subject: CertificateSubject,
    /// Who issued this certificate
    pub issuer: IssuerRef,
    /// Subject's public key: Ed25519 verifying key for roots and
    /// authorities, key handle for user leaves
    pub subject_key: [u8; 32],
    /// Issuer's signature over [`Certificate::tbs_bytes`]
    #[serde(with = "serde_bytes")]
    pub signature: Vec<u8>,
    /// Validity flag; cleared on revocation, not covered by the signature
    pub valid: bool,
}

#[derive(Serialize)]
struct CertificateBody<'a> {
    subject: &'a CertificateSubject,
    issuer: &'a IssuerRef,
    subject_key: &'a [u8; 32],
}

impl Certificate {
    /// Canonical to-be-signed bytes
    pub fn tbs_bytes(
        subject: &CertificateSubject,
        issuer: &IssuerRef,
        subject_key: &[u8; 32],
    ) -> Result<Vec<u8>> {
        serialization::to_vec(&CertificateBody {
            subject,
            issuer,
            subject_key,
        })
    }

    /// Canonical signed bytes of this certificate
    pub fn signed_bytes(&self) -> Result<Vec<u8>> {
        Self::tbs_bytes(&self.subject, &self.issuer, &self.subject_key)
    }

    /// Whether `issuer` names this certificate's subject
    pub fn is_subject_of(&self, issuer: &IssuerRef) -> bool {
        match (&self.subject, issuer) {
            (CertificateSubject::Root { root }, IssuerRef::Root(id)) => root == id,
            (CertificateSubject::Authority { ca }, IssuerRef::Authority(id)) => ca == id,
            _ => false,
        }
    }

    /// Root identifier, if this is a root certificate
    pub fn root_id(&self) -> Option<&RootId> {
        match &self.subject {
            CertificateSubject::Root { root } => Some(root),
            _ => None,
        }
    }
}

/// Ordered certificates from leaf to root
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CertificateChain(pub Vec<Certificate>);

impl CertificateChain {
    /// Build from leaf-first certificates
    pub fn new(certificates: Vec<Certificate>) -> Self {
        Self(certificates)
    }

    /// Leaf certificate
    pub fn leaf(&self) -> Option<&Certificate> {
        self.0.first()
    }

    /// Root certificate
    pub fn root(&self) -> Option<&Certificate> {
        self.0.last()
    }

    /// Certificates in leaf-to-root order
    pub fn certificates(&self) -> &[Certificate] {
        &self.0
    }

    /// Mutable access, mostly for revocation and tests
    pub fn certificates_mut(&mut self) -> &mut Vec<Certificate> {
        &mut self.0
    }

    /// Chain length
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the chain is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
