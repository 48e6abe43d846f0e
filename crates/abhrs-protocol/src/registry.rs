//! Trust registry
//!
//! Holds the signing keys of every root and certification authority, issues
//! certificates, and hands out [`TrustAnchorSet`] snapshots. Signing keys
//! never leave the registry; callers only see public keys and signatures.

use abhrs_core::serialization;
use abhrs_core::{
    AbhrsError, CaId, CaPublicKey, Certificate, CertificateChain, CertificateSubject, Effects,
    IssuerRef, PublicKeyRecord, Result, RootId, TrustAnchorSet,
};
use ed25519_dalek::{Signer, SigningKey};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use zeroize::Zeroizing;

struct RootAuthority {
    signing_key: SigningKey,
    certificate: Certificate,
}

/// A registered certification authority
struct CertificationAuthority {
    signing_key: SigningKey,
    public_key: CaPublicKey,
    certificate: Certificate,
}

#[derive(Default)]
struct RegistryState {
    roots: BTreeMap<RootId, RootAuthority>,
    authorities: BTreeMap<CaId, CertificationAuthority>,
    revoked: BTreeSet<CaId>,
}

impl RegistryState {
    fn active_authority(&self, ca_id: &CaId) -> Result<&CertificationAuthority> {
        if self.revoked.contains(ca_id) {
            return Err(AbhrsError::unauthorized_issuer(format!(
                "authority {ca_id} is revoked"
            )));
        }
        self.authorities
            .get(ca_id)
            .ok_or_else(|| AbhrsError::unauthorized_issuer(format!("unknown authority {ca_id}")))
    }
}

/// Registry of trust anchors and certification authorities
///
/// Registration is append-only. Authorities are immutable after
/// registration except for revocation: a revoked authority can no longer
/// certify or sign, drops out of every later anchor set, and its certificate
/// carries a cleared validity flag.
#[derive(Default)]
pub struct TrustRegistry {
    state: RwLock<RegistryState>,
}

fn generate_signing_key(effects: &Effects) -> SigningKey {
    let seed = Zeroizing::new(effects.random_bytes::<32>());
    SigningKey::from_bytes(&seed)
}

fn issue_certificate(
    subject: CertificateSubject,
    issuer: IssuerRef,
    subject_key: [u8; 32],
    signing_key: &SigningKey,
) -> Result<Certificate> {
    let tbs = Certificate::tbs_bytes(&subject, &issuer, &subject_key)?;
    Ok(Certificate {
        subject,
        issuer,
        subject_key,
        signature: signing_key.sign(&tbs).to_bytes().to_vec(),
        valid: true,
    })
}

/// Public key handle certified for a user's ring key
pub fn user_key_handle(record: &PublicKeyRecord) -> Result<[u8; 32]> {
    serialization::hash_canonical("abhrs/user-key-handle/v1", record)
}

impl TrustRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a self-signed trust anchor
    pub fn register_root(&self, root_id: RootId, effects: &Effects) -> Result<Certificate> {
        let mut state = self.state.write();
        if state.roots.contains_key(&root_id) {
            return Err(AbhrsError::invalid(format!(
                "root {root_id} is already registered"
            )));
        }

        let signing_key = generate_signing_key(effects);
        let certificate = issue_certificate(
            CertificateSubject::Root {
                root: root_id.clone(),
            },
            IssuerRef::Root(root_id.clone()),
            signing_key.verifying_key().to_bytes(),
            &signing_key,
        )?;

        tracing::info!(root = %root_id, "Registered trust anchor");
        state.roots.insert(
            root_id,
            RootAuthority {
                signing_key,
                certificate: certificate.clone(),
            },
        );
        Ok(certificate)
    }

    /// Create a certification authority certified by `root_id`
    pub fn register_ca(
        &self,
        ca_id: CaId,
        root_id: RootId,
        effects: &Effects,
    ) -> Result<CaPublicKey> {
        let mut state = self.state.write();
        if state.authorities.contains_key(&ca_id) {
            return Err(AbhrsError::invalid(format!(
                "authority {ca_id} is already registered"
            )));
        }
        let root = state
            .roots
            .get(&root_id)
            .ok_or_else(|| AbhrsError::invalid(format!("unknown root {root_id}")))?;

        let signing_key = generate_signing_key(effects);
        let public_key = CaPublicKey {
            id: ca_id.clone(),
            root: root_id.clone(),
            key: signing_key.verifying_key().to_bytes(),
        };
        let certificate = issue_certificate(
            CertificateSubject::Authority { ca: ca_id.clone() },
            IssuerRef::Root(root_id.clone()),
            public_key.key,
            &root.signing_key,
        )?;

        tracing::info!(ca = %ca_id, root = %root_id, "Registered certification authority");
        state.authorities.insert(
            ca_id,
            CertificationAuthority {
                signing_key,
                public_key: public_key.clone(),
                certificate,
            },
        );
        Ok(public_key)
    }

    /// Issue the leaf certificate binding a user's ring key to `ca_id`
    pub fn certify_user(&self, ca_id: &CaId, record: &PublicKeyRecord) -> Result<Certificate> {
        let owner = record
            .owner
            .clone()
            .ok_or_else(|| AbhrsError::invalid(format!("key {} has no owner", record.id)))?;

        let state = self.state.read();
        let authority = state.active_authority(ca_id)?;

        let certificate = issue_certificate(
            CertificateSubject::User {
                user: owner.clone(),
                key: record.id,
            },
            IssuerRef::Authority(ca_id.clone()),
            user_key_handle(record)?,
            &authority.signing_key,
        )?;
        tracing::debug!(ca = %ca_id, user = %owner, key = %record.id, "Certified user key");
        Ok(certificate)
    }

    /// Assemble the leaf-to-root chain for a leaf certificate
    pub fn chain_for(&self, leaf: &Certificate) -> Result<CertificateChain> {
        let IssuerRef::Authority(ca_id) = &leaf.issuer else {
            return Err(AbhrsError::invalid("leaf is not issued by an authority"));
        };

        let state = self.state.read();
        let authority = state
            .authorities
            .get(ca_id)
            .ok_or_else(|| AbhrsError::invalid(format!("unknown authority {ca_id}")))?;
        let root = state
            .roots
            .get(&authority.public_key.root)
            .ok_or_else(|| {
                AbhrsError::internal(format!(
                    "authority {ca_id} references missing root {}",
                    authority.public_key.root
                ))
            })?;

        Ok(CertificateChain::new(vec![
            leaf.clone(),
            authority.certificate.clone(),
            root.certificate.clone(),
        ]))
    }

    /// Snapshot of trusted roots and registered authorities
    pub fn anchor_set(&self) -> TrustAnchorSet {
        let state = self.state.read();
        let mut anchors = TrustAnchorSet::new();
        for (root_id, root) in &state.roots {
            anchors.add_root(root_id.clone(), root.certificate.subject_key);
        }
        for (ca_id, authority) in &state.authorities {
            if !state.revoked.contains(ca_id) {
                anchors.add_authority(authority.public_key.clone());
            }
        }
        anchors
    }

    /// Public key of a registered, unrevoked authority
    pub fn authority(&self, ca_id: &CaId) -> Option<CaPublicKey> {
        self.state
            .read()
            .active_authority(ca_id)
            .ok()
            .map(|authority| authority.public_key.clone())
    }

    /// Whether `ca_id` has been revoked
    pub fn is_revoked(&self, ca_id: &CaId) -> bool {
        self.state.read().revoked.contains(ca_id)
    }

    /// Revoke an authority
    ///
    /// Clears the validity flag on its certificate, blocks further
    /// certification and issuance, and removes it from later anchor sets.
    pub fn revoke_ca(&self, ca_id: &CaId) -> Result<()> {
        let mut state = self.state.write();
        let authority = state
            .authorities
            .get_mut(ca_id)
            .ok_or_else(|| AbhrsError::invalid(format!("unknown authority {ca_id}")))?;
        authority.certificate.valid = false;
        state.revoked.insert(ca_id.clone());
        tracing::warn!(ca = %ca_id, "Revoked certification authority");
        Ok(())
    }

    /// Sign `message` with an authority's key
    pub(crate) fn sign_as(&self, ca_id: &CaId, message: &[u8]) -> Result<Vec<u8>> {
        let state = self.state.read();
        let authority = state.active_authority(ca_id)?;
        Ok(authority.signing_key.sign(message).to_bytes().to_vec())
    }
}

impl std::fmt::Debug for TrustRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("TrustRegistry")
            .field("roots", &state.roots.keys().collect::<Vec<_>>())
            .field("authorities", &state.authorities.keys().collect::<Vec<_>>())
            .finish()
    }
}
