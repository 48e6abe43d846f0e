//! Certificate chain validation
//!
//! Five steps, evaluated in order, stopping at the first failure:
//!
//! 1. Credential binding: leaf issued by a registered authority, credential
//!    issued and signed by that authority, attribute snapshot unchanged
//! 2. Signatures: every certificate valid, each non-root certificate signed
//!    by the next one's key, walked leaf to root
//! 3. Anchor: the root is trusted with exactly its presented key
//! 4. Policy: predicate holds over the attributes
//! 5. Key binding: the claimed secret opens the commitment
//!
//! [`validate_chain`] is the total boolean predicate; [`check_chain`] reports
//! which step rejected.

use crate::policy::Policy;
use abhrs_core::{
    AttributeSet, Certificate, CertificateChain, Commitment, Credential, EpochSecret, IssuerRef,
    TrustAnchorSet,
};
use abhrs_crypto::CommitmentScheme;
use ed25519_dalek::{Signature, VerifyingKey};
use serde::{Deserialize, Serialize};

/// First chain-validation step that failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ChainRejection {
    /// Chain has no certificates
    #[error("certificate chain is empty")]
    EmptyChain,
    /// Leaf not issued by a registered authority
    #[error("leaf certificate is not issued by a registered authority")]
    UnknownAuthority,
    /// Credential issuer differs from the leaf authority
    #[error("credential was not issued by the leaf authority")]
    CredentialIssuerMismatch,
    /// Credential signature does not verify under the authority key
    #[error("credential signature does not verify")]
    CredentialSignature,
    /// Credential attribute snapshot differs from the supplied attributes
    #[error("credential attributes differ from the supplied attributes")]
    AttributeMismatch,
    /// A certificate's validity flag is cleared
    #[error("certificate {index} is not valid")]
    CertificateInvalid {
        /// Position in the chain, leaf first
        index: usize,
    },
    /// A certificate's issuer is not the next certificate's subject
    #[error("certificate {index} is not linked to its issuer")]
    BrokenLink {
        /// Position in the chain, leaf first
        index: usize,
    },
    /// A certificate signature does not verify
    #[error("certificate {index} has a bad signature")]
    BadSignature {
        /// Position in the chain, leaf first
        index: usize,
    },
    /// Chain does not terminate at a trusted root
    #[error("chain does not end at a trusted root")]
    UntrustedRoot,
    /// Policy predicate rejected the attributes
    #[error("policy {0} rejected the attributes")]
    PolicyRejected(String),
    /// Claimed secret does not open the commitment
    #[error("claimed secret does not open the commitment")]
    KeyBinding,
}

pub(crate) fn verify_ed25519(key: &[u8; 32], message: &[u8], signature: &[u8]) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(key) else {
        return false;
    };
    let Ok(signature) = Signature::from_slice(signature) else {
        return false;
    };
    verifying_key.verify_strict(message, &signature).is_ok()
}

fn verify_certificate(certificate: &Certificate, signer_key: &[u8; 32]) -> bool {
    match certificate.signed_bytes() {
        Ok(bytes) => verify_ed25519(signer_key, &bytes, &certificate.signature),
        Err(_) => false,
    }
}

fn check_credential_binding(
    anchors: &TrustAnchorSet,
    attributes: &AttributeSet,
    credential: &Credential,
    leaf: &Certificate,
) -> Result<(), ChainRejection> {
    let IssuerRef::Authority(ca) = &leaf.issuer else {
        return Err(ChainRejection::UnknownAuthority);
    };
    let authority = anchors
        .authority(ca)
        .ok_or(ChainRejection::UnknownAuthority)?;
    if credential.issuer != *ca {
        return Err(ChainRejection::CredentialIssuerMismatch);
    }
    let signed = credential
        .signed_bytes()
        .map_err(|_| ChainRejection::CredentialSignature)?;
    if !verify_ed25519(&authority.key, &signed, &credential.signature) {
        return Err(ChainRejection::CredentialSignature);
    }
    if credential.attributes != *attributes {
        return Err(ChainRejection::AttributeMismatch);
    }
    Ok(())
}

fn check_signatures(chain: &CertificateChain) -> Result<(), ChainRejection> {
    let certificates = chain.certificates();
    for (index, certificate) in certificates.iter().enumerate() {
        if !certificate.valid {
            return Err(ChainRejection::CertificateInvalid { index });
        }
        let Some(next) = certificates.get(index + 1) else {
            break;
        };
        if !next.is_subject_of(&certificate.issuer) {
            return Err(ChainRejection::BrokenLink { index });
        }
        if !verify_certificate(certificate, &next.subject_key) {
            return Err(ChainRejection::BadSignature { index });
        }
    }
    Ok(())
}

fn check_anchor(anchors: &TrustAnchorSet, chain: &CertificateChain) -> Result<(), ChainRejection> {
    let root = chain.root().ok_or(ChainRejection::EmptyChain)?;
    let root_id = root.root_id().ok_or(ChainRejection::UntrustedRoot)?;
    if !root.is_subject_of(&root.issuer) || !anchors.is_trusted_root(root_id, &root.subject_key) {
        return Err(ChainRejection::UntrustedRoot);
    }
    if !verify_certificate(root, &root.subject_key) {
        return Err(ChainRejection::BadSignature {
            index: chain.len() - 1,
        });
    }
    Ok(())
}

/// Run all five steps, reporting the first that fails
pub fn check_chain(
    anchors: &TrustAnchorSet,
    policy: &Policy,
    commitment: &Commitment,
    attributes: &AttributeSet,
    credential: &Credential,
    chain: &CertificateChain,
    claimed_secret: &EpochSecret,
    commitments: &dyn CommitmentScheme,
) -> Result<(), ChainRejection> {
    let leaf = chain.leaf().ok_or(ChainRejection::EmptyChain)?;

    check_credential_binding(anchors, attributes, credential, leaf)?;
    check_signatures(chain)?;
    check_anchor(anchors, chain)?;

    if !policy.evaluate(attributes) {
        return Err(ChainRejection::PolicyRejected(policy.id.to_string()));
    }
    if !commitments.opens(commitment, claimed_secret) {
        return Err(ChainRejection::KeyBinding);
    }
    Ok(())
}

/// Boolean chain-validation predicate
pub fn validate_chain(
    anchors: &TrustAnchorSet,
    policy: &Policy,
    commitment: &Commitment,
    attributes: &AttributeSet,
    credential: &Credential,
    chain: &CertificateChain,
    claimed_secret: &EpochSecret,
    commitments: &dyn CommitmentScheme,
) -> bool {
    match check_chain(
        anchors,
        policy,
        commitment,
        attributes,
        credential,
        chain,
        claimed_secret,
        commitments,
    ) {
        Ok(()) => true,
        Err(rejection) => {
            tracing::debug!(%rejection, "Chain validation rejected");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_ed25519_rejects_garbage() {
        assert!(!verify_ed25519(&[0u8; 32], b"message", &[1, 2, 3]));
        assert!(!verify_ed25519(&[0u8; 32], b"message", &[0u8; 64]));
    }

    #[test]
    fn test_rejection_messages_name_position() {
        let rejection = ChainRejection::BadSignature { index: 1 };
        assert_eq!(rejection.to_string(), "certificate 1 has a bad signature");
    }
}
