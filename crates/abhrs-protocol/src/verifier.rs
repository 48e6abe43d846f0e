//! Signature verification
//!
//! Reads only public transcript fields. The statement is reconstructed for
//! every authority in the anchor set and the signature is accepted if the
//! proof verifies for any of them, so acceptance does not depend on (and
//! does not reveal) which authority issued the signer's credential.

use crate::policy::Policy;
use abhrs_core::{message_digest, SignatureTranscript, Statement, Theta, TrustAnchorSet};
use abhrs_crypto::ProtocolBackend;
use serde::{Deserialize, Serialize};

/// Reason a signature was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum VerificationFailure {
    /// Null commitment id, or commitment not the one the signature consumed
    #[error("commitment is malformed or not bound to the signature")]
    MalformedCommitment,
    /// Ring identity set, message or signature authenticity diverges
    #[error("ring binding does not match the transcript")]
    RingMismatch,
    /// Signature parameters differ from the verifier's theta
    #[error("signature parameters differ from the supplied theta")]
    ParameterMismatch,
    /// No authority's statement verifies against the proof
    #[error("proof does not verify for any trusted authority")]
    ProofFailure,
}

/// Verifies transcripts through a [`ProtocolBackend`]
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    backend: ProtocolBackend,
}

impl SignatureVerifier {
    /// Create a verifier
    pub fn new(backend: ProtocolBackend) -> Self {
        Self { backend }
    }

    /// Accept or reject; never panics, never errors
    pub fn verify_signature(
        &self,
        theta: &Theta,
        message: &[u8],
        transcript: &SignatureTranscript,
        policy: &Policy,
        anchors: &TrustAnchorSet,
    ) -> bool {
        match self.diagnose_signature(theta, message, transcript, policy, anchors) {
            Ok(()) => true,
            Err(failure) => {
                tracing::debug!(
                    signature = %transcript.ring_signature.id,
                    %failure,
                    "Signature rejected"
                );
                false
            }
        }
    }

    /// Check a transcript, naming the first failed check
    pub fn diagnose_signature(
        &self,
        theta: &Theta,
        message: &[u8],
        transcript: &SignatureTranscript,
        policy: &Policy,
        anchors: &TrustAnchorSet,
    ) -> Result<(), VerificationFailure> {
        let SignatureTranscript {
            ring,
            commitment,
            proof,
            ring_signature,
        } = transcript;
        let binding = &ring_signature.binding;

        if !commitment.is_well_formed() || binding.commitment_id != commitment.id {
            return Err(VerificationFailure::MalformedCommitment);
        }

        if !self.backend.ring_signatures.verify_binding(ring_signature)
            || binding.ring_id != ring.id
            || binding.member_ids != ring.identity_set()
            || binding.message_digest != message_digest(message)
        {
            return Err(VerificationFailure::RingMismatch);
        }

        if !binding.parameters.same_parameters(theta) {
            return Err(VerificationFailure::ParameterMismatch);
        }

        let proof_bound = matches!(proof.digest(), Ok(digest) if digest == binding.proof_digest);
        if !binding.proof_outcome || !proof_bound {
            return Err(VerificationFailure::ProofFailure);
        }

        let accepted = anchors.authorities().any(|authority| {
            let statement = Statement {
                ca: authority.id.clone(),
                policy_id: policy.id.clone(),
                commitment_id: commitment.id,
                message: message.to_vec(),
            };
            self.backend.proofs.verify(&statement, proof)
        });
        if !accepted {
            return Err(VerificationFailure::ProofFailure);
        }
        Ok(())
    }
}
