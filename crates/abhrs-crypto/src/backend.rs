//! Capability bundle handed to the signer and verifier

use crate::attested::{Ed25519Proofs, Ed25519RingSignatures, KeyedCommitments};
use crate::capabilities::{CommitmentScheme, ProofSystem, RingSignatureScheme};
use crate::symbolic::{SymbolicCommitments, SymbolicProofs, SymbolicRingSignatures};
use abhrs_core::Effects;
use std::sync::Arc;

/// The three cryptographic collaborators, shared behind `Arc`
#[derive(Clone)]
pub struct ProtocolBackend {
    /// Epoch commitments
    pub commitments: Arc<dyn CommitmentScheme>,
    /// Statement proofs
    pub proofs: Arc<dyn ProofSystem>,
    /// Ring signatures
    pub ring_signatures: Arc<dyn RingSignatureScheme>,
}

impl ProtocolBackend {
    /// Assemble a backend from explicit implementations
    pub fn new(
        commitments: Arc<dyn CommitmentScheme>,
        proofs: Arc<dyn ProofSystem>,
        ring_signatures: Arc<dyn RingSignatureScheme>,
    ) -> Self {
        tracing::debug!(
            commitments = commitments.name(),
            proofs = proofs.name(),
            ring_signatures = ring_signatures.name(),
            "Assembled protocol backend"
        );
        Self {
            commitments,
            proofs,
            ring_signatures,
        }
    }

    /// Deterministic symbolic backend
    pub fn symbolic() -> Self {
        Self::new(
            Arc::new(SymbolicCommitments),
            Arc::new(SymbolicProofs),
            Arc::new(SymbolicRingSignatures),
        )
    }

    /// Keyed commitments, Ed25519 proofs and one-time ring signatures
    ///
    /// The proof key is sampled from `effects`; share the returned backend
    /// (or a `verifier_only` copy of its proof system) with verifiers.
    pub fn attested(effects: &Effects) -> Self {
        Self::new(
            Arc::new(KeyedCommitments),
            Arc::new(Ed25519Proofs::generate(effects)),
            Arc::new(Ed25519RingSignatures),
        )
    }
}

impl std::fmt::Debug for ProtocolBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProtocolBackend")
            .field("commitments", &self.commitments.name())
            .field("proofs", &self.proofs.name())
            .field("ring_signatures", &self.ring_signatures.name())
            .finish()
    }
}
