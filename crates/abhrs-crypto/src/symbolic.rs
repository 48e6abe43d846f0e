//! Symbolic capability implementations
//!
//! Deterministic, unkeyed stand-ins for the real primitives. They check the
//! orchestration contracts (fresh ids, binding to the statement, outcome
//! propagation) without offering any cryptographic hiding. Use them in
//! simulations and tests, never in production.

use crate::capabilities::{CommitmentScheme, ProofSystem, RingSignatureScheme, WitnessRelation};
use abhrs_core::hash::{self, Hash32};
use abhrs_core::{
    Commitment, CommitmentId, Effects, EpochSecret, Proof, Result, RingBinding, RingSignature,
    SignatureId, Statement, Witness,
};

const COMMIT_DOMAIN: &str = "abhrs/symbolic/commitment/v1";
const PROOF_DOMAIN: &str = "abhrs/symbolic/proof/v1";
const RING_DOMAIN: &str = "abhrs/symbolic/ring-signature/v1";

/// Commitment = H(secret || id)
#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolicCommitments;

impl SymbolicCommitments {
    fn binding(secret: &EpochSecret, id: CommitmentId) -> Hash32 {
        hash::hash_chunks(
            COMMIT_DOMAIN,
            &[secret.expose_secret(), &id.value().to_le_bytes()],
        )
    }
}

impl CommitmentScheme for SymbolicCommitments {
    fn name(&self) -> &'static str {
        "symbolic"
    }

    fn commit(&self, secret: &EpochSecret, effects: &Effects) -> Result<Commitment> {
        let id: CommitmentId = effects.allocate();
        Ok(Commitment {
            id,
            binding: Self::binding(secret, id),
            nonce: [0u8; 32],
        })
    }

    fn opens(&self, commitment: &Commitment, secret: &EpochSecret) -> bool {
        commitment.is_well_formed() && commitment.binding == Self::binding(secret, commitment.id)
    }
}

/// Proof evidence = H(statement digest || outcome)
#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolicProofs;

fn proof_evidence(statement_digest: &Hash32, outcome: bool) -> Hash32 {
    hash::hash_chunks(PROOF_DOMAIN, &[statement_digest, &[u8::from(outcome)]])
}

impl ProofSystem for SymbolicProofs {
    fn name(&self) -> &'static str {
        "symbolic"
    }

    fn prove(
        &self,
        statement: &Statement,
        witness: &Witness<'_>,
        relation: &dyn WitnessRelation,
    ) -> Result<Proof> {
        let statement_digest = statement.digest()?;
        let outcome = relation.holds(statement, witness);
        Ok(Proof {
            statement_digest,
            outcome,
            evidence: proof_evidence(&statement_digest, outcome).to_vec(),
        })
    }

    fn verify(&self, statement: &Statement, proof: &Proof) -> bool {
        let Ok(digest) = statement.digest() else {
            return false;
        };
        proof.outcome
            && proof.statement_digest == digest
            && proof.evidence == proof_evidence(&digest, proof.outcome)
    }
}

/// Ring tag = H(binding digest)
#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolicRingSignatures;

impl RingSignatureScheme for SymbolicRingSignatures {
    fn name(&self) -> &'static str {
        "symbolic"
    }

    fn sign_binding(&self, binding: RingBinding, effects: &Effects) -> Result<RingSignature> {
        let digest = binding.digest()?;
        let id: SignatureId = effects.allocate();
        Ok(RingSignature {
            id,
            binding,
            signer_key: Vec::new(),
            tag: hash::hash(RING_DOMAIN, &digest).to_vec(),
        })
    }

    fn verify_binding(&self, signature: &RingSignature) -> bool {
        match signature.binding.digest() {
            Ok(digest) => signature.tag == hash::hash(RING_DOMAIN, &digest),
            Err(_) => false,
        }
    }
}
