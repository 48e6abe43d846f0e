//! Capability interfaces for the external cryptographic collaborators
//!
//! The orchestration layer talks to commitments, proofs and ring signatures
//! only through these traits. Implementations:
//! - Symbolic test doubles in [`crate::symbolic`]
//! - Keyed-hash and Ed25519 backends in [`crate::attested`]
//!
//! Implementations must honour the contracts documented on each method; the
//! protocol's soundness rests on them, not on which backend is plugged in.

use abhrs_core::{
    Commitment, Effects, EpochSecret, Proof, Result, Ring, RingBinding, RingSignature, Statement,
    Theta, Witness,
};

/// Commit to an epoch secret
pub trait CommitmentScheme: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &'static str;

    /// Commit to `secret` under a freshly allocated, non-null commitment id
    ///
    /// Must never return the same commitment twice.
    fn commit(&self, secret: &EpochSecret, effects: &Effects) -> Result<Commitment>;

    /// Whether `secret` is the secret bound into `commitment`
    fn opens(&self, commitment: &Commitment, secret: &EpochSecret) -> bool;
}

/// Relation the prover checks between statement and witness
pub trait WitnessRelation: Sync {
    /// Whether the witness satisfies the statement
    fn holds(&self, statement: &Statement, witness: &Witness<'_>) -> bool;
}

impl<F> WitnessRelation for F
where
    F: Fn(&Statement, &Witness<'_>) -> bool + Sync,
{
    fn holds(&self, statement: &Statement, witness: &Witness<'_>) -> bool {
        self(statement, witness)
    }
}

/// Prove statements without exposing the witness
pub trait ProofSystem: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &'static str;

    /// Produce a proof recording whether `relation` holds
    ///
    /// The returned proof must not contain witness material.
    fn prove(
        &self,
        statement: &Statement,
        witness: &Witness<'_>,
        relation: &dyn WitnessRelation,
    ) -> Result<Proof>;

    /// Accept only an authentic proof of `statement` with a true outcome
    ///
    /// Total: malformed input yields `false`.
    fn verify(&self, statement: &Statement, proof: &Proof) -> bool;
}

/// Sign ring bindings
pub trait RingSignatureScheme: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &'static str;

    /// Sign a prepared binding under a freshly allocated signature id
    fn sign_binding(&self, binding: RingBinding, effects: &Effects) -> Result<RingSignature>;

    /// Whether the signature is authentic for the binding it carries
    ///
    /// Total: malformed input yields `false`. Comparing the binding against
    /// the verifier's own ring, message and parameters is the caller's job.
    fn verify_binding(&self, signature: &RingSignature) -> bool;

    /// Bind (ring, message, commitment, proof, theta) and sign the binding
    fn ring_sign(
        &self,
        ring: &Ring,
        message: &[u8],
        commitment: &Commitment,
        proof: &Proof,
        theta: &Theta,
        effects: &Effects,
    ) -> Result<RingSignature> {
        let binding = RingBinding::new(ring, message, commitment, proof, theta)?;
        self.sign_binding(binding, effects)
    }
}
