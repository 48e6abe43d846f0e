//! Epoch signer
//!
//! One signing call consumes one epoch step:
//!
//! ```text
//! SK_t  = evolve_key(SK_prev, theta)
//! C_t   = commit(SK_t)
//! pi    = prove((ca, policy, C_t.id, m), (attributes, credential, SK_t))
//! sigma = ring_sign(ring, m, C_t, pi, theta)
//! ```

use crate::policy::Policy;
use crate::user::User;
use crate::validator::check_chain;
use abhrs_core::{
    AbhrsError, AttributeSet, CaPublicKey, CertificateChain, Commitment, Credential, Effects,
    EpochSecret, Result, Ring, SignatureTranscript, Statement, Theta, TrustAnchorSet, Witness,
};
use abhrs_crypto::{evolve_key, CommitmentScheme, ProtocolBackend};

/// Relation proven by the signer
///
/// Holds when the credential was issued by the statement's authority, its
/// attribute snapshot matches the witness attributes, the policy accepts the
/// attributes, and the witness secret opens the commitment.
struct SigningRelation<'a> {
    policy: &'a Policy,
    commitment: &'a Commitment,
    commitments: &'a dyn CommitmentScheme,
}

impl abhrs_crypto::WitnessRelation for SigningRelation<'_> {
    fn holds(&self, statement: &Statement, witness: &Witness<'_>) -> bool {
        witness.credential.issuer == statement.ca
            && witness.credential.attributes == *witness.attributes
            && statement.policy_id == self.policy.id
            && statement.commitment_id == self.commitment.id
            && self.policy.evaluate(witness.attributes)
            && self.commitments.opens(self.commitment, witness.secret)
    }
}

struct Signed {
    transcript: SignatureTranscript,
    next_secret: EpochSecret,
}

/// Produces epoch ring signatures through a [`ProtocolBackend`]
#[derive(Debug, Clone)]
pub struct EpochSigner {
    backend: ProtocolBackend,
    effects: Effects,
}

impl EpochSigner {
    /// Create a signer
    pub fn new(backend: ProtocolBackend, effects: Effects) -> Self {
        Self { backend, effects }
    }

    /// Backend in use
    pub fn backend(&self) -> &ProtocolBackend {
        &self.backend
    }

    /// Sign `message` for one epoch step from `prev_secret`
    ///
    /// The evolved secret is not returned; use
    /// [`EpochSigner::sign_epoch_and_advance`] to keep it.
    ///
    /// # Errors
    ///
    /// `ProofFailure` when the witness does not satisfy the statement or the
    /// proof backend fails.
    pub fn sign_epoch(
        &self,
        theta: &Theta,
        ca_key: &CaPublicKey,
        prev_secret: &EpochSecret,
        attributes: &AttributeSet,
        credential: &Credential,
        ring: &Ring,
        message: &[u8],
        policy: &Policy,
    ) -> Result<SignatureTranscript> {
        theta.validate()?;
        let next_secret = evolve_key(prev_secret, theta)?;
        let commitment = self.backend.commitments.commit(&next_secret, &self.effects)?;
        self.finish(
            theta,
            ca_key,
            next_secret,
            commitment,
            attributes,
            credential,
            ring,
            message,
            policy,
        )
        .map(|signed| signed.transcript)
    }

    /// Sign and store the evolved secret back into `user`
    ///
    /// The user's ring key must be a member of `ring`. On failure the user's
    /// secret is left untouched.
    pub fn sign_epoch_and_advance(
        &self,
        theta: &Theta,
        ca_key: &CaPublicKey,
        user: &mut User,
        credential: &Credential,
        ring: &Ring,
        message: &[u8],
        policy: &Policy,
    ) -> Result<SignatureTranscript> {
        theta.validate()?;
        self.ensure_member(user, ring)?;
        let next_secret = evolve_key(user.secret(), theta)?;
        let commitment = self.backend.commitments.commit(&next_secret, &self.effects)?;
        let signed = self.finish(
            theta,
            ca_key,
            next_secret,
            commitment,
            &user.attributes,
            credential,
            ring,
            message,
            policy,
        )?;
        let epoch = user.install_secret(signed.next_secret)?;
        tracing::debug!(user = %user.id, epoch, "Advanced epoch after signing");
        Ok(signed.transcript)
    }

    /// Validate the certificate chain, then sign and advance `user`
    ///
    /// # Errors
    ///
    /// `ValidationFailure` naming the first failed chain step; nothing is
    /// proven or signed in that case.
    pub fn sign_with_chain(
        &self,
        theta: &Theta,
        anchors: &TrustAnchorSet,
        ca_key: &CaPublicKey,
        user: &mut User,
        credential: &Credential,
        chain: &CertificateChain,
        ring: &Ring,
        message: &[u8],
        policy: &Policy,
    ) -> Result<SignatureTranscript> {
        theta.validate()?;
        self.ensure_member(user, ring)?;
        let next_secret = evolve_key(user.secret(), theta)?;
        let commitment = self.backend.commitments.commit(&next_secret, &self.effects)?;

        if let Err(rejection) = check_chain(
            anchors,
            policy,
            &commitment,
            &user.attributes,
            credential,
            chain,
            &next_secret,
            self.backend.commitments.as_ref(),
        ) {
            tracing::warn!(user = %user.id, %rejection, "Chain validation failed before signing");
            return Err(AbhrsError::validation_failure(rejection.to_string()));
        }

        let signed = self.finish(
            theta,
            ca_key,
            next_secret,
            commitment,
            &user.attributes,
            credential,
            ring,
            message,
            policy,
        )?;
        user.install_secret(signed.next_secret)?;
        Ok(signed.transcript)
    }

    fn ensure_member(&self, user: &User, ring: &Ring) -> Result<()> {
        if ring.contains(user.public_key.id) {
            Ok(())
        } else {
            Err(AbhrsError::ring_mismatch(format!(
                "key {} of {} is not a member of {}",
                user.public_key.id, user.id, ring.id
            )))
        }
    }

    fn finish(
        &self,
        theta: &Theta,
        ca_key: &CaPublicKey,
        next_secret: EpochSecret,
        commitment: Commitment,
        attributes: &AttributeSet,
        credential: &Credential,
        ring: &Ring,
        message: &[u8],
        policy: &Policy,
    ) -> Result<Signed> {
        let statement = Statement {
            ca: ca_key.id.clone(),
            policy_id: policy.id.clone(),
            commitment_id: commitment.id,
            message: message.to_vec(),
        };
        let witness = Witness {
            attributes,
            credential,
            secret: &next_secret,
        };
        let relation = SigningRelation {
            policy,
            commitment: &commitment,
            commitments: self.backend.commitments.as_ref(),
        };

        let proof = self
            .backend
            .proofs
            .prove(&statement, &witness, &relation)
            .map_err(|e| AbhrsError::proof_failure(format!("proof backend failed: {e}")))?;
        if !proof.outcome {
            tracing::warn!(
                commitment = %commitment.id,
                policy = %policy.id,
                "Witness does not satisfy the statement"
            );
            return Err(AbhrsError::proof_failure(
                "witness does not satisfy the statement",
            ));
        }

        let ring_signature = self.backend.ring_signatures.ring_sign(
            ring,
            message,
            &commitment,
            &proof,
            theta,
            &self.effects,
        )?;

        tracing::info!(
            signature = %ring_signature.id,
            ring = %ring.id,
            ring_size = ring.len(),
            commitment = %commitment.id,
            theta_version = theta.version,
            "Produced epoch signature"
        );

        Ok(Signed {
            transcript: SignatureTranscript {
                ring: ring.clone(),
                commitment,
                proof,
                ring_signature,
            },
            next_secret,
        })
    }
}
