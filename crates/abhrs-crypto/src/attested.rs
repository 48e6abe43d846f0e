//! Keyed and signature-backed capability implementations
//!
//! - [`KeyedCommitments`]: BLAKE3 keyed by the epoch secret over id and a
//!   random nonce. Hiding without the secret, binding under BLAKE3.
//! - [`Ed25519Proofs`]: the prover attests to the statement digest and the
//!   relation outcome with a long-lived Ed25519 key. Verifiers hold only the
//!   verifying key.
//! - [`Ed25519RingSignatures`]: one-time Ed25519 key per signature over the
//!   ring binding digest. The one-time key reveals nothing about which ring
//!   member signed.

use crate::capabilities::{CommitmentScheme, ProofSystem, RingSignatureScheme, WitnessRelation};
use abhrs_core::hash::{self, Hash32};
use abhrs_core::{
    AbhrsError, Commitment, CommitmentId, Effects, EpochSecret, Proof, Result, RingBinding,
    RingSignature, SignatureId, Statement, Witness,
};
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

const COMMIT_DOMAIN: &str = "abhrs/keyed/commitment/v1";
const PROOF_DOMAIN: &str = "abhrs/ed25519/proof/v1";

// ========== Commitments ==========

/// Commitment keyed by the epoch secret
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyedCommitments;

impl KeyedCommitments {
    fn binding(secret: &EpochSecret, id: CommitmentId, nonce: &Hash32) -> Hash32 {
        hash::keyed_hash(
            secret.expose_secret(),
            COMMIT_DOMAIN,
            &[&id.value().to_le_bytes(), nonce],
        )
    }
}

impl CommitmentScheme for KeyedCommitments {
    fn name(&self) -> &'static str {
        "keyed-blake3"
    }

    fn commit(&self, secret: &EpochSecret, effects: &Effects) -> Result<Commitment> {
        let id: CommitmentId = effects.allocate();
        let nonce: Hash32 = effects.random_bytes();
        Ok(Commitment {
            id,
            binding: Self::binding(secret, id, &nonce),
            nonce,
        })
    }

    fn opens(&self, commitment: &Commitment, secret: &EpochSecret) -> bool {
        let expected = Self::binding(secret, commitment.id, &commitment.nonce);
        commitment.is_well_formed() && bool::from(commitment.binding.ct_eq(&expected))
    }
}

// ========== Proofs ==========

/// Ed25519-attested proofs
#[derive(Clone)]
pub struct Ed25519Proofs {
    signing_key: Option<SigningKey>,
    verifying_key: VerifyingKey,
}

impl Ed25519Proofs {
    /// Prover with a freshly sampled key
    pub fn generate(effects: &Effects) -> Self {
        let seed = Zeroizing::new(effects.random_bytes::<32>());
        let signing_key = SigningKey::from_bytes(&seed);
        Self {
            verifying_key: signing_key.verifying_key(),
            signing_key: Some(signing_key),
        }
    }

    /// Verifier that cannot produce proofs
    pub fn verifier_only(verifying_key: VerifyingKey) -> Self {
        Self {
            signing_key: None,
            verifying_key,
        }
    }

    /// Public key proofs verify against
    pub fn verifying_key(&self) -> VerifyingKey {
        self.verifying_key
    }

    fn attested_message(statement_digest: &Hash32, outcome: bool) -> Hash32 {
        hash::hash_chunks(PROOF_DOMAIN, &[statement_digest, &[u8::from(outcome)]])
    }
}

impl std::fmt::Debug for Ed25519Proofs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519Proofs")
            .field("can_prove", &self.signing_key.is_some())
            .field("verifying_key", &hex::encode(self.verifying_key.as_bytes()))
            .finish()
    }
}

impl ProofSystem for Ed25519Proofs {
    fn name(&self) -> &'static str {
        "ed25519"
    }

    fn prove(
        &self,
        statement: &Statement,
        witness: &Witness<'_>,
        relation: &dyn WitnessRelation,
    ) -> Result<Proof> {
        let signing_key = self
            .signing_key
            .as_ref()
            .ok_or_else(|| AbhrsError::crypto("proof system holds no signing key"))?;

        let statement_digest = statement.digest()?;
        let outcome = relation.holds(statement, witness);
        let signature = signing_key.sign(&Self::attested_message(&statement_digest, outcome));

        Ok(Proof {
            statement_digest,
            outcome,
            evidence: signature.to_bytes().to_vec(),
        })
    }

    fn verify(&self, statement: &Statement, proof: &Proof) -> bool {
        if !proof.outcome {
            return false;
        }
        let Ok(digest) = statement.digest() else {
            return false;
        };
        if proof.statement_digest != digest {
            return false;
        }
        let Ok(signature) = Signature::from_slice(&proof.evidence) else {
            return false;
        };
        self.verifying_key
            .verify_strict(&Self::attested_message(&digest, proof.outcome), &signature)
            .is_ok()
    }
}

// ========== Ring Signatures ==========

/// One-time Ed25519 signatures over ring bindings
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519RingSignatures;

impl RingSignatureScheme for Ed25519RingSignatures {
    fn name(&self) -> &'static str {
        "ed25519-one-time"
    }

    fn sign_binding(&self, binding: RingBinding, effects: &Effects) -> Result<RingSignature> {
        let digest = binding.digest()?;
        let seed = Zeroizing::new(effects.random_bytes::<32>());
        let one_time = SigningKey::from_bytes(&seed);
        let signature = one_time.sign(&digest);
        let id: SignatureId = effects.allocate();

        Ok(RingSignature {
            id,
            binding,
            signer_key: one_time.verifying_key().to_bytes().to_vec(),
            tag: signature.to_bytes().to_vec(),
        })
    }

    fn verify_binding(&self, signature: &RingSignature) -> bool {
        let Ok(key_bytes) = <[u8; 32]>::try_from(signature.signer_key.as_slice()) else {
            return false;
        };
        let Ok(verifying_key) = VerifyingKey::from_bytes(&key_bytes) else {
            return false;
        };
        let Ok(tag) = Signature::from_slice(&signature.tag) else {
            return false;
        };
        let Ok(digest) = signature.binding.digest() else {
            return false;
        };
        verifying_key.verify_strict(&digest, &tag).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abhrs_core::{
        AttributeSet, CaId, Credential, CredentialId, KeyId, PolicyId, PublicKeyRecord, Ring,
        RingId, Theta,
    };
    use assert_matches::assert_matches;

    fn statement() -> Statement {
        Statement {
            ca: CaId::new("ca-1"),
            policy_id: PolicyId::new("p"),
            commitment_id: CommitmentId::from(5),
            message: b"payload".to_vec(),
        }
    }

    #[test]
    fn test_keyed_commitment_hides_behind_nonce() {
        let effects = Effects::for_test("keyed_commitment");
        let secret = EpochSecret::from_bytes([1; 32]);
        let a = KeyedCommitments.commit(&secret, &effects).unwrap();
        let b = KeyedCommitments.commit(&secret, &effects).unwrap();
        assert_ne!(a.nonce, b.nonce);
        assert!(KeyedCommitments.opens(&a, &secret));
        assert!(!KeyedCommitments.opens(&a, &EpochSecret::from_bytes([2; 32])));

        let mut forged = a.clone();
        forged.id = CommitmentId::NULL;
        assert!(!KeyedCommitments.opens(&forged, &secret));
    }

    #[test]
    fn test_ed25519_proof_roundtrip_and_verifier_only() {
        let effects = Effects::for_test("ed25519_proofs");
        let prover = Ed25519Proofs::generate(&effects);
        let verifier = Ed25519Proofs::verifier_only(prover.verifying_key());

        let secret = EpochSecret::from_bytes([1; 32]);
        let credential = Credential {
            id: CredentialId::from(1),
            issuer: CaId::new("ca-1"),
            attributes: AttributeSet::new().with("role", "admin"),
            signature: Vec::new(),
        };
        let witness = Witness {
            attributes: &credential.attributes,
            credential: &credential,
            secret: &secret,
        };

        let proof = prover
            .prove(&statement(), &witness, &|_: &Statement, _: &Witness<'_>| true)
            .unwrap();
        assert!(verifier.verify(&statement(), &proof));

        let mut flipped = proof.clone();
        flipped.evidence[0] ^= 1;
        assert!(!verifier.verify(&statement(), &flipped));

        assert_matches!(
            verifier.prove(&statement(), &witness, &|_: &Statement, _: &Witness<'_>| true),
            Err(AbhrsError::Crypto { .. })
        );
    }

    #[test]
    fn test_one_time_ring_signature() {
        let effects = Effects::for_test("ed25519_ring");
        let ring = Ring {
            id: RingId::from(10),
            members: vec![
                PublicKeyRecord::decoy(KeyId::from(11)),
                PublicKeyRecord::decoy(KeyId::from(12)),
            ],
        };
        let commitment = Commitment {
            id: CommitmentId::from(13),
            binding: [7; 32],
            nonce: [8; 32],
        };
        let proof = Proof {
            statement_digest: [9; 32],
            outcome: true,
            evidence: vec![1, 2, 3],
        };
        let sig = Ed25519RingSignatures
            .ring_sign(&ring, b"m", &commitment, &proof, &Theta::new(2, 0.5), &effects)
            .unwrap();
        assert!(Ed25519RingSignatures.verify_binding(&sig));

        let mut tampered = sig.clone();
        tampered.binding.parameters.target_ring_size = 3;
        assert!(!Ed25519RingSignatures.verify_binding(&tampered));

        let mut truncated = sig;
        truncated.tag.truncate(10);
        assert!(!Ed25519RingSignatures.verify_binding(&truncated));
    }
}
