//! Statements, proofs, ring signatures and the signature transcript

use super::credential::Credential;
use super::ring::Ring;
use crate::attributes::AttributeSet;
use crate::hash::{self, Hash32};
use crate::identifiers::{CaId, CommitmentId, KeyId, PolicyId, RingId, SignatureId};
use crate::params::Theta;
use crate::secret::EpochSecret;
use crate::{serialization, Result};
use serde::{Deserialize, Serialize};

/// Digest of a signed message
pub fn message_digest(message: &[u8]) -> Hash32 {
    hash::hash("abhrs/message/v1", message)
}

/// Fresh per-signature binding to the current epoch secret
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    /// Commitment id; never null for a well-formed commitment
    pub id: CommitmentId,
    /// Opaque binding produced by the commitment scheme
    pub binding: Hash32,
    /// Per-commitment randomness
    pub nonce: Hash32,
}

impl Commitment {
    /// Whether the commitment carries a non-null id
    pub fn is_well_formed(&self) -> bool {
        !self.id.is_null()
    }
}

/// Public statement proven by the signer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// Authority whose credential the witness holds
    pub ca: CaId,
    /// Policy the attributes satisfy
    pub policy_id: PolicyId,
    /// Commitment the proof is bound to
    pub commitment_id: CommitmentId,
    /// Signed message
    #[serde(with = "serde_bytes")]
    pub message: Vec<u8>,
}

impl Statement {
    /// Canonical statement digest
    pub fn digest(&self) -> Result<Hash32> {
        serialization::hash_canonical("abhrs/statement/v1", self)
    }
}

/// Private witness; never leaves the signer
#[derive(Debug, Clone, Copy)]
pub struct Witness<'a> {
    /// Attribute map
    pub attributes: &'a AttributeSet,
    /// Credential covering the attributes
    pub credential: &'a Credential,
    /// Current epoch secret
    pub secret: &'a EpochSecret,
}

/// Proof binding a statement to a validity outcome
///
/// Carries only the statement digest, so the authority and policy behind
/// the statement are not readable from the proof itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// Digest of the statement proven
    pub statement_digest: Hash32,
    /// Whether the witness satisfied the relation
    pub outcome: bool,
    /// Backend-specific evidence
    #[serde(with = "serde_bytes")]
    pub evidence: Vec<u8>,
}

impl Proof {
    /// Canonical proof digest
    pub fn digest(&self) -> Result<Hash32> {
        serialization::hash_canonical("abhrs/proof/v1", self)
    }
}

/// Everything a ring signature commits to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingBinding {
    /// Ring identifier
    pub ring_id: RingId,
    /// Sorted ring identity set
    pub member_ids: Vec<KeyId>,
    /// Digest of the signed message
    pub message_digest: Hash32,
    /// Commitment consumed by this signature
    pub commitment_id: CommitmentId,
    /// Embedded proof outcome
    pub proof_outcome: bool,
    /// Digest of the embedded proof
    pub proof_digest: Hash32,
    /// Parameter snapshot in force at signing time
    pub parameters: Theta,
}

impl RingBinding {
    /// Bind the signing inputs
    pub fn new(
        ring: &Ring,
        message: &[u8],
        commitment: &Commitment,
        proof: &Proof,
        theta: &Theta,
    ) -> Result<Self> {
        Ok(Self {
            ring_id: ring.id,
            member_ids: ring.identity_set(),
            message_digest: message_digest(message),
            commitment_id: commitment.id,
            proof_outcome: proof.outcome,
            proof_digest: proof.digest()?,
            parameters: *theta,
        })
    }

    /// Canonical binding digest; this is what the ring signature signs
    pub fn digest(&self) -> Result<Hash32> {
        serialization::hash_canonical("abhrs/ring-binding/v1", self)
    }
}

/// Ring signature over a [`RingBinding`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingSignature {
    /// Signature identifier
    pub id: SignatureId,
    /// Signed binding
    pub binding: RingBinding,
    /// Backend-specific public verification material
    #[serde(with = "serde_bytes")]
    pub signer_key: Vec<u8>,
    /// Backend-specific signature tag
    #[serde(with = "serde_bytes")]
    pub tag: Vec<u8>,
}

/// The unit that is persisted and later verified
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureTranscript {
    /// Anonymity ring
    pub ring: Ring,
    /// Epoch commitment
    pub commitment: Commitment,
    /// Statement proof
    pub proof: Proof,
    /// Ring signature
    pub ring_signature: RingSignature,
}

impl SignatureTranscript {
    /// Canonical DAG-CBOR encoding
    pub fn to_canonical_bytes(&self) -> Result<Vec<u8>> {
        serialization::to_vec(self)
    }

    /// Decode a canonical encoding
    pub fn from_canonical_bytes(bytes: &[u8]) -> Result<Self> {
        serialization::from_slice(bytes)
    }
}
