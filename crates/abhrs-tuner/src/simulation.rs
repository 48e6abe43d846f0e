//! Sign/verify simulation driven by the tuner
//!
//! A [`Simulation`] owns everything needed to run one sign-then-verify cycle
//! per workload item: the enrolled participants, the signer, the verifier
//! and the trust anchors. Items are independent, so a round simulates them
//! in parallel.

use abhrs_core::{
    AbhrsError, AttributeSchema, AttributeSet, CaId, CaPublicKey, Credential, Effects, EpochSecret,
    PublicKeyRecord, Result, RootId, SignatureTranscript, Theta, TrustAnchorSet, UserId,
};
use abhrs_crypto::ProtocolBackend;
use abhrs_protocol::{
    build_ring, CredentialIssuer, EpochSigner, Policy, SignatureVerifier, TrustRegistry, User,
};
use rayon::prelude::*;
use std::sync::Arc;

/// One message/policy pair to sign and verify
#[derive(Debug, Clone)]
pub struct WorkloadItem {
    /// Message to sign
    pub message: Vec<u8>,
    /// Policy the signer proves
    pub policy: Policy,
}

impl WorkloadItem {
    /// Create an item
    pub fn new(message: impl Into<Vec<u8>>, policy: Policy) -> Self {
        Self {
            message: message.into(),
            policy,
        }
    }
}

/// Items simulated each round
#[derive(Debug, Clone, Default)]
pub struct Workload {
    /// Items in submission order
    pub items: Vec<WorkloadItem>,
}

impl Workload {
    /// Create from items
    pub fn new(items: Vec<WorkloadItem>) -> Self {
        Self { items }
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Signing material for one simulated user
#[derive(Debug, Clone)]
pub struct Participant {
    /// Authority that issued the credential
    pub ca_key: CaPublicKey,
    /// Ring key record
    pub public_key: PublicKeyRecord,
    /// Attribute map
    pub attributes: AttributeSet,
    /// Credential over the attributes
    pub credential: Credential,
    /// Epoch secret the simulation signs from
    pub secret: EpochSecret,
}

impl Participant {
    /// Snapshot a user's current signing material
    pub fn from_user(user: &User, ca_key: CaPublicKey, credential: Credential) -> Self {
        Self {
            ca_key,
            public_key: user.public_key.clone(),
            attributes: user.attributes.clone(),
            credential,
            secret: user.secret().clone(),
        }
    }
}

/// Result of simulating one workload item
#[derive(Debug, Clone)]
pub enum ItemOutcome {
    /// Signing succeeded; `verified` is the verifier's verdict
    Signed {
        /// Produced transcript
        transcript: Box<SignatureTranscript>,
        /// Whether the transcript verified
        verified: bool,
    },
    /// Signing failed; the item counts as rejected
    Rejected {
        /// Size of the ring that was built
        ring_size: usize,
        /// Error rendered for logs
        reason: String,
    },
}

impl ItemOutcome {
    /// Ring size used for this item
    pub fn ring_size(&self) -> usize {
        match self {
            ItemOutcome::Signed { transcript, .. } => transcript.ring.len(),
            ItemOutcome::Rejected { ring_size, .. } => *ring_size,
        }
    }

    /// Transcript of an item that signed and verified
    pub fn accepted_transcript(&self) -> Option<&SignatureTranscript> {
        match self {
            ItemOutcome::Signed {
                transcript,
                verified: true,
            } => Some(transcript.as_ref()),
            _ => None,
        }
    }
}

/// Sign/verify environment for tuning rounds
#[derive(Debug)]
pub struct Simulation {
    signer: EpochSigner,
    verifier: SignatureVerifier,
    anchors: TrustAnchorSet,
    participants: Vec<Participant>,
    honest_keys: Vec<PublicKeyRecord>,
    effects: Effects,
}

impl Simulation {
    /// Assemble from explicit parts
    pub fn new(
        backend: ProtocolBackend,
        anchors: TrustAnchorSet,
        participants: Vec<Participant>,
        effects: Effects,
    ) -> Result<Self> {
        if participants.is_empty() {
            return Err(AbhrsError::invalid("simulation needs at least one participant"));
        }
        let honest_keys = participants.iter().map(|p| p.public_key.clone()).collect();
        Ok(Self {
            signer: EpochSigner::new(backend.clone(), effects.clone()),
            verifier: SignatureVerifier::new(backend),
            anchors,
            participants,
            honest_keys,
            effects,
        })
    }

    /// Stand up a registry with one root and one authority, and enroll
    /// `participants` users that all carry `attributes`
    pub fn bootstrap(
        backend: ProtocolBackend,
        participants: usize,
        attributes: AttributeSet,
        effects: Effects,
    ) -> Result<Self> {
        let registry = Arc::new(TrustRegistry::new());
        let root = RootId::new("sim-root");
        let ca = CaId::new("sim-ca");
        registry.register_root(root.clone(), &effects)?;
        let ca_key = registry.register_ca(ca.clone(), root, &effects)?;
        let issuer =
            CredentialIssuer::new(registry.clone(), AttributeSchema::default(), effects.clone());

        let enrolled = (0..participants)
            .map(|i| -> Result<Participant> {
                let user = User::enroll(
                    UserId::new(format!("sim-user-{i}")),
                    attributes.clone(),
                    ca.clone(),
                    &effects,
                );
                let credential = issuer.issue_for_user(&ca_key, &user.id, &user.attributes)?;
                Ok(Participant::from_user(&user, ca_key.clone(), credential))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(backend, registry.anchor_set(), enrolled, effects)
    }

    /// Enrolled participants
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Trust anchors the verifier checks against
    pub fn anchors(&self) -> &TrustAnchorSet {
        &self.anchors
    }

    /// Build a ring, sign and verify one item
    pub fn simulate_item(&self, index: usize, theta: &Theta, item: &WorkloadItem) -> ItemOutcome {
        let participant = &self.participants[index % self.participants.len()];
        let ring = build_ring(theta, &self.honest_keys, &self.effects);

        match self.signer.sign_epoch(
            theta,
            &participant.ca_key,
            &participant.secret,
            &participant.attributes,
            &participant.credential,
            &ring,
            &item.message,
            &item.policy,
        ) {
            Ok(transcript) => {
                let verified = self.verifier.verify_signature(
                    theta,
                    &item.message,
                    &transcript,
                    &item.policy,
                    &self.anchors,
                );
                ItemOutcome::Signed {
                    transcript: Box::new(transcript),
                    verified,
                }
            }
            Err(error) => ItemOutcome::Rejected {
                ring_size: ring.len(),
                reason: error.to_string(),
            },
        }
    }

    /// Simulate every item in parallel; returns once all items finish
    pub fn simulate(&self, theta: &Theta, workload: &Workload) -> Vec<ItemOutcome> {
        workload
            .items
            .par_iter()
            .enumerate()
            .map(|(index, item)| self.simulate_item(index, theta, item))
            .collect()
    }
}
