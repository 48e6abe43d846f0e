//! ABHRS Crypto - cryptographic capabilities for the ABHRS-FS engine
//!
//! The protocol never calls a primitive directly. Commitments, proofs and
//! ring signatures are reached through the traits in [`capabilities`], so a
//! backend can be swapped without touching orchestration code:
//!
//! - [`symbolic`]: deterministic test doubles
//! - [`attested`]: keyed BLAKE3 commitments and Ed25519-backed proofs and
//!   ring signatures
//!
//! The epoch ratchet in [`ratchet`] is the one primitive owned here.

#![forbid(unsafe_code)]

/// Keyed and Ed25519-backed implementations
pub mod attested;
/// Capability bundle
pub mod backend;
/// Capability traits
pub mod capabilities;
/// Forward-secure epoch ratchet
pub mod ratchet;
/// Symbolic implementations
pub mod symbolic;

pub use attested::{Ed25519Proofs, Ed25519RingSignatures, KeyedCommitments};
pub use backend::ProtocolBackend;
pub use capabilities::{CommitmentScheme, ProofSystem, RingSignatureScheme, WitnessRelation};
pub use ratchet::evolve_key;
pub use symbolic::{SymbolicCommitments, SymbolicProofs, SymbolicRingSignatures};
