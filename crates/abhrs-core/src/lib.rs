//! ABHRS Core - shared foundation for the ABHRS-FS engine
//!
//! Types, errors and injectable effects used by every other crate:
//!
//! - **Data model**: credentials, certificate chains, rings, commitments,
//!   proofs, ring signatures and the signature transcript
//! - **Parameters**: the theta vector and its versioned snapshot store
//! - **Effects**: randomness provider and id allocator, swapped between
//!   production and deterministic test implementations
//! - **Codec**: canonical DAG-CBOR encoding and domain-separated hashing
//! - **Configuration**: TOML + environment loading with validation

#![forbid(unsafe_code)]

/// Attribute maps and the issuance schema
pub mod attributes;
/// Protocol configuration
pub mod config;
/// Injectable randomness and id allocation
pub mod effects;
/// Unified error handling
pub mod errors;
/// Domain-separated hashing
pub mod hash;
/// Identifier types and the id allocator
pub mod identifiers;
/// Parameter vector and snapshot store
pub mod params;
/// Epoch secret key material
pub mod secret;
/// Canonical DAG-CBOR codec
pub mod serialization;
/// Protocol data model
pub mod types;

pub use attributes::{AttributeSchema, AttributeSet};
pub use config::{ConfigValidation, ProtocolConfig};
pub use effects::{Effects, OsRandomSource, RandomSource, SeededRandomSource};
pub use errors::{AbhrsError, Result};
pub use hash::Hash32;
pub use identifiers::{
    CaId, CommitmentId, CredentialId, IdAllocator, KeyId, PolicyId, RingId, RootId, SignatureId,
    UserId,
};
pub use params::{ParameterStore, Theta};
pub use secret::EpochSecret;
pub use types::*;
