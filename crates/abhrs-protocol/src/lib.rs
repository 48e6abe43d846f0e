//! ABHRS Protocol - orchestration for attribute-based hiding ring signatures
//!
//! Components, leaves first:
//!
//! - [`registry`]: roots, certification authorities, certificates and
//!   trust-anchor snapshots
//! - [`issuer`]: credential issuance with authorization and schema checks
//! - [`validator`]: certificate chain validation
//! - [`ring`]: padded, permuted ring construction
//! - [`epoch`] and [`user`]: forward-secure per-user epoch secrets
//! - [`signer`] and [`verifier`]: epoch signatures and their verification
//!
//! All randomness and fresh identifiers come from an injected
//! [`abhrs_core::Effects`]; all cryptography goes through an
//! [`abhrs_crypto::ProtocolBackend`].

#![forbid(unsafe_code)]

/// Per-user epoch state
pub mod epoch;
/// Credential issuance
pub mod issuer;
/// Attribute policies
pub mod policy;
/// Trust registry
pub mod registry;
/// Ring construction
pub mod ring;
/// Epoch signer
pub mod signer;
/// Enrolled users
pub mod user;
/// Certificate chain validation
pub mod validator;
/// Signature verification
pub mod verifier;

pub use epoch::{EpochKeyManager, EpochState};
pub use issuer::CredentialIssuer;
pub use policy::{Policy, PolicyPredicate};
pub use registry::{user_key_handle, TrustRegistry};
pub use ring::build_ring;
pub use signer::EpochSigner;
pub use user::User;
pub use validator::{check_chain, validate_chain, ChainRejection};
pub use verifier::{SignatureVerifier, VerificationFailure};
