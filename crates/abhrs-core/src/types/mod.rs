//! Protocol data model
//!
//! Plain data shared by every component. Behaviour lives in `abhrs-protocol`;
//! these types only know how to encode and digest themselves.

pub mod anchors;
pub mod certificate;
pub mod credential;
pub mod keys;
pub mod ring;
pub mod transcript;

pub use anchors::TrustAnchorSet;
pub use certificate::{Certificate, CertificateChain, CertificateSubject, IssuerRef};
pub use credential::Credential;
pub use keys::{CaPublicKey, KeyIssuer, PublicKeyRecord};
pub use ring::Ring;
pub use transcript::{
    message_digest, Commitment, Proof, RingBinding, RingSignature, SignatureTranscript, Statement,
    Witness,
};
