//! Unified error system for the ABHRS-FS engine
//!
//! One flat error type shared by every crate in the workspace. Verification and
//! chain validation never surface these errors; they are total boolean
//! predicates with separate reason enums for diagnostics.

use serde::{Deserialize, Serialize};

/// Unified error type for all protocol operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum AbhrsError {
    /// Invalid input or configuration
    #[error("Invalid: {message}")]
    Invalid {
        /// Error message describing the invalid input
        message: String,
    },

    /// Credential issuance requested by a key that is not a registered CA
    #[error("Unauthorized issuer: {message}")]
    UnauthorizedIssuer {
        /// Error message naming the rejected issuer
        message: String,
    },

    /// Attribute set failed the issuance schema
    #[error("Malformed attributes: {message}")]
    MalformedAttributes {
        /// Error message describing the schema violation
        message: String,
    },

    /// A certificate-chain validation step failed
    #[error("Validation failure: {message}")]
    ValidationFailure {
        /// Error message naming the failed step
        message: String,
    },

    /// Statement/proof mismatch or proof generation failure
    #[error("Proof failure: {message}")]
    ProofFailure {
        /// Error message describing the proof failure
        message: String,
    },

    /// Ring identity set, message, or commitment diverges from recomputed values
    #[error("Ring mismatch: {message}")]
    RingMismatch {
        /// Error message describing the diverging field
        message: String,
    },

    /// Signature parameter snapshot differs from the verifier's theta
    #[error("Parameter mismatch: {message}")]
    ParameterMismatch {
        /// Error message describing the mismatch
        message: String,
    },

    /// Cryptographic operation failed
    #[error("Crypto error: {message}")]
    Crypto {
        /// Error message describing the cryptographic failure
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message describing the serialization failure
        message: String,
    },

    /// Configuration could not be loaded or failed validation
    #[error("Config error: {message}")]
    Config {
        /// Error message describing the configuration problem
        message: String,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal error
        message: String,
    },
}

impl AbhrsError {
    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create an unauthorized issuer error
    pub fn unauthorized_issuer(message: impl Into<String>) -> Self {
        Self::UnauthorizedIssuer {
            message: message.into(),
        }
    }

    /// Create a malformed attributes error
    pub fn malformed_attributes(message: impl Into<String>) -> Self {
        Self::MalformedAttributes {
            message: message.into(),
        }
    }

    /// Create a validation failure error
    pub fn validation_failure(message: impl Into<String>) -> Self {
        Self::ValidationFailure {
            message: message.into(),
        }
    }

    /// Create a proof failure error
    pub fn proof_failure(message: impl Into<String>) -> Self {
        Self::ProofFailure {
            message: message.into(),
        }
    }

    /// Create a ring mismatch error
    pub fn ring_mismatch(message: impl Into<String>) -> Self {
        Self::RingMismatch {
            message: message.into(),
        }
    }

    /// Create a parameter mismatch error
    pub fn parameter_mismatch(message: impl Into<String>) -> Self {
        Self::ParameterMismatch {
            message: message.into(),
        }
    }

    /// Create a crypto error
    pub fn crypto(message: impl Into<String>) -> Self {
        Self::Crypto {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Standard Result type for protocol operations
pub type Result<T> = std::result::Result<T, AbhrsError>;

impl From<std::io::Error> for AbhrsError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::config(err.to_string()),
            _ => Self::internal(err.to_string()),
        }
    }
}

impl From<toml::de::Error> for AbhrsError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(err.to_string())
    }
}
