//! Canonical DAG-CBOR encoding
//!
//! Independent verifiers must recompute bit-identical statements, so every
//! digest over a structured value goes through this codec. DAG-CBOR gives a
//! deterministic map ordering and a single encoding per value.

use crate::hash::{self, Hash32};
use crate::{AbhrsError, Result};
use serde::{Deserialize, Serialize};

/// Serialize any serde-compatible value to canonical DAG-CBOR bytes
pub fn to_vec<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_ipld_dagcbor::to_vec(value)
        .map_err(|e| AbhrsError::serialization(format!("Failed to encode DAG-CBOR: {e}")))
}

/// Deserialize canonical DAG-CBOR bytes
pub fn from_slice<T: for<'de> Deserialize<'de>>(bytes: &[u8]) -> Result<T> {
    serde_ipld_dagcbor::from_slice(bytes)
        .map_err(|e| AbhrsError::serialization(format!("Failed to decode DAG-CBOR: {e}")))
}

/// Canonical encoding followed by a domain-separated digest
pub fn hash_canonical<T: Serialize>(domain: &str, value: &T) -> Result<Hash32> {
    let bytes = to_vec(value)?;
    Ok(hash::hash(domain, &bytes))
}
