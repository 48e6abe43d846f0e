//! Forward-secure epoch key ratchet
//!
//! Each epoch secret is derived from the previous one through HKDF-SHA256, a
//! one-way function: holding `SK_t` gives no way back to `SK_{t-1}`.
//!
//! # KDF Chain
//!
//! ```text
//! SK_t = HKDF-Expand(
//!     HKDF-Extract(salt="abhrs/epoch-ratchet/v1", ikm=SK_{t-1}),
//!     info="ABHRS_EPOCH_v1" || target_ring_size || decoy_ratio,
//!     L=32
//! )
//! ```
//!
//! Theta's ring parameters are part of the info string, so the chain is
//! deterministic given the previous secret and the parameter snapshot.

use abhrs_core::{AbhrsError, EpochSecret, Result, Theta};
use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroizing;

const RATCHET_SALT: &[u8] = b"abhrs/epoch-ratchet/v1";
const RATCHET_INFO: &[u8] = b"ABHRS_EPOCH_v1";

/// Derive the next epoch secret
pub fn evolve_key(prev: &EpochSecret, theta: &Theta) -> Result<EpochSecret> {
    let hkdf = Hkdf::<Sha256>::new(Some(RATCHET_SALT), prev.expose_secret());

    let mut info = Vec::with_capacity(RATCHET_INFO.len() + 16);
    info.extend_from_slice(RATCHET_INFO);
    info.extend_from_slice(&(theta.target_ring_size as u64).to_le_bytes());
    info.extend_from_slice(&theta.decoy_ratio.to_bits().to_le_bytes());

    let mut output = Zeroizing::new([0u8; 32]);
    hkdf.expand(&info, output.as_mut())
        .map_err(|e| AbhrsError::crypto(format!("HKDF expansion failed: {e}")))?;

    Ok(EpochSecret::from_bytes(*output))
}
