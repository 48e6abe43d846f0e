//! Property test strategies for ABHRS types

use abhrs_core::{AttributeSet, CaId, KeyId, PublicKeyRecord, Theta, UserId};
use proptest::prelude::*;

pub use proptest;

/// Identifier-shaped attribute keys
pub fn arb_attribute_key() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,11}"
}

/// Non-empty attribute values
pub fn arb_attribute_value() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ._-]{1,24}"
}

/// Non-empty attribute sets that pass the default schema
pub fn arb_attribute_set() -> impl Strategy<Value = AttributeSet> {
    prop::collection::btree_map(arb_attribute_key(), arb_attribute_value(), 1..6)
        .prop_map(|map| map.into_iter().collect())
}

/// Parameter vectors in the valid domain
pub fn arb_theta() -> impl Strategy<Value = Theta> {
    (1usize..32, 0u8..=100).prop_map(|(size, percent)| Theta::new(size, f64::from(percent) / 100.0))
}

/// Honest key records with up to `max_len` distinct ids
///
/// Ids come from a small range so they overlap the sequence a fresh
/// [`abhrs_core::IdAllocator`] hands out.
pub fn arb_honest_keys(max_len: usize) -> impl Strategy<Value = Vec<PublicKeyRecord>> {
    prop::collection::btree_set(1u64..128, 0..max_len).prop_map(|ids| {
        ids.into_iter()
            .map(|id| {
                PublicKeyRecord::honest(
                    KeyId::from(id),
                    UserId::new(format!("user-{id}")),
                    CaId::new("ca-1"),
                )
            })
            .collect()
    })
}

/// Arbitrary message bytes
pub fn arb_message() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..128)
}
