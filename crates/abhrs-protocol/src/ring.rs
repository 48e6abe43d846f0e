//! Ring-indistinguishable padding (RIP)
//!
//! A ring holds every honest key plus enough ownerless decoys to reach the
//! target size, in a uniformly random order. The target is a floor: an
//! honest set larger than the target is never truncated.

use abhrs_core::{Effects, KeyId, PublicKeyRecord, Ring, RingId, Theta};
use rand::seq::SliceRandom;
use std::collections::HashSet;

/// Build a padded, permuted ring
///
/// Duplicate honest ids are collapsed before padding and decoy ids that
/// collide with an honest id are skipped, so the result has no repeated ids
/// and `len == max(target, distinct honest)`.
pub fn build_ring(theta: &Theta, honest: &[PublicKeyRecord], effects: &Effects) -> Ring {
    let mut seen = HashSet::with_capacity(honest.len());
    let mut members: Vec<PublicKeyRecord> = honest
        .iter()
        .filter(|record| seen.insert(record.id))
        .cloned()
        .collect();

    let honest_count = members.len();
    let decoys = theta.target_ring_size.saturating_sub(honest_count);
    members.reserve(decoys);
    for _ in 0..decoys {
        let id = fresh_decoy_id(&mut seen, effects);
        members.push(PublicKeyRecord::decoy(id));
    }

    members.shuffle(&mut effects.rng());

    let id: RingId = effects.allocate();
    tracing::debug!(
        ring = %id,
        honest = honest_count,
        decoys,
        target = theta.target_ring_size,
        "Built ring"
    );
    Ring { id, members }
}

/// Next allocated id not already in the ring
///
/// Honest keys may come from another allocator, so their ids can overlap
/// this allocator's sequence.
fn fresh_decoy_id(seen: &mut HashSet<KeyId>, effects: &Effects) -> KeyId {
    loop {
        let id: KeyId = effects.allocate();
        if seen.insert(id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abhrs_core::{CaId, UserId};

    fn honest(effects: &Effects, n: usize) -> Vec<PublicKeyRecord> {
        (0..n)
            .map(|i| {
                PublicKeyRecord::honest(
                    effects.allocate(),
                    UserId::new(format!("u{i}")),
                    CaId::new("ca-1"),
                )
            })
            .collect()
    }

    #[test]
    fn test_pads_to_target() {
        let effects = Effects::for_test("ring_pads");
        let keys = honest(&effects, 1);
        let ring = build_ring(&Theta::new(4, 0.5), &keys, &effects);
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.decoy_count(), 3);
        assert!(ring.contains(keys[0].id));
    }

    #[test]
    fn test_target_is_a_floor() {
        let effects = Effects::for_test("ring_floor");
        let keys = honest(&effects, 6);
        let ring = build_ring(&Theta::new(4, 0.5), &keys, &effects);
        assert_eq!(ring.len(), 6);
        assert_eq!(ring.decoy_count(), 0);
    }

    #[test]
    fn test_duplicates_collapsed() {
        let effects = Effects::for_test("ring_duplicates");
        let keys = honest(&effects, 2);
        let doubled: Vec<_> = keys.iter().chain(keys.iter()).cloned().collect();
        let ring = build_ring(&Theta::new(3, 0.5), &doubled, &effects);
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.honest_count(), 2);
        let ids: HashSet<_> = ring.member_ids().into_iter().collect();
        assert_eq!(ids.len(), ring.len());
    }

    #[test]
    fn test_decoys_skip_honest_ids_from_another_allocator() {
        let effects = Effects::for_test("ring_decoy_collision");
        let keys: Vec<_> = [2u64, 3]
            .into_iter()
            .map(|id| {
                PublicKeyRecord::honest(
                    KeyId::from(id),
                    UserId::new(format!("u{id}")),
                    CaId::new("ca-1"),
                )
            })
            .collect();
        let ring = build_ring(&Theta::new(4, 0.5), &keys, &effects);
        let ids: HashSet<_> = ring.member_ids().into_iter().collect();
        assert_eq!(ring.len(), 4);
        assert_eq!(ids.len(), 4);
        assert_eq!(ring.honest_count(), 2);
    }

    #[test]
    fn test_decoys_are_ownerless() {
        let effects = Effects::for_test("ring_decoys");
        let ring = build_ring(&Theta::new(5, 0.5), &[], &effects);
        assert_eq!(ring.len(), 5);
        assert!(ring.members.iter().all(|m| m.is_decoy() && m.owner.is_none()));
    }
}
