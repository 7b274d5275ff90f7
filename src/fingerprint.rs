//! Deterministic fingerprints for match results.
//!
//! Two fingerprints are provided: an ordered one that identifies a binding
//! array slot by slot, and an element-set one that ignores slot order and
//! repetition. The latter is what match de-duplication keys on: two matches
//! that touch exactly the same elements describe the same subgraph.

use crate::core::NodeId;
use crate::matching::Match;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Domain for ordered match fingerprints.
const DOMAIN_MATCH_SLOTS_V0: &[u8] = b"MATCH_SLOTS_V0";

/// Domain for order-insensitive element-set fingerprints.
const DOMAIN_MATCH_ELEMENTS_V0: &[u8] = b"MATCH_ELEMENTS_V0";

/// Marker written for an unbound slot.
const UNBOUND_MARKER: u64 = u64::MAX;

/// A 256‑bit hash value.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashValue(pub [u8; 32]);

impl HashValue {
    /// Computes SHA‑256 of the given data with domain separation.
    ///
    /// Input layout is `b"GM:<domain>:v1" || len(data) as u64 LE || data`.
    pub fn hash_with_domain(domain: &[u8], data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"GM:");
        hasher.update(domain);
        hasher.update(b":v1");
        hasher.update((data.len() as u64).to_le_bytes());
        hasher.update(data);
        Self(hasher.finalize().into())
    }
}

impl std::fmt::Display for HashValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // First 4 bytes are enough to tell values apart in logs.
        write!(
            f,
            "HashValue({:02x}{:02x}{:02x}{:02x}…)",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

/// Fingerprint of a binding array, slot by slot.
pub fn slot_fingerprint(m: &Match) -> HashValue {
    let mut data = Vec::with_capacity(m.len() * 8);
    for slot in m.bindings() {
        let raw = slot.map(|id| id.as_u64()).unwrap_or(UNBOUND_MARKER);
        data.extend_from_slice(&raw.to_le_bytes());
    }
    HashValue::hash_with_domain(DOMAIN_MATCH_SLOTS_V0, &data)
}

/// Fingerprint of the set of elements bound in a match.
pub fn element_set_fingerprint(m: &Match) -> HashValue {
    let mut ids: Vec<NodeId> = m.elements().collect();
    ids.sort();
    ids.dedup();
    let mut data = Vec::with_capacity(ids.len() * 8);
    for id in ids {
        data.extend_from_slice(&id.as_u64().to_le_bytes());
    }
    HashValue::hash_with_domain(DOMAIN_MATCH_ELEMENTS_V0, &data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bound(ids: &[u64]) -> Match {
        let mut m = Match::new(ids.len());
        for (i, &raw) in ids.iter().enumerate() {
            m.set(i, NodeId::new(raw));
        }
        m
    }

    #[test]
    fn domains_are_separated() {
        let a = HashValue::hash_with_domain(b"A", b"payload");
        let b = HashValue::hash_with_domain(b"B", b"payload");
        assert_ne!(a, b);
        assert_eq!(a, HashValue::hash_with_domain(b"A", b"payload"));
    }

    #[test]
    fn slot_fingerprint_is_order_sensitive() {
        assert_ne!(slot_fingerprint(&bound(&[1, 2, 3])), slot_fingerprint(&bound(&[3, 2, 1])));
        let mut partial = bound(&[1, 2, 3]);
        partial.unset(1);
        assert_ne!(slot_fingerprint(&partial), slot_fingerprint(&bound(&[1, 2, 3])));
    }

    #[test]
    fn element_set_fingerprint_ignores_order_and_repeats() {
        assert_eq!(
            element_set_fingerprint(&bound(&[1, 2, 3])),
            element_set_fingerprint(&bound(&[3, 1, 2]))
        );
        assert_eq!(
            element_set_fingerprint(&bound(&[1, 2, 1])),
            element_set_fingerprint(&bound(&[2, 1]))
        );
        assert_ne!(
            element_set_fingerprint(&bound(&[1, 2])),
            element_set_fingerprint(&bound(&[1, 3]))
        );
    }
}
