//! Identifier types and the shared id allocator
//!
//! Named identifiers (CAs, roots, users, policies) are chosen by the caller.
//! Sequence identifiers (credentials, commitments, keys, rings, signatures) are
//! handed out by an [`IdAllocator`] that is constructed explicitly and injected
//! wherever fresh ids are needed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

macro_rules! named_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            /// Create from any string-like value
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier text
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

macro_rules! sequence_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl $name {
            /// Raw sequence value
            pub fn value(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "-{}"), self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

named_id!(
    /// Certification authority identifier
    CaId
);
named_id!(
    /// Trust-anchor root identifier
    RootId
);
named_id!(
    /// User identifier
    UserId
);
named_id!(
    /// Policy identifier carried in public statements
    PolicyId
);

sequence_id!(
    /// Attribute credential identifier
    CredentialId,
    "cred"
);
sequence_id!(
    /// Public-key record identifier (honest and decoy keys share this space)
    KeyId,
    "key"
);
sequence_id!(
    /// Ring identifier
    RingId,
    "ring"
);
sequence_id!(
    /// Ring signature identifier
    SignatureId,
    "sig"
);
sequence_id!(
    /// Epoch commitment identifier; zero is the null commitment
    CommitmentId,
    "commit"
);

impl CommitmentId {
    /// The null commitment id, never handed out by an allocator
    pub const NULL: CommitmentId = CommitmentId(0);

    /// Whether this id is the null commitment
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

/// Injectable sequence generator for every allocated identifier
///
/// Only global uniqueness is required, not ordering, so a relaxed atomic
/// increment is enough under concurrent callers. Zero is never returned.
#[derive(Debug)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl IdAllocator {
    /// Create an allocator whose first id is 1
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Create an allocator starting at `first` (clamped to 1)
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first.max(1)),
        }
    }

    /// Allocate the next raw sequence value
    pub fn next_raw(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Allocate a typed identifier
    pub fn allocate<T: From<u64>>(&self) -> T {
        T::from(self.next_raw())
    }

    /// Number of ids handed out so far
    pub fn allocated(&self) -> u64 {
        self.next.load(Ordering::Relaxed).saturating_sub(1)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_allocator_never_returns_null() {
        let ids = IdAllocator::starting_at(0);
        let commitment: CommitmentId = ids.allocate();
        assert!(!commitment.is_null());
    }

    #[test]
    fn test_allocator_unique_under_concurrency() {
        let ids = Arc::new(IdAllocator::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ids = ids.clone();
                std::thread::spawn(move || (0..500).map(|_| ids.next_raw()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(seen.len(), 4000);
        assert_eq!(ids.allocated(), 4000);
    }

    #[test]
    fn test_display_prefixes() {
        assert_eq!(CredentialId(7).to_string(), "cred-7");
        assert_eq!(KeyId(3).to_string(), "key-3");
        assert_eq!(CaId::new("CA1").to_string(), "CA1");
    }
}
