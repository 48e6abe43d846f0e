//! Domain-separated BLAKE3 hashing
//!
//! Every digest in the protocol carries a domain label so that a statement
//! digest can never collide with a commitment binding or a ring binding.

use blake3::Hasher;

/// 32-byte digest
pub type Hash32 = [u8; 32];

/// Hash bytes under a domain label
pub fn hash(domain: &str, data: &[u8]) -> Hash32 {
    hash_chunks(domain, &[data])
}

/// Hash multiple chunks under a domain label
///
/// Each chunk is length-prefixed so chunk boundaries are unambiguous.
pub fn hash_chunks(domain: &str, chunks: &[&[u8]]) -> Hash32 {
    let mut hasher = Hasher::new();
    hasher.update(&(domain.len() as u64).to_le_bytes());
    hasher.update(domain.as_bytes());
    for chunk in chunks {
        hasher.update(&(chunk.len() as u64).to_le_bytes());
        hasher.update(chunk);
    }
    *hasher.finalize().as_bytes()
}

/// Keyed hash under a domain label
pub fn keyed_hash(key: &[u8; 32], domain: &str, chunks: &[&[u8]]) -> Hash32 {
    let mut hasher = Hasher::new_keyed(key);
    hasher.update(&(domain.len() as u64).to_le_bytes());
    hasher.update(domain.as_bytes());
    for chunk in chunks {
        hasher.update(&(chunk.len() as u64).to_le_bytes());
        hasher.update(chunk);
    }
    *hasher.finalize().as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_deterministic() {
        assert_eq!(hash("abhrs/test", b"data"), hash("abhrs/test", b"data"));
    }

    #[test]
    fn test_domains_separate() {
        assert_ne!(hash("abhrs/a", b"data"), hash("abhrs/b", b"data"));
    }

    #[test]
    fn test_chunk_boundaries_matter() {
        let split = hash_chunks("abhrs/test", &[b"ab", b"c"]);
        let joined = hash_chunks("abhrs/test", &[b"a", b"bc"]);
        assert_ne!(split, joined);
    }
}
