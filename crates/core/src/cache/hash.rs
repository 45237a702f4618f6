//! Namespaced row identifiers for the icon store.

use sha2::{Digest, Sha256};

/// Compute the row identifier of `key` inside `namespace`.
///
/// Identical keys in different namespaces never collide.
pub fn compute_entry_id(namespace: &str, key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(namespace.as_bytes());
    hasher.update(b"\n");
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_stability() {
        let hash1 = compute_entry_id("favicons-v1", "https://example.com/favicon.ico");
        let hash2 = compute_entry_id("favicons-v1", "https://example.com/favicon.ico");
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_hash_different_namespace() {
        let v1 = compute_entry_id("favicons-v1", "https://example.com/favicon.ico");
        let v2 = compute_entry_id("favicons-v2", "https://example.com/favicon.ico");
        assert_ne!(v1, v2);
    }

    #[test]
    fn test_hash_separator_prevents_ambiguity() {
        let a = compute_entry_id("ab", "c");
        let b = compute_entry_id("a", "bc");
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_format() {
        let hash = compute_entry_id("favicons-v1", "https://example.com");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
