//! Cache key: `(source_lang, target_lang, content_hash)`.

use sha2::{Digest, Sha256};

/// A cache key identifying a specific translation request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    source_lang: String,
    target_lang: String,
    content_hash: [u8; 32],
}

impl CacheKey {
    /// Build a key for translating `code` from `source_lang` to `target_lang`.
    #[must_use]
    pub fn new(source_lang: &str, target_lang: &str, code: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(code.as_bytes());
        let content_hash: [u8; 32] = hasher.finalize().into();
        Self {
            source_lang: source_lang.to_ascii_lowercase(),
            target_lang: target_lang.to_ascii_lowercase(),
            content_hash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_inputs_produce_equal_keys() {
        let a = CacheKey::new("Python", "Rust", "print(1)");
        let b = CacheKey::new("python", "rust", "print(1)");
        assert_eq!(a, b);
    }

    #[test]
    fn differing_code_produces_different_keys() {
        let a = CacheKey::new("Python", "Rust", "print(1)");
        let b = CacheKey::new("Python", "Rust", "print(2)");
        assert_ne!(a, b);
    }

    #[test]
    fn differing_language_pair_produces_different_keys() {
        let a = CacheKey::new("Python", "Rust", "print(1)");
        let b = CacheKey::new("Python", "Java", "print(1)");
        assert_ne!(a, b);
    }
}
