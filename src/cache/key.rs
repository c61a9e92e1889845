//! Key Normalization Module
//!
//! Maps logical keys to the physical keys shared by both tiers.

use md5::{Digest, Md5};

/// Longest logical key stored verbatim; anything longer is hashed.
pub const MAX_KEY_LENGTH: usize = 250;

/// Prefix marking a physical key produced by hashing.
pub const HASHED_KEY_PREFIX: &str = "hash:";

/// Returns the lowercase hex MD5 digest of `input`.
///
/// Also used to turn free text (search queries) into stable key fragments.
pub fn hash_fragment(input: &str) -> String {
    format!("{:x}", Md5::digest(input.as_bytes()))
}

/// Resolves a logical key to its physical key.
///
/// Keys up to [`MAX_KEY_LENGTH`] characters pass through unchanged; longer
/// keys become `"hash:" + md5(key)`.
pub fn normalize_key(key: &str) -> String {
    if key.chars().count() > MAX_KEY_LENGTH {
        format!("{}{}", HASHED_KEY_PREFIX, hash_fragment(key))
    } else {
        key.to_string()
    }
}

/// Strips the trailing wildcard run from an invalidation pattern.
pub fn pattern_prefix(pattern: &str) -> &str {
    pattern.trim_end_matches('*')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_key_unchanged() {
        assert_eq!(normalize_key("taxonomy:categories:123"), "taxonomy:categories:123");
        assert_eq!(normalize_key(""), "");
    }

    #[test]
    fn test_boundary_length() {
        let at_limit = "k".repeat(MAX_KEY_LENGTH);
        assert_eq!(normalize_key(&at_limit), at_limit);

        let over_limit = "k".repeat(MAX_KEY_LENGTH + 1);
        let physical = normalize_key(&over_limit);
        assert!(physical.starts_with(HASHED_KEY_PREFIX));
        assert_eq!(physical.len(), HASHED_KEY_PREFIX.len() + 32);
    }

    #[test]
    fn test_normalization_is_deterministic() {
        let key = "q".repeat(400);
        assert_eq!(normalize_key(&key), normalize_key(&key));
    }

    #[test]
    fn test_long_keys_with_shared_prefix_do_not_collide() {
        let base = "a".repeat(MAX_KEY_LENGTH);
        let first = format!("{}-first", base);
        let second = format!("{}-second", base);
        assert_ne!(normalize_key(&first), normalize_key(&second));
    }

    #[test]
    fn test_hash_fragment_known_value() {
        assert_eq!(hash_fragment(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(hash_fragment("hello"), "5d41402abc4b2a76b9719d911017c592");
    }

    #[test]
    fn test_pattern_prefix_strips_stars() {
        assert_eq!(pattern_prefix("search:query:*"), "search:query:");
        assert_eq!(pattern_prefix("search:**"), "search:");
        assert_eq!(pattern_prefix("plain"), "plain");
    }
}
