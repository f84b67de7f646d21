//! Hashing helpers.

use sha1::{Digest, Sha1};

/// Encode an arbitrary identifier as an opaque, stable hex digest.
///
/// Used to derive pseudonymous user ids from foreign keys; the output
/// depends on nothing but `id`. SHA-1 hex, the same encoding remark stores
/// for hashed user ids.
#[must_use]
pub fn encode_id(id: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(id.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_id_is_stable() {
        assert_eq!(encode_id("abc"), encode_id("abc"));
        assert_eq!(
            encode_id("abc"),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn test_encode_id_distinguishes_inputs() {
        assert_ne!(encode_id("comment-1"), encode_id("comment-2"));
        assert_eq!(encode_id("").len(), 40);
    }

    #[test]
    fn test_encode_id_matches_remark_user_ids() {
        assert_eq!(
            encode_id("db1f2775-6e63-4de1-bb24-5e922c66cc32"),
            "debe55e5fe3788bf1f20a4f770419f9e9e2c7694"
        );
    }
}
