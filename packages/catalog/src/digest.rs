//! Digest Module
//!
//! Content fingerprints for source messages. A translation records the
//! fingerprint of the source it was made from, so a changed source text
//! makes the translation stale.

use sha1::{Digest, Sha1};

/// Prefix naming the hash algorithm in a fingerprint.
pub const FINGERPRINT_PREFIX: &str = "sha1-";

/// Fingerprint a message from its description and its "other" text.
///
/// Only these two participate: "other" is the one category every message
/// has, so it stands for the message content.
pub fn fingerprint(description: &str, other: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(description.as_bytes());
    hasher.update(other.as_bytes());
    format!("{}{}", FINGERPRINT_PREFIX, hex::encode(hasher.finalize()))
}

/// Compute the SHA1 of the given bytes as lowercase hex.
pub fn sha1(bytes: &[u8]) -> String {
    hex::encode(Sha1::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha1_known_answers() {
        assert_eq!(sha1(b""), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
        assert_eq!(sha1(b"abc"), "a9993e364706816aba3e25717850c26c9cd0d89d");
        assert_eq!(
            sha1(b"The quick brown fox jumps over the lazy dog"),
            "2fd4e1c67a2d28fced849ee1bb76e7391b93eb12"
        );
    }

    #[test]
    fn test_sha1_two_blocks() {
        assert_eq!(
            sha1(b"abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq"),
            "84983e441c3bd26ebaae4aa1f95129e5e54670f1"
        );
    }

    #[test]
    fn test_fingerprint_prefix_and_content() {
        let fp = fingerprint("", "abc");
        assert_eq!(fp, "sha1-a9993e364706816aba3e25717850c26c9cd0d89d");
    }

    #[test]
    fn test_fingerprint_changes_with_description() {
        assert_ne!(
            fingerprint("greeting", "Hello"),
            fingerprint("farewell", "Hello")
        );
        assert_eq!(
            fingerprint("greeting", "Hello"),
            fingerprint("greeting", "Hello")
        );
    }
}
