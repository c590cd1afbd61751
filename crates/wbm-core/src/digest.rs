//! Fixed-length, deterministic names for path components that are too long
//! to store on disk.
//!
//! The digest is the first 16 bytes of the SHA-256 of the component's UTF-8
//! bytes, lowercase hex (32 characters). The same component always maps to
//! the same name, so repeated mirror runs land on the same files.

use sha2::{Digest, Sha256};

/// Number of digest bytes kept (hex output is twice as long).
const NAME_DIGEST_BYTES: usize = 16;

/// Returns the 32-character hex name for `component`.
pub fn name_digest(component: &str) -> String {
    let digest = Sha256::digest(component.as_bytes());
    hex::encode(&digest[..NAME_DIGEST_BYTES])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_fixed_length_hex() {
        let d = name_digest(&"x".repeat(400));
        assert_eq!(d.len(), 32);
        assert!(d.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn digest_is_deterministic() {
        let long = "segment-".repeat(50);
        assert_eq!(name_digest(&long), name_digest(&long));
        assert_ne!(name_digest(&long), name_digest(&format!("{}x", long)));
    }

    #[test]
    fn digest_known_value() {
        // Leading half of sha256("").
        assert_eq!(name_digest(""), "e3b0c44298fc1c149afbf4c8996fb924");
    }
}
