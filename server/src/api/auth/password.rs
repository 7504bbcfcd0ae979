//! Password hashing
//!
//! Credentials are stored as a SHA-512 hex digest of password + salt, with a
//! 32-character hex salt per user. Existing user records carry digests in
//! this format, so the scheme is fixed.

use rand::RngCore;
use sha2::{Digest, Sha512};

/// Generate a fresh 32-character hex salt
pub fn generate_salt() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    let mut salt = hex::encode(bytes);
    salt.truncate(32);
    salt
}

/// Hash a password with the given salt
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

/// Check a password attempt against the stored salt and digest
pub fn verify_password(password: &str, salt: &str, stored_digest: &str) -> bool {
    hash_password(password, salt) == stored_digest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salt_is_32_hex_chars() {
        let salt = generate_salt();
        assert_eq!(salt.len(), 32);
        assert!(salt.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_salts_are_unique() {
        assert_ne!(generate_salt(), generate_salt());
    }

    #[test]
    fn test_hash_is_sha512_hex() {
        let digest = hash_password("hunter2", "00000000000000000000000000000000");
        assert_eq!(digest.len(), 128);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_verify_round_trip() {
        let salt = generate_salt();
        let digest = hash_password("correct horse", &salt);
        assert!(verify_password("correct horse", &salt, &digest));
        assert!(!verify_password("wrong horse", &salt, &digest));
    }

    #[test]
    fn test_salt_changes_digest() {
        let a = hash_password("same", "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
        let b = hash_password("same", "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");
        assert_ne!(a, b);
    }
}
