//! Salted one-way password digests.
//!
//! Plaintext passwords never leave this module: the directory stores only the
//! digest and re-derives it from resubmitted plaintext for comparison.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Digests passwords with a process-wide secret salt.
#[derive(Clone)]
pub struct PasswordHasher {
    salt: String,
}

impl PasswordHasher {
    pub fn new(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }

    /// Hex-encoded SHA-256 of `plaintext || salt`.
    pub fn digest(&self, plaintext: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(plaintext.as_bytes());
        hasher.update(self.salt.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Constant-time comparison of a resubmitted plaintext against a stored digest.
    pub fn verify(&self, plaintext: &str, stored_digest: &str) -> bool {
        let computed = self.digest(plaintext);
        computed.as_bytes().ct_eq(stored_digest.as_bytes()).into()
    }
}

impl core::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // Never expose the salt in logs.
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_input_same_digest() {
        let hasher = PasswordHasher::new("pepper");
        assert_eq!(hasher.digest("abc123"), hasher.digest("abc123"));
    }

    #[test]
    fn salt_changes_digest() {
        let a = PasswordHasher::new("salt-a");
        let b = PasswordHasher::new("salt-b");
        assert_ne!(a.digest("abc123"), b.digest("abc123"));
    }

    #[test]
    fn verify_accepts_correct_password() {
        let hasher = PasswordHasher::new("pepper");
        let stored = hasher.digest("abc123");
        assert!(hasher.verify("abc123", &stored));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hasher = PasswordHasher::new("pepper");
        let stored = hasher.digest("abc123");
        assert!(!hasher.verify("abc124", &stored));
    }

    #[test]
    fn digest_is_not_plaintext() {
        let hasher = PasswordHasher::new("pepper");
        assert_ne!(hasher.digest("abc123"), "abc123");
    }
}
