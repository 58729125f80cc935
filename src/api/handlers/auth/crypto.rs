//! Password hashing with Argon2id.

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};

/// Hash a plaintext password with a fresh random salt.
///
/// # Errors
/// Returns an error if hashing fails.
pub(crate) fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("failed to hash password: {e}"))?
        .to_string();
    Ok(hash)
}

/// Verify a plaintext password against a stored hash.
///
/// A wrong password is `Ok(false)`; only malformed hashes or internal
/// failures are errors.
pub(crate) fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| anyhow!("invalid password hash: {e}"))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow!("password verification failed: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("correct horse battery staple").expect("hash should succeed");
        assert!(verify_password("correct horse battery staple", &hash)
            .expect("verify should succeed"));
        assert!(!verify_password("wrong password", &hash).expect("verify should succeed"));
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("password").expect("hash should succeed");
        let second = hash_password("password").expect("hash should succeed");
        assert_ne!(first, second);
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("password", "not-a-phc-string").is_err());
    }
}
