//! Argon2id password hashing for stored account credentials.
//!
//! Hashes are PHC strings (`$argon2id$v=19$...`) so parameters travel with
//! the hash. Verification is constant-time inside `argon2`.
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("failed to generate salt: {0}")]
    Salt(String),
    #[error("password hash error: {0}")]
    Hash(String),
}

pub fn hash(password: &str) -> Result<String, PasswordError> {
    // 16 bytes of entropy for the salt
    let mut bytes = [0u8; 16];
    getrandom::fill(&mut bytes).map_err(|e| PasswordError::Salt(e.to_string()))?;
    let salt = SaltString::encode_b64(&bytes).map_err(|e| PasswordError::Salt(e.to_string()))?;

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?;

    Ok(hash.to_string())
}

/// `Ok(false)` on mismatch; `Err` only when `stored` is not a PHC string.
pub fn verify(password: &str, stored: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored).map_err(|e| PasswordError::Hash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let stored = hash("admin123").unwrap();
        assert!(stored.starts_with("$argon2id$"));
        assert!(!stored.contains("admin123"));
        assert!(verify("admin123", &stored).unwrap());
        assert!(!verify("admin124", &stored).unwrap());
    }

    #[test]
    fn salts_differ_between_hashes() {
        assert_ne!(hash("same").unwrap(), hash("same").unwrap());
    }

    #[test]
    fn plaintext_in_storage_is_an_error_not_a_match() {
        assert!(verify("admin123", "admin123").is_err());
    }
}
