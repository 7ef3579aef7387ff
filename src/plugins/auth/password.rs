//! Argon2id password hashing.
//!
//! Credentials are stored as PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`)
//! with a random salt per account. Verification reads the parameters back out of
//! the stored string, so hashes made with different costs stay verifiable.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use super::errors::AuthError;

/// Argon2id with explicit cost parameters.
pub fn hasher(params: Params) -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
}

/// Hash a password. Returns a PHC-format string.
pub fn hash_password(argon2: &Argon2<'_>, password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a PHC-format hash string.
///
/// Returns `Err` only when the stored value is not a valid PHC string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AuthError::Hash(format!("Invalid password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> Argon2<'static> {
        hasher(Params::new(Params::MIN_M_COST, 1, 1, None).unwrap())
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password(&cheap(), "hunter22").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("hunter22"));
        assert!(verify_password("hunter22", &hash).unwrap());
        assert!(!verify_password("hunter23", &hash).unwrap());
    }

    #[test]
    fn test_same_password_gets_different_salts() {
        let a = hash_password(&cheap(), "secret").unwrap();
        let b = hash_password(&cheap(), "secret").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_plaintext_record_is_not_a_hash() {
        assert!(matches!(
            verify_password("secret", "secret"),
            Err(AuthError::Hash(_))
        ));
    }
}
