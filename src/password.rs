use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use thiserror::Error;

use crate::config::HashCost;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("invalid argon2 cost parameters: {0}")]
    InvalidCost(String),
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// PasswordService
///
/// One-way salted password hashing (Argon2id). New hashes use the configured cost;
/// verification honours whatever parameters are encoded in the stored hash.
#[derive(Clone, Debug)]
pub struct PasswordService {
    params: Params,
}

impl PasswordService {
    pub fn new(cost: HashCost) -> Result<Self, PasswordError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|e| PasswordError::InvalidCost(e.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hashes `plaintext` with a fresh random salt and returns the PHC string.
    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| PasswordError::Hash(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Checks `plaintext` against a stored hash.
    ///
    /// The stored value may come from anywhere, so a blob that does not parse as a
    /// PHC string is simply a mismatch. The digest comparison is constant-time.
    pub fn verify(&self, plaintext: &str, stored: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored) else {
            tracing::warn!("stored password hash is not a valid PHC string");
            return false;
        };
        self.argon2()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}
