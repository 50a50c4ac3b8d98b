//! Credential hashing and verification.
//!
//! Stored credentials are Argon2id PHC strings. The verifier is a trait so
//! the identity store and every write path that persists a password share
//! one policy, and tests can lower the work factor.

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, Version,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Failed to hash password.
    #[error("failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password.
    #[error("failed to verify password: {0}")]
    VerifyError(String),

    /// Stored credential is not a PHC hash string.
    #[error("invalid password hash format")]
    InvalidHash,

    /// Cost parameters were rejected by Argon2.
    #[error("invalid hashing parameters: {0}")]
    InvalidParams(String),
}

/// Hash-and-compare credential policy.
pub trait CredentialVerifier: Send + Sync {
    /// Produces the value to store for a plaintext password.
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// Checks a plaintext password against a stored value.
    ///
    /// Returns `Ok(false)` on mismatch; errors are reserved for malformed
    /// stored values and internal failures.
    fn verify(&self, password: &str, stored: &str) -> Result<bool, PasswordError>;
}

/// Argon2id verifier.
#[derive(Debug, Clone)]
pub struct Argon2Verifier {
    params: Params,
}

impl Default for Argon2Verifier {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl Argon2Verifier {
    /// Creates a verifier with the library's recommended parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a verifier with explicit cost parameters.
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::InvalidParams` if Argon2 rejects the costs.
    pub fn with_cost(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, PasswordError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl CredentialVerifier for Argon2Verifier {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashError(e.to_string()))
    }

    fn verify(&self, password: &str, stored: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(stored).map_err(|_| PasswordError::InvalidHash)?;

        // Parameters embedded in the stored hash take precedence over ours.
        match self.argon2().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerifyError(e.to_string())),
        }
    }
}
