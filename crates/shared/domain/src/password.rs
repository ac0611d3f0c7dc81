//! Password value object.
//!
//! Only the Argon2 PHC string is ever held; the plaintext goes straight into
//! the hasher and is not stored anywhere.

use argon2::{
    password_hash::{
        rand_core::OsRng, Error as PasswordHashError, PasswordHash, PasswordHasher,
        PasswordVerifier, SaltString,
    },
    Argon2,
};

use crate::constants::MAX_PASSWORD_HASH_LENGTH;
use crate::error::{DomainError, DomainResult};

/// Password value object that handles hashing and verification.
#[derive(Clone, PartialEq, Eq)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Create a new password by hashing the plain text.
    ///
    /// # Errors
    /// Returns a password error if the hasher fails.
    pub fn new(plain_text: &str) -> DomainResult<Self> {
        let hash = Self::hash(plain_text)?;
        Ok(Self { hash })
    }

    /// Wrap an existing hash loaded from storage.
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Verify a plain text password against this hash.
    ///
    /// The comparison itself is done by `argon2`, which compares digests in
    /// constant time.
    ///
    /// # Errors
    /// Returns a password error if the stored hash is not a valid PHC string
    /// or is not an Argon2 hash this library can check. Only a mismatching
    /// password yields `Ok(false)`.
    pub fn verify(&self, plain_text: &str) -> DomainResult<bool> {
        let parsed = PasswordHash::new(&self.hash)
            .map_err(|e| DomainError::password(format!("Invalid hash format: {}", e)))?;
        match Self::argon2().verify_password(plain_text.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(e) => Err(DomainError::password(format!("Password verification failed: {}", e))),
        }
    }

    fn hash(plain_text: &str) -> DomainResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| DomainError::password(format!("Password hash failed: {}", e)))?
            .to_string();

        if hash.len() > MAX_PASSWORD_HASH_LENGTH {
            return Err(DomainError::internal(format!(
                "Password hash exceeds {} characters",
                MAX_PASSWORD_HASH_LENGTH
            )));
        }
        Ok(hash)
    }

    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
    }
}
