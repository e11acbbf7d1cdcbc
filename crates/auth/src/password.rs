//! Salted one-way password hashing (Argon2id, PHC string format).

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::{AuthError, AuthResult};

/// Hashes and verifies credentials.
///
/// Verification reads the cost parameters from the stored PHC string, so a
/// hasher configured with different parameters still verifies older hashes.
/// The final output comparison is constant-time.
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl CredentialHasher {
    /// Argon2id with explicit costs (`m_cost` in KiB).
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> AuthResult<Self> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        Ok(Self::from_params(params))
    }

    /// Argon2id with an existing parameter set.
    pub fn from_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    pub fn params(&self) -> &Params {
        self.argon2.params()
    }

    /// Produce a PHC string with a fresh random salt.
    pub fn hash(&self, plaintext: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let phc = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        Ok(phc.to_string())
    }

    /// `true` iff `plaintext` matches the stored PHC string.
    ///
    /// An unparseable stored hash never matches.
    pub fn verify(&self, plaintext: &str, phc: &str) -> bool {
        match PasswordHash::new(phc) {
            Ok(parsed) => self
                .argon2
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

/// Argon2 parameters recorded in a stored PHC string.
///
/// `None` when the string is not a parseable Argon2 hash.
pub fn stored_params(phc: &str) -> Option<Params> {
    let parsed = PasswordHash::new(phc).ok()?;
    Params::try_from(&parsed).ok()
}

/// Relative cost of one verification under `params` (memory × passes).
pub fn work_factor(params: &Params) -> u64 {
    u64::from(params.m_cost()) * u64::from(params.t_cost())
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl core::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CredentialHasher")
            .field("params", self.argon2.params())
            .finish()
    }
}
