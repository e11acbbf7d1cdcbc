//! Registered principals and login-time credential checks.

use std::collections::HashMap;

use txguard_core::Username;

use crate::password::{stored_params, work_factor};
use crate::{AuthError, AuthResult, CredentialHasher, Role};

/// Identity known to the engine.
///
/// The credential is a salted PHC hash; plaintext never reaches this type.
#[derive(Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: Username,
    pub role: Role,
    credential: String,
}

impl Principal {
    pub fn new(username: Username, role: Role, password_hash: impl Into<String>) -> Self {
        Self {
            username,
            role,
            credential: password_hash.into(),
        }
    }

    pub fn password_hash(&self) -> &str {
        &self.credential
    }
}

impl core::fmt::Debug for Principal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Principal")
            .field("username", &self.username)
            .field("role", &self.role)
            .field("credential", &"<redacted>")
            .finish()
    }
}

const DECOY_PLAINTEXT: &str = "txguard::decoy-credential";

/// Read-only set of principals, keyed by username.
///
/// Built once at startup and shared across requests; nothing on the request
/// path mutates it.
///
/// The decoy hash verified for unknown usernames carries the costliest Argon2
/// parameters of any registered hash. When stored hashes mix cost settings, an
/// unknown username therefore costs at least as much as the costliest known
/// one, but not exactly as much as a cheaper one.
#[derive(Debug)]
pub struct CredentialStore {
    principals: HashMap<Username, Principal>,
    hasher: CredentialHasher,
    decoy: String,
    decoy_cost: u64,
}

impl CredentialStore {
    pub fn new(hasher: CredentialHasher) -> AuthResult<Self> {
        let decoy = hasher.hash(DECOY_PLAINTEXT)?;
        let decoy_cost = work_factor(hasher.params());
        Ok(Self {
            principals: HashMap::new(),
            hasher,
            decoy,
            decoy_cost,
        })
    }

    /// Register a principal whose credential is already hashed.
    pub fn insert(&mut self, principal: Principal) -> AuthResult<()> {
        if self.principals.contains_key(&principal.username) {
            return Err(AuthError::DuplicatePrincipal(principal.username.into_inner()));
        }
        self.match_decoy_cost(principal.password_hash())?;
        self.principals.insert(principal.username.clone(), principal);
        Ok(())
    }

    /// Hash `plaintext` and register the resulting principal.
    pub fn provision(&mut self, username: Username, role: Role, plaintext: &str) -> AuthResult<()> {
        let hash = self.hasher.hash(plaintext)?;
        self.insert(Principal::new(username, role, hash))
    }

    fn match_decoy_cost(&mut self, phc: &str) -> AuthResult<()> {
        let Some(params) = stored_params(phc) else {
            return Ok(());
        };
        let cost = work_factor(&params);
        if cost > self.decoy_cost {
            self.decoy = CredentialHasher::from_params(params).hash(DECOY_PLAINTEXT)?;
            self.decoy_cost = cost;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.principals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.principals.is_empty()
    }

    /// Verify a login attempt.
    ///
    /// Succeeds iff a principal named exactly `username` exists, its stored role
    /// equals `claimed_role`, and `password` matches its hash. Every other
    /// combination yields the same `InvalidCredentials`, and a hash
    /// verification runs on every path.
    pub fn authenticate(
        &self,
        username: &str,
        password: &str,
        claimed_role: &str,
    ) -> AuthResult<Principal> {
        let candidate = self.principals.get(username);
        let claimed_role = claimed_role.parse::<Role>().ok();

        let stored_hash = candidate.map_or(self.decoy.as_str(), |p| p.password_hash());
        let password_ok = self.hasher.verify(password, stored_hash);

        match candidate {
            Some(principal) if password_ok && claimed_role == Some(principal.role) => {
                tracing::info!(username = %principal.username, role = %principal.role, "login accepted");
                Ok(principal.clone())
            }
            _ => {
                tracing::warn!(
                    username,
                    known_user = candidate.is_some(),
                    password_ok,
                    role_ok = candidate.is_some_and(|p| claimed_role == Some(p.role)),
                    "login rejected"
                );
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}
