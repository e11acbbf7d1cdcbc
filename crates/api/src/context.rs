use chrono::{DateTime, Utc};

use txguard_auth::{Identity, Role, ScopePredicate, resolve};
use txguard_core::Username;

/// Authenticated caller for a request, derived from a validated token.
///
/// This is immutable and present for every protected route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    identity: Identity,
}

impl PrincipalContext {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    pub fn username(&self) -> &Username {
        &self.identity.subject
    }

    pub fn role(&self) -> Role {
        self.identity.role
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.identity.expires_at
    }

    /// Data scope for this caller, computed fresh on each call.
    pub fn scope(&self) -> ScopePredicate {
        resolve(&self.identity)
    }
}
