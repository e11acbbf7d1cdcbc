use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AuthError;

/// Closed set of roles understood by the engine.
///
/// Anything outside this set is rejected where it enters (login, token decode)
/// instead of flowing into scope resolution as an arbitrary string.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Platform administrator: sees every transaction.
    Admin,
    /// Tenant aggregator: sees transactions of the accounts it owns.
    Client,
    /// Individual account holder: sees its own transactions.
    User,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Client, Role::User];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Client => "client",
            Role::User => "user",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    /// Exact, case-sensitive match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "client" => Ok(Role::Client),
            "user" => Ok(Role::User),
            other => Err(AuthError::UnauthorizedRole(other.to_string())),
        }
    }
}
