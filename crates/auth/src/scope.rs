//! Role → data-scope resolution.
//!
//! - No IO
//! - No panics
//! - Pure function of validated claims

use serde::Serialize;

use txguard_core::{AccountId, TenantId};

use crate::{AuthResult, Identity, Role, SessionClaims};

/// Which transaction rows a request may read.
///
/// Produced fresh per request. `ByTenant` only names the tenant; the record
/// layer materializes it by joining through the ownership index
/// (tenant → owned accounts → transactions).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScopePredicate {
    Unrestricted,
    ByOwner { customer: AccountId },
    ByTenant { client_id: TenantId },
}

impl core::fmt::Display for ScopePredicate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ScopePredicate::Unrestricted => f.write_str("unrestricted"),
            ScopePredicate::ByOwner { customer } => write!(f, "customer={customer}"),
            ScopePredicate::ByTenant { client_id } => write!(f, "client_id={client_id}"),
        }
    }
}

/// Compute the scope for an authenticated identity.
///
/// The subject is already quote-normalized by `Username`, so the filter value
/// never carries upstream quoting artifacts.
pub fn resolve(identity: &Identity) -> ScopePredicate {
    let scope = match identity.role {
        Role::Admin => ScopePredicate::Unrestricted,
        Role::User => ScopePredicate::ByOwner {
            customer: AccountId::from(&identity.subject),
        },
        Role::Client => ScopePredicate::ByTenant {
            client_id: TenantId::from(&identity.subject),
        },
    };

    tracing::debug!(subject = %identity.subject, role = %identity.role, %scope, "scope resolved");
    scope
}

/// Resolve directly from a raw claim set.
///
/// Fails closed with `UnauthorizedRole` for roles outside the closed set
/// (never an empty scope), and `Malformed` for an unusable subject.
pub fn resolve_claims(claims: &SessionClaims) -> AuthResult<ScopePredicate> {
    Identity::try_from(claims).map(|identity| resolve(&identity))
}
