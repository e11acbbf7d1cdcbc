use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use txguard_core::Username;

use crate::{AuthError, AuthResult, Principal, Role};

/// Claim set carried inside a session token (wire shape).
///
/// `role` stays a plain string here: the signature covers exactly what was
/// issued, and the closed-role check happens when converting to [`Identity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Principal username.
    pub sub: String,

    /// Role frozen at issuance; never re-checked against the credential store.
    pub role: String,

    /// Issued-at (unix seconds).
    pub iat: i64,

    /// Expiration (unix seconds).
    pub exp: i64,
}

impl SessionClaims {
    pub fn for_principal(principal: &Principal, now: DateTime<Utc>, ttl: TimeDelta) -> Self {
        let issued_at = now.timestamp();
        Self {
            sub: principal.username.to_string(),
            role: principal.role.as_str().to_string(),
            iat: issued_at,
            exp: issued_at + ttl.num_seconds(),
        }
    }

    pub fn issued_at(&self) -> AuthResult<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0).ok_or(AuthError::Malformed)
    }

    pub fn expires_at(&self) -> AuthResult<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0).ok_or(AuthError::Malformed)
    }
}

/// Check the validity window of already-verified claims.
///
/// Valid while `issued_at <= now <= expires_at`. A window that is empty or
/// starts in the future cannot have come from this engine and is `Malformed`.
pub fn validate_window(claims: &SessionClaims, now: DateTime<Utc>) -> AuthResult<()> {
    let issued_at = claims.issued_at()?;
    let expires_at = claims.expires_at()?;

    if expires_at <= issued_at || now < issued_at {
        return Err(AuthError::Malformed);
    }
    if now > expires_at {
        return Err(AuthError::Expired);
    }
    Ok(())
}

/// Authenticated caller, decoded from a validated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: Username,
    pub role: Role,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl TryFrom<&SessionClaims> for Identity {
    type Error = AuthError;

    fn try_from(claims: &SessionClaims) -> Result<Self, Self::Error> {
        let role: Role = claims.role.parse()?;
        let subject = Username::parse(&claims.sub).map_err(|_| AuthError::Malformed)?;
        Ok(Self {
            subject,
            role,
            issued_at: claims.issued_at()?,
            expires_at: claims.expires_at()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn claims(role: &str, sub: &str) -> SessionClaims {
        SessionClaims {
            sub: sub.to_string(),
            role: role.to_string(),
            iat: 1_700_000_000,
            exp: 1_700_003_600,
        }
    }

    #[test]
    fn window_boundaries() {
        let c = claims("user", "C1");
        assert_eq!(validate_window(&c, at(c.iat)), Ok(()));
        assert_eq!(validate_window(&c, at(c.exp - 1)), Ok(()));
        assert_eq!(validate_window(&c, at(c.exp)), Ok(()));
        assert_eq!(validate_window(&c, at(c.exp + 1)), Err(AuthError::Expired));
    }

    #[test]
    fn inverted_or_future_window_is_malformed() {
        let mut c = claims("user", "C1");
        assert_eq!(validate_window(&c, at(c.iat - 1)), Err(AuthError::Malformed));

        c.exp = c.iat;
        assert_eq!(validate_window(&c, at(c.iat)), Err(AuthError::Malformed));
    }

    #[test]
    fn identity_rejects_roles_outside_the_closed_set() {
        assert_eq!(
            Identity::try_from(&claims("superuser", "root")),
            Err(AuthError::UnauthorizedRole("superuser".into()))
        );
    }

    #[test]
    fn identity_rejects_empty_subject() {
        assert_eq!(Identity::try_from(&claims("user", "''")), Err(AuthError::Malformed));
    }

    #[test]
    fn identity_carries_role_and_normalized_subject() {
        let identity = Identity::try_from(&claims("client", "'ACME1'")).unwrap();
        assert_eq!(identity.role, Role::Client);
        assert_eq!(identity.subject.as_str(), "ACME1");
        assert_eq!(identity.expires_at, at(1_700_003_600));
    }
}
