use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication/authorization failure.
///
/// Every variant is terminal for the request that produced it. Callers must
/// map variants through [`AuthError::rejection`] rather than exposing the
/// variant itself: token failures deliberately collapse into one outward class.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown username, wrong password or wrong claimed role (merged).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No bearer token was presented, or the header was not `Bearer <token>`.
    #[error("missing credentials")]
    MissingCredentials,

    #[error("malformed token")]
    Malformed,

    #[error("token signature mismatch")]
    BadSignature,

    #[error("token has expired")]
    Expired,

    /// Role outside the closed `{admin, client, user}` set.
    #[error("unauthorized role '{0}'")]
    UnauthorizedRole(String),

    #[error("signing secret must be at least {min} bytes")]
    WeakSecret { min: usize },

    #[error("duplicate principal '{0}'")]
    DuplicatePrincipal(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Outward classification of an [`AuthError`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Caller did not establish who they are (401-equivalent).
    Unauthenticated,
    /// Caller presented something that cannot be trusted or is not allowed (403-equivalent).
    Forbidden,
    /// Engine-side failure unrelated to the caller's input.
    Internal,
}

impl AuthError {
    pub fn rejection(&self) -> Rejection {
        match self {
            AuthError::InvalidCredentials | AuthError::MissingCredentials => {
                Rejection::Unauthenticated
            }
            AuthError::Malformed
            | AuthError::BadSignature
            | AuthError::Expired
            | AuthError::UnauthorizedRole(_) => Rejection::Forbidden,
            AuthError::WeakSecret { .. }
            | AuthError::DuplicatePrincipal(_)
            | AuthError::Hashing(_)
            | AuthError::Signing(_) => Rejection::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_failures_share_one_rejection_class() {
        let classes: Vec<Rejection> = [
            AuthError::Malformed,
            AuthError::BadSignature,
            AuthError::Expired,
            AuthError::UnauthorizedRole("superuser".into()),
        ]
        .iter()
        .map(AuthError::rejection)
        .collect();

        assert!(classes.iter().all(|c| *c == Rejection::Forbidden));
    }

    #[test]
    fn missing_and_invalid_credentials_are_unauthenticated() {
        assert_eq!(AuthError::MissingCredentials.rejection(), Rejection::Unauthenticated);
        assert_eq!(AuthError::InvalidCredentials.rejection(), Rejection::Unauthenticated);
    }
}
