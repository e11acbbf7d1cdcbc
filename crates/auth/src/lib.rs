//! `txguard-auth`: authentication and authorization engine.
//!
//! Credential verification, session token issuance/validation and role → data
//! scope resolution. This crate is intentionally decoupled from HTTP and storage.

pub mod claims;
pub mod error;
pub mod password;
pub mod principal;
pub mod roles;
pub mod scope;
pub mod token;

pub use claims::{Identity, SessionClaims, validate_window};
pub use error::{AuthError, AuthResult, Rejection};
pub use password::CredentialHasher;
pub use principal::{CredentialStore, Principal};
pub use roles::Role;
pub use scope::{ScopePredicate, resolve, resolve_claims};
pub use token::{
    DEFAULT_TOKEN_TTL_SECS, MIN_SECRET_LEN, SessionToken, SigningSecret, TokenCodec, parse_bearer,
};
