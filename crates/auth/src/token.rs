//! Session token codec: HS256-signed, expiring bearer tokens.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::claims::validate_window;
use crate::{AuthError, AuthResult, Identity, Principal, SessionClaims};

/// Default session lifetime.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

/// Shortest signing secret accepted at startup.
pub const MIN_SECRET_LEN: usize = 32;

/// Process-wide HMAC secret, established once before any request is served.
#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> AuthResult<Self> {
        let bytes = bytes.into();
        if bytes.len() < MIN_SECRET_LEN {
            return Err(AuthError::WeakSecret { min: MIN_SECRET_LEN });
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl core::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}

/// A freshly issued token together with the claims it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub token: String,
    pub claims: SessionClaims,
}

/// Issues and validates session tokens with a fixed secret and TTL.
///
/// Immutable after construction; share it behind an `Arc`.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: TimeDelta,
}

impl TokenCodec {
    pub fn new(secret: &SigningSecret, ttl: TimeDelta) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // The validity window is checked against an injected clock instead.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Sign a token for `principal`, valid from `now` until `now + ttl`.
    pub fn issue(&self, principal: &Principal, now: DateTime<Utc>) -> AuthResult<SessionToken> {
        let claims = SessionClaims::for_principal(principal, now, self.ttl);
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))?;
        Ok(SessionToken { token, claims })
    }

    /// Verify the signature and decode the claim set, without checking expiry.
    ///
    /// The signature is checked (constant-time) before the claims are parsed.
    pub fn decode(&self, token: &str) -> AuthResult<SessionClaims> {
        // Extra separators after a well-formed header mean the signed
        // `header.claims` message or its signature was altered.
        if token.split('.').count() > 3 && has_valid_header(token) {
            return Err(AuthError::BadSignature);
        }

        jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => AuthError::BadSignature,
                _ => AuthError::Malformed,
            })
    }

    /// Fully validate a presented token at time `now`.
    ///
    /// The decoded claims are trusted as-is; the principal is not looked up again.
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> AuthResult<Identity> {
        let result = self
            .decode(token)
            .and_then(|claims| validate_window(&claims, now).map(|()| claims))
            .and_then(|claims| Identity::try_from(&claims));

        if let Err(e) = &result {
            tracing::warn!(reason = %e, "session token rejected");
        }
        result
    }
}

/// Whether the first segment of `token` decodes as a JOSE header.
fn has_valid_header(token: &str) -> bool {
    token.split_once('.').is_some_and(|(header, _)| {
        // `decode_header` reads the segment before the last two separators.
        jsonwebtoken::decode_header(&format!("{header}..")).is_ok()
    })
}

impl core::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &Algorithm::HS256)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

/// Extract the token from an `Authorization` header value of the form `Bearer <token>`.
///
/// Absence, a different scheme or an empty token is `MissingCredentials`; no
/// decoding is attempted.
pub fn parse_bearer(header: Option<&str>) -> AuthResult<&str> {
    let header = header.ok_or(AuthError::MissingCredentials)?;
    let (scheme, token) = header
        .trim()
        .split_once(' ')
        .ok_or(AuthError::MissingCredentials)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MissingCredentials);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    Ok(token)
}
