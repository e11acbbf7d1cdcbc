use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use txguard_auth::{AuthResult, TokenCodec, parse_bearer};

use crate::app::errors::auth_error_to_response;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub codec: Arc<TokenCodec>,
}

/// Require a valid bearer token and attach the caller's [`PrincipalContext`].
///
/// No header → 401; anything wrong with the token itself → 403.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let identity = extract_bearer(req.headers())
        .and_then(|token| state.codec.validate(token, Utc::now()))
        .map_err(|e| auth_error_to_response(&e))?;

    req.extensions_mut().insert(PrincipalContext::new(identity));

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> AuthResult<&str> {
    // A header that is not valid visible ASCII cannot carry a token.
    let header = headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok());
    parse_bearer(header)
}
