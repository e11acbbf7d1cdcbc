use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use txguard_auth::{AuthError, Rejection};
use txguard_infra::StoreError;

/// Map an authentication/authorization failure to its outward response.
///
/// The body never says which check failed: all login failures read the same,
/// and all token failures read the same.
pub fn auth_error_to_response(err: &AuthError) -> axum::response::Response {
    match err.rejection() {
        Rejection::Unauthenticated => match err {
            AuthError::MissingCredentials => {
                json_error(StatusCode::UNAUTHORIZED, "missing_credentials", "bearer token required")
            }
            _ => json_error(StatusCode::UNAUTHORIZED, "invalid_credentials", "invalid credentials"),
        },
        Rejection::Forbidden => json_error(StatusCode::FORBIDDEN, "forbidden", "forbidden"),
        Rejection::Internal => {
            tracing::error!(error = %err, "authentication backend failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal error")
        }
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    tracing::error!(error = %err, "transaction query failed");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", "failed to read transactions")
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
