use std::sync::Arc;

use axum::{Extension, Json, extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse};
use chrono::Utc;

use txguard_auth::AuthError;

use crate::app::dto::{LoginRequest, LoginResponse};
use crate::app::errors::{auth_error_to_response, json_error};
use crate::app::services::AppServices;

/// Exchange username, password and claimed role for a session token.
///
/// A body that is not a complete login request fails exactly like a wrong
/// password.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::warn!(reason = %rejection.body_text(), "login rejected: unusable request body");
            return auth_error_to_response(&AuthError::InvalidCredentials);
        }
    };
    let credentials = services.credentials.clone();
    let LoginRequest {
        username,
        password,
        role,
    } = body;

    // Argon2 verification blocks; run it off the async workers.
    let verified = tokio::task::spawn_blocking(move || {
        credentials.authenticate(&username, &password, &role)
    })
    .await;

    let principal = match verified {
        Ok(Ok(principal)) => principal,
        Ok(Err(e)) => return auth_error_to_response(&e),
        Err(join_err) => {
            tracing::error!(error = %join_err, "credential verification task failed");
            return json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal error",
            );
        }
    };

    match services.codec.issue(&principal, Utc::now()) {
        Ok(session) => {
            let expires_at = match session.claims.expires_at() {
                Ok(at) => at,
                Err(e) => return auth_error_to_response(&e),
            };
            (
                StatusCode::OK,
                Json(LoginResponse {
                    token: session.token,
                    expires_at,
                }),
            )
                .into_response()
        }
        Err(e) => auth_error_to_response(&e),
    }
}
