use std::sync::Arc;

use axum::{Extension, Json, response::IntoResponse};

use crate::app::errors::store_error_to_response;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

/// First page of transactions visible to the caller, ascending by id.
pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    let scope = principal.scope();

    match services.transactions.query(&scope, services.page_limit).await {
        Ok(rows) => {
            tracing::debug!(
                username = %principal.username(),
                %scope,
                count = rows.len(),
                "transactions served"
            );
            Json(rows).into_response()
        }
        Err(e) => store_error_to_response(e),
    }
}
