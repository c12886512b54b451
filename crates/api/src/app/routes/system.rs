use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::ActorContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Resolve the caller's token to the live account record.
///
/// The token alone is not enough: the account may have been deleted or its
/// role changed since issuance, and the response reflects the directory.
pub async fn whoami(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
) -> axum::response::Response {
    let actor = ctx.actor();
    match services.directory.find_by_id(actor.account_id) {
        Ok(account) => Json(serde_json::json!({
            "account_id": account.id.to_string(),
            "name": account.name,
            "email": account.email,
            "role": account.role.as_str(),
        }))
        .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
