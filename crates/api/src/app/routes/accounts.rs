use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
};

use billfold_accounts::{AccountPatch, NewAccount};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

/// Public registration endpoint.
pub async fn create_account(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateAccountRequest>,
) -> axum::response::Response {
    let input = NewAccount {
        name: body.name,
        email: body.email,
        password: body.password,
        role: body.role,
    };

    match services.directory.create(input) {
        Ok(account) => {
            (StatusCode::CREATED, Json(dto::account_to_json(&account))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// List all accounts, or look one up by email via `?email=`.
pub async fn list_accounts(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::AccountQuery>,
) -> axum::response::Response {
    match query.email {
        Some(email) => match services.directory.find_by_email(&email) {
            Ok(account) => (StatusCode::OK, Json(dto::account_to_json(&account))).into_response(),
            Err(e) => errors::domain_error_to_response(e),
        },
        None => {
            let items = services
                .directory
                .list()
                .iter()
                .map(dto::account_to_json)
                .collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
    }
}

pub async fn update_account(
    Extension(services): Extension<Arc<AppServices>>,
    Path(email): Path<String>,
    Json(patch): Json<AccountPatch>,
) -> axum::response::Response {
    match services.directory.update(&email, patch) {
        Ok(account) => (StatusCode::OK, Json(dto::account_to_json(&account))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Idempotent: deleting an absent account still returns 200.
pub async fn delete_account(
    Extension(services): Extension<Arc<AppServices>>,
    Path(email): Path<String>,
) -> axum::response::Response {
    services.directory.delete(&email);
    (
        StatusCode::OK,
        Json(serde_json::json!({ "message": "account deleted" })),
    )
        .into_response()
}
