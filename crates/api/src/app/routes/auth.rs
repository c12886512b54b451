use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use chrono::{Duration, Utc};

use billfold_auth::JwtClaims;
use billfold_core::DomainError;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

/// Token lifetime for login-issued credentials.
const TOKEN_TTL_HOURS: i64 = 24;

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    let account = match services.directory.authenticate(&body.email, &body.password) {
        Ok(account) => account,
        Err(DomainError::InvalidCredentials) => {
            return errors::json_error(
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "invalid email or password",
            );
        }
        Err(e) => return errors::domain_error_to_response(e),
    };

    let now = Utc::now();
    let claims = JwtClaims {
        sub: account.id,
        role: account.role,
        issued_at: now,
        expires_at: now + Duration::hours(TOKEN_TTL_HOURS),
    };

    match services.jwt.issue(&claims) {
        Ok(token) => (
            StatusCode::OK,
            Json(serde_json::json!({ "token": token })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to issue token");
            errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "token_error",
                "failed to issue token",
            )
        }
    }
}
