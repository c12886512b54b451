use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use billfold_attachments::AttachmentError;
use billfold_bills::BillError;
use billfold_core::DomainError;

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::Forbidden => json_error(StatusCode::FORBIDDEN, "forbidden", "forbidden"),
        DomainError::Unauthenticated => {
            json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "unauthenticated")
        }
        DomainError::InvalidCredentials => json_error(
            StatusCode::BAD_REQUEST,
            "invalid_credentials",
            "invalid credentials",
        ),
        DomainError::InvalidTransition(msg) => {
            json_error(StatusCode::CONFLICT, "invalid_transition", msg)
        }
    }
}

pub fn bill_error_to_response(err: BillError) -> axum::response::Response {
    match err {
        BillError::Domain(e) => domain_error_to_response(e),
        BillError::Attachment(AttachmentError::NotFound) => {
            json_error(StatusCode::NOT_FOUND, "not_found", "attachment not found")
        }
        BillError::Attachment(e) => {
            // Storage failures never leak detail to the caller.
            tracing::error!(error = %e, "attachment storage failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "attachment storage failure",
            )
        }
    }
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
