use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Multipart, Path},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};

use billfold_bills::{BillDraft, BillPatch, ProofUpload};
use billfold_core::BillId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::ActorContext;

pub fn router() -> Router {
    Router::new()
        .route(
            "/",
            post(create_bill).get(list_bills).delete(delete_many_bills),
        )
        .route("/:id", get(get_bill).put(update_bill).delete(delete_bill))
        .route("/:id/proof", get(get_bill_proof))
        .route("/:id/status", post(change_bill_status))
}

/// Parsed `metadata` (JSON) + optional `proof` (binary) multipart parts.
struct BillParts {
    metadata: Option<String>,
    proof: Option<ProofUpload>,
}

async fn read_bill_parts(mut multipart: Multipart) -> Result<BillParts, axum::response::Response> {
    let mut parts = BillParts {
        metadata: None,
        proof: None,
    };

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(_) => {
                return Err(errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "invalid_multipart",
                    "malformed multipart body",
                ));
            }
        };

        match field.name() {
            Some("metadata") => match field.text().await {
                Ok(text) => parts.metadata = Some(text),
                Err(_) => {
                    return Err(errors::json_error(
                        StatusCode::BAD_REQUEST,
                        "invalid_multipart",
                        "metadata part must be text",
                    ));
                }
            },
            Some("proof") => {
                let original_name = field.file_name().unwrap_or("proof").to_string();
                match field.bytes().await {
                    Ok(bytes) => {
                        parts.proof = Some(ProofUpload {
                            bytes: bytes.to_vec(),
                            original_name,
                        });
                    }
                    Err(_) => {
                        return Err(errors::json_error(
                            StatusCode::BAD_REQUEST,
                            "invalid_multipart",
                            "failed to read proof part",
                        ));
                    }
                }
            }
            // Unknown parts are ignored, matching lenient multipart handling.
            _ => {}
        }
    }

    Ok(parts)
}

fn parse_bill_id(id: &str) -> Result<BillId, axum::response::Response> {
    id.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid bill id")
    })
}

pub async fn create_bill(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    multipart: Multipart,
) -> axum::response::Response {
    let parts = match read_bill_parts(multipart).await {
        Ok(parts) => parts,
        Err(resp) => return resp,
    };

    let Some(metadata) = parts.metadata else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "missing_metadata",
            "metadata part is required",
        );
    };
    let draft: BillDraft = match serde_json::from_str(&metadata) {
        Ok(draft) => draft,
        Err(e) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_metadata",
                format!("metadata is not valid bill JSON: {e}"),
            );
        }
    };

    match services.bills.create(ctx.actor(), draft, parts.proof) {
        Ok(bill) => (StatusCode::CREATED, Json(dto::bill_to_json(&bill))).into_response(),
        Err(e) => errors::bill_error_to_response(e),
    }
}

pub async fn list_bills(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
) -> axum::response::Response {
    let items = services
        .bills
        .list(ctx.actor())
        .iter()
        .map(dto::bill_to_json)
        .collect::<Vec<_>>();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn get_bill(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_bill_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.bills.get(ctx.actor(), id) {
        Ok(bill) => (StatusCode::OK, Json(dto::bill_to_json(&bill))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_bill(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> axum::response::Response {
    let id = match parse_bill_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let parts = match read_bill_parts(multipart).await {
        Ok(parts) => parts,
        Err(resp) => return resp,
    };

    let patch: BillPatch = match parts.metadata {
        Some(metadata) => match serde_json::from_str(&metadata) {
            Ok(patch) => patch,
            Err(e) => {
                return errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "invalid_metadata",
                    format!("metadata is not valid bill JSON: {e}"),
                );
            }
        },
        None => BillPatch::default(),
    };

    match services.bills.update(ctx.actor(), id, patch, parts.proof) {
        Ok(bill) => (StatusCode::OK, Json(dto::bill_to_json(&bill))).into_response(),
        Err(e) => errors::bill_error_to_response(e),
    }
}

pub async fn change_bill_status(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::ChangeStatusRequest>,
) -> axum::response::Response {
    let id = match parse_bill_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.bills.change_status(ctx.actor(), id, body.status) {
        Ok(bill) => (StatusCode::OK, Json(dto::bill_to_json(&bill))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_bill(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_bill_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.bills.delete(ctx.actor(), id) {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "bill deleted" })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_many_bills(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Json(body): Json<dto::DeleteManyRequest>,
) -> axum::response::Response {
    let mut ids = Vec::with_capacity(body.ids.len());
    for raw in &body.ids {
        match parse_bill_id(raw) {
            Ok(id) => ids.push(id),
            Err(resp) => return resp,
        }
    }

    match services.bills.delete_many(ctx.actor(), &ids) {
        Ok(deleted) => (
            StatusCode::OK,
            Json(serde_json::json!({ "deleted": deleted })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_bill_proof(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_bill_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.bills.proof(ctx.actor(), id) {
        Ok((locator, bytes)) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, content_type_for(locator.as_str()))],
            bytes,
        )
            .into_response(),
        Err(e) => errors::bill_error_to_response(e),
    }
}

/// Best-effort content type from the locator's preserved extension.
fn content_type_for(locator: &str) -> &'static str {
    match locator.rsplit_once('.').map(|(_, ext)| ext) {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}
