use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use farmacia_core::DomainError;
use farmacia_infra::{QueryError, StoreError};

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
    }
}

pub fn query_error_to_response(err: QueryError) -> axum::response::Response {
    match err {
        QueryError::Domain(e) => domain_error_to_response(e),
        QueryError::Store(e) => store_error_to_response(e),
        e @ QueryError::CorruptRecord { .. } => {
            tracing::error!(error = %e, "stored record failed validation");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "corrupt_record", e.to_string())
        }
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::DuplicateCode(code) => json_error(
            StatusCode::CONFLICT,
            "duplicate_code",
            format!("codigo '{code}' already exists"),
        ),
        StoreError::Domain(e) => domain_error_to_response(e),
        other => {
            tracing::error!(error = %other, "store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", other.to_string())
        }
    }
}

/// Plain-text failure for HTML pages (no JSON client on the other end).
pub fn page_error(err: QueryError) -> axum::response::Response {
    match err {
        QueryError::Domain(DomainError::NotFound) => {
            (StatusCode::NOT_FOUND, "No encontrado").into_response()
        }
        QueryError::Domain(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
        e @ QueryError::CorruptRecord { .. } => {
            tracing::error!(error = %e, "stored record failed validation");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error interno: {e}"),
            )
                .into_response()
        }
        QueryError::Store(e) => {
            tracing::error!(error = %e, "store failure while rendering page");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error interno: {e}"),
            )
                .into_response()
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
