use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::{Extension, Path, Query, rejection::FormRejection},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
};

use farmacia_core::ItemCode;

use crate::app::services::AppServices;
use crate::app::{dto, errors, views};

pub const SAVED_MESSAGE: &str = "Antibiótico guardado exitosamente";

pub fn router() -> Router {
    Router::new()
        .route("/antibiotico", get(list_items))
        .route("/antibiotico/nuevo", get(new_item_form).post(create_item))
        .route("/antibiotico/:codigo", get(get_item))
        .route("/antibiotico/:codigo/stock", post(adjust_stock))
        .route("/antibiotico/:codigo/receta", post(check_prescription))
        .route("/antibioticos/buscar", get(search_items))
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.inventory().list_all().await {
        Ok(items) => Html(views::item_list("Antibióticos", &items, "")).into_response(),
        Err(e) => errors::page_error(e),
    }
}

pub async fn search_items(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::SearchParams>,
) -> axum::response::Response {
    let fragment = params.nombre.unwrap_or_default();
    match services.inventory().find_by_name(&fragment).await {
        Ok(items) => Html(views::item_list("Antibióticos", &items, &fragment)).into_response(),
        Err(e) => errors::page_error(e),
    }
}

pub async fn new_item_form() -> Html<String> {
    Html(views::new_item_form())
}

/// Intake. Any failure is a 400 with the error text; duplicate codes included.
pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    form: Result<Form<dto::NewAntibioticForm>, FormRejection>,
) -> axum::response::Response {
    let record = match form {
        Ok(Form(form)) => form.into_record(),
        Err(rejection) => return save_failed(rejection.body_text()),
    };
    let record = match record {
        Ok(r) => r,
        Err(e) => return save_failed(e.to_string()),
    };

    match services.inventory().register(&record).await {
        Ok(()) => {
            tracing::info!(codigo = %record.code, "antibiotic registered");
            (StatusCode::OK, SAVED_MESSAGE).into_response()
        }
        Err(e) if !e.is_client_error() => {
            tracing::error!(codigo = %record.code, error = %e, "failed to store antibiotic");
            save_failed(e.to_string())
        }
        Err(e) => save_failed(e.to_string()),
    }
}

fn save_failed(message: String) -> axum::response::Response {
    tracing::warn!(%message, "intake rejected");
    (
        StatusCode::BAD_REQUEST,
        format!("Error al guardar: {message}"),
    )
        .into_response()
}

fn parse_code(raw: &str) -> Result<ItemCode, axum::response::Response> {
    raw.parse()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_code", "invalid codigo"))
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(codigo): Path<String>,
) -> axum::response::Response {
    let code = match parse_code(&codigo) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    match services.inventory().find_by_code(&code).await {
        Ok(item) => (StatusCode::OK, Json(item.describe())).into_response(),
        Err(e) => errors::query_error_to_response(e),
    }
}

pub async fn adjust_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Path(codigo): Path<String>,
    Json(body): Json<dto::AdjustStockRequest>,
) -> axum::response::Response {
    let code = match parse_code(&codigo) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    match services.inventory().adjust_stock(&code, body.delta).await {
        Ok(item) => {
            tracing::info!(codigo = %code, delta = body.delta, stock = item.stock(), "stock adjusted");
            (StatusCode::OK, Json(item.describe())).into_response()
        }
        Err(e) => errors::query_error_to_response(e),
    }
}

pub async fn check_prescription(
    Extension(services): Extension<Arc<AppServices>>,
    Path(codigo): Path<String>,
    Json(body): Json<dto::PrescriptionRequest>,
) -> axum::response::Response {
    let code = match parse_code(&codigo) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    match services.inventory().find_by_code(&code).await {
        Ok(item) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "codigo": code.to_string(),
                "requiere_receta": item.requires_prescription(),
                "receta_valida": item.validate_prescription(&body.receta),
            })),
        )
            .into_response(),
        Err(e) => errors::query_error_to_response(e),
    }
}
