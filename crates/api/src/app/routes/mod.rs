use axum::{Router, routing::get};

pub mod antibiotics;
pub mod dashboard;
pub mod system;

/// Router for every inventory page and endpoint.
pub fn router() -> Router {
    Router::new()
        .route("/", get(dashboard::dashboard))
        .merge(antibiotics::router())
}
