//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store + query service wiring
//! - `routes/`: HTTP routes + handlers
//! - `views.rs`: HTML rendering
//! - `dto.rs`: form/JSON request DTOs and coercion into domain records
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use farmacia_infra::AppConfig;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;
pub mod views;

/// Database path that selects the ephemeral in-memory store.
pub const IN_MEMORY_DATABASE: &str = ":memory:";

/// Build the full HTTP router backed by the store named in `config`.
///
/// `FARMACIA_DB=:memory:` keeps everything in process memory (dev/test).
pub async fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let services = if config.database_path.as_os_str() == IN_MEMORY_DATABASE {
        tracing::warn!("using in-memory inventory store; data is lost on exit");
        services::build_in_memory_services(config)
    } else {
        services::build_services(config).await?
    };
    Ok(router(Arc::new(services)))
}

/// Router over already-built services.
pub fn router(services: Arc<services::AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router().layer(Extension(services)))
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::trace_requests)))
}
