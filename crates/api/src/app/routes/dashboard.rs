use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    response::{Html, IntoResponse},
};
use chrono::Local;

use crate::app::services::AppServices;
use crate::app::{dto, errors, views};

/// Low-stock and expiry alerts.
pub async fn dashboard(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::DashboardParams>,
) -> axum::response::Response {
    let defaults = services.dashboard_defaults();
    let threshold = params.umbral.unwrap_or(defaults.low_stock_threshold);
    let window = params.dias.unwrap_or(defaults.expiry_window_days);
    let today = Local::now().date_naive();
    let inventory = services.inventory();

    let low_stock = match inventory.list_low_stock(threshold).await {
        Ok(v) => v,
        Err(e) => return errors::page_error(e),
    };
    let expiring_soon = match inventory.list_expiring_soon_at(today, window).await {
        Ok(v) => v,
        Err(e) => return errors::page_error(e),
    };
    let expired = match inventory.list_expired_at(today).await {
        Ok(v) => v,
        Err(e) => return errors::page_error(e),
    };

    Html(views::dashboard(&views::DashboardView {
        today,
        low_stock_threshold: threshold,
        expiry_window_days: window,
        low_stock: &low_stock,
        expiring_soon: &expiring_soon,
        expired: &expired,
    }))
    .into_response()
}
