//! Lease administration and tenant financial routes.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::lease;
use crate::state::AppState;

/// Routes mounted at `/leases`.
///
/// ```text
/// POST   /                          create_lease
/// GET    /{id}                      get_lease
/// POST   /{id}/rent-change          change_rent
/// GET    /{id}/rent-changes         list_rent_changes
/// POST   /{id}/terminate            terminate_lease
/// GET    /{id}/financial-summary    financial_summary
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(lease::create_lease))
        .route("/{id}", get(lease::get_lease))
        .route("/{id}/rent-change", post(lease::change_rent))
        .route("/{id}/rent-changes", get(lease::list_rent_changes))
        .route("/{id}/terminate", post(lease::terminate_lease))
        .route("/{id}/financial-summary", get(lease::financial_summary))
}
