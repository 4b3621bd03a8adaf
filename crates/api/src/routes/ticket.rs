//! Maintenance ticket routes.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::ticket;
use crate::state::AppState;

/// Routes mounted at `/tickets`.
///
/// ```text
/// POST   /                          create_ticket
/// GET    /{id}                      get_ticket
/// POST   /{id}/assign               assign_ticket
/// POST   /{id}/mark-fixed           mark_fixed
/// POST   /{id}/confirm              confirm_resolution
/// POST   /{id}/close                close_ticket
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(ticket::create_ticket))
        .route("/{id}", get(ticket::get_ticket))
        .route("/{id}/assign", post(ticket::assign_ticket))
        .route("/{id}/mark-fixed", post(ticket::mark_fixed))
        .route("/{id}/confirm", post(ticket::confirm_resolution))
        .route("/{id}/close", post(ticket::close_ticket))
}
