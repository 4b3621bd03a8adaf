//! Rent cycle routes, including payout generation.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{payout, rent_cycle};
use crate::state::AppState;

/// Routes mounted at `/rent-cycles`.
///
/// ```text
/// POST   /                          open_cycle
/// GET    /{id}                      get_cycle
/// POST   /{id}/payout               generate_payout
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(rent_cycle::open_cycle))
        .route("/{id}", get(rent_cycle::get_cycle))
        .route("/{id}/payout", post(payout::generate_payout))
}
