use axum::routing::get;
use axum::Router;

use crate::handlers::payout;
use crate::state::AppState;

/// Routes mounted at `/payouts`.
///
/// ```text
/// GET    /{id}                      get_payout
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", get(payout::get_payout))
}
