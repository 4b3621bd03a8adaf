//! Landlord-scoped read routes.

use axum::routing::get;
use axum::Router;

use crate::handlers::landlord;
use crate::state::AppState;

/// Routes mounted at `/landlords`.
///
/// ```text
/// GET    /{landlord_id}/properties            list_properties
/// GET    /{landlord_id}/rent-cycles           list_cycles
/// GET    /{landlord_id}/rent-cycles/current   current_cycle
/// GET    /{landlord_id}/payouts               list_payouts
/// GET    /{landlord_id}/payout-preview        payout_preview
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{landlord_id}/properties", get(landlord::list_properties))
        .route("/{landlord_id}/rent-cycles", get(landlord::list_cycles))
        .route(
            "/{landlord_id}/rent-cycles/current",
            get(landlord::current_cycle),
        )
        .route("/{landlord_id}/payouts", get(landlord::list_payouts))
        .route("/{landlord_id}/payout-preview", get(landlord::payout_preview))
}
