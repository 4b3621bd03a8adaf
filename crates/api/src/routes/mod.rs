pub mod expense;
pub mod health;
pub mod landlord;
pub mod lease;
pub mod payout;
pub mod property;
pub mod rent_cycle;
pub mod ticket;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /properties                                      create (admin)
///
/// /leases                                          create (admin)
/// /leases/{id}                                     get
/// /leases/{id}/rent-change                         change rent (admin)
/// /leases/{id}/rent-changes                        rent change history
/// /leases/{id}/terminate                           terminate (admin)
/// /leases/{id}/financial-summary                   tenant balance
///
/// /tickets                                         open
/// /tickets/{id}                                    get
/// /tickets/{id}/assign                             assign artisan (staff)
/// /tickets/{id}/mark-fixed                         mark as fixed (staff)
/// /tickets/{id}/confirm                            confirm or dispute
/// /tickets/{id}/close                              close (staff)
///
/// /expenses                                        list, create manual (admin)
/// /expenses/{id}/approve                           approve (admin)
///
/// /rent-cycles                                     open (admin)
/// /rent-cycles/{id}                                get
/// /rent-cycles/{id}/payout                         generate payout (admin)
///
/// /payouts/{id}                                    get
///
/// /landlords/{id}/properties                       list
/// /landlords/{id}/rent-cycles                      list
/// /landlords/{id}/rent-cycles/current              get or create
/// /landlords/{id}/payouts                          list
/// /landlords/{id}/payout-preview                   dashboard preview
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/properties", property::router())
        .nest("/leases", lease::router())
        .nest("/tickets", ticket::router())
        .nest("/expenses", expense::router())
        // Cycle administration and payout generation.
        .nest("/rent-cycles", rent_cycle::router())
        .nest("/payouts", payout::router())
        // Landlord-scoped reads.
        .nest("/landlords", landlord::router())
}
