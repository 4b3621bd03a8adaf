//! Landlord expense ledger routes.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::expense;
use crate::state::AppState;

/// Routes mounted at `/expenses`.
///
/// ```text
/// GET    /                          list_expenses
/// POST   /                          create_manual_expense
/// POST   /{id}/approve              approve_expense
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(expense::list_expenses).post(expense::create_manual_expense),
        )
        .route("/{id}/approve", post(expense::approve_expense))
}
