//! Property directory routes.

use axum::routing::post;
use axum::Router;

use crate::handlers::property;
use crate::state::AppState;

/// Routes mounted at `/properties`.
///
/// ```text
/// POST   /                          create_property
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(property::create_property))
}
