//! Landlord-scoped read endpoints: properties, cycles, payouts and the
//! dashboard preview.
//!
//! Landlords see only their own data; operators see everyone's.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use propdesk_core::access;
use propdesk_core::types::DbId;
use propdesk_db::repositories::{PayoutRepo, PropertyRepo, RentCycleRepo};

use crate::error::AppResult;
use crate::handlers::today;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/landlords/{landlord_id}/properties
pub async fn list_properties(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(landlord_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    access::ensure_can_view_landlord(&auth.actor(), landlord_id)?;
    let properties = PropertyRepo::list_by_landlord(&state.pool, landlord_id).await?;
    Ok(Json(DataResponse { data: properties }))
}

/// GET /api/v1/landlords/{landlord_id}/rent-cycles/current
///
/// The open cycle, created for the current calendar month if none exists.
pub async fn current_cycle(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(landlord_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    access::ensure_can_view_landlord(&auth.actor(), landlord_id)?;
    let cycle = RentCycleRepo::get_or_create_current(&state.pool, landlord_id, today()).await?;
    Ok(Json(DataResponse { data: cycle }))
}

/// GET /api/v1/landlords/{landlord_id}/rent-cycles
pub async fn list_cycles(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(landlord_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    access::ensure_can_view_landlord(&auth.actor(), landlord_id)?;
    let cycles = RentCycleRepo::list_by_landlord(&state.pool, landlord_id).await?;
    Ok(Json(DataResponse { data: cycles }))
}

/// GET /api/v1/landlords/{landlord_id}/payout-preview
///
/// Informational only. Counts every approved unsettled expense, so it can
/// differ from what the next closure actually deducts.
pub async fn payout_preview(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(landlord_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    access::ensure_can_view_landlord(&auth.actor(), landlord_id)?;
    let preview = PayoutRepo::preview(&state.pool, landlord_id).await?;
    Ok(Json(DataResponse { data: preview }))
}

/// GET /api/v1/landlords/{landlord_id}/payouts
pub async fn list_payouts(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(landlord_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    access::ensure_can_view_landlord(&auth.actor(), landlord_id)?;
    let payouts = PayoutRepo::list_by_landlord(&state.pool, landlord_id).await?;
    Ok(Json(DataResponse { data: payouts }))
}
