//! Handlers for payout generation and payout history.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use propdesk_core::access;
use propdesk_core::error::CoreError;
use propdesk_core::types::DbId;
use propdesk_db::repositories::PayoutRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::today;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/rent-cycles/{id}/payout
///
/// Settle and close a rent cycle. Runs at most once per cycle; a second
/// call fails with `ALREADY_CLOSED`.
pub async fn generate_payout(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(cycle_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let generated = PayoutRepo::generate_for_cycle(&state.pool, cycle_id, today()).await?;

    tracing::info!(
        user_id = admin.user_id,
        cycle_id,
        payout_id = generated.payout.id,
        reference = %generated.payout.reference,
        "Payout generated"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: generated })))
}

/// GET /api/v1/payouts/{id}
pub async fn get_payout(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let payout = PayoutRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "Payout", id }))?;
    access::ensure_can_view_landlord(&auth.actor(), payout.landlord_id)?;
    Ok(Json(DataResponse { data: payout }))
}
