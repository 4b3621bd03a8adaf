//! Handlers for landlord rent cycles.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use propdesk_core::access;
use propdesk_core::error::CoreError;
use propdesk_core::types::DbId;
use propdesk_db::models::rent_cycle::CreateRentCycle;
use propdesk_db::repositories::RentCycleRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/rent-cycles
///
/// Open a cycle with an explicit window. A landlord has at most one open
/// cycle.
pub async fn open_cycle(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateRentCycle>,
) -> AppResult<impl IntoResponse> {
    let cycle = RentCycleRepo::open(&state.pool, &input).await?;

    tracing::info!(
        user_id = admin.user_id,
        cycle_id = cycle.id,
        landlord_id = cycle.landlord_id,
        start = %cycle.start_date,
        end = %cycle.end_date,
        "Rent cycle opened"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: cycle })))
}

/// GET /api/v1/rent-cycles/{id}
pub async fn get_cycle(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let cycle = RentCycleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "RentCycle", id }))?;
    access::ensure_can_view_landlord(&auth.actor(), cycle.landlord_id)?;
    Ok(Json(DataResponse { data: cycle }))
}
