//! Handlers for lease administration and the tenant financial summary.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use propdesk_core::access;
use propdesk_core::error::CoreError;
use propdesk_core::tenant_financials;
use propdesk_core::types::DbId;
use propdesk_db::models::lease::{ChangeRentRequest, CreateLease, Lease, TerminateLeaseRequest};
use propdesk_db::repositories::{LeaseRepo, PaymentRepo, PropertyRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::today;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::AsOfParams;
use crate::response::DataResponse;
use crate::state::AppState;

async fn find_lease(state: &AppState, id: DbId) -> AppResult<Lease> {
    LeaseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "Lease", id }))
}

/// POST /api/v1/leases
///
/// Create an active lease. A property holds at most one active lease.
pub async fn create_lease(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateLease>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    PropertyRepo::find_by_id(&state.pool, input.property_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Property",
            id: input.property_id,
        })?;

    let lease = LeaseRepo::create(&state.pool, &input).await?;

    tracing::info!(
        user_id = admin.user_id,
        lease_id = lease.id,
        property_id = lease.property_id,
        tenant_id = lease.tenant_id,
        "Lease created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: lease })))
}

/// GET /api/v1/leases/{id}
pub async fn get_lease(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let lease = find_lease(&state, id).await?;
    access::ensure_can_view_lease(&auth.actor(), lease.tenant_id)?;
    Ok(Json(DataResponse { data: lease }))
}

/// POST /api/v1/leases/{id}/rent-change
///
/// Change the rent and record who changed it and why.
pub async fn change_rent(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ChangeRentRequest>,
) -> AppResult<impl IntoResponse> {
    let change = LeaseRepo::change_rent(&state.pool, id, &input, admin.user_id).await?;

    tracing::info!(
        user_id = admin.user_id,
        lease_id = id,
        previous = %change.previous_amount,
        new = %change.new_amount,
        "Lease rent changed"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: change })))
}

/// GET /api/v1/leases/{id}/rent-changes
pub async fn list_rent_changes(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let lease = find_lease(&state, id).await?;
    access::ensure_can_view_lease(&auth.actor(), lease.tenant_id)?;
    let changes = LeaseRepo::list_rent_changes(&state.pool, id).await?;
    Ok(Json(DataResponse { data: changes }))
}

/// POST /api/v1/leases/{id}/terminate
pub async fn terminate_lease(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<TerminateLeaseRequest>,
) -> AppResult<impl IntoResponse> {
    let lease = LeaseRepo::terminate(&state.pool, id, &input).await?;

    tracing::info!(
        user_id = admin.user_id,
        lease_id = id,
        termination_date = %input.termination_date,
        "Lease terminated"
    );

    Ok(Json(DataResponse { data: lease }))
}

/// GET /api/v1/leases/{id}/financial-summary?as_of=
///
/// What the tenant owes and has paid on this lease. Only successful
/// payments count.
pub async fn financial_summary(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<AsOfParams>,
) -> AppResult<impl IntoResponse> {
    let lease = find_lease(&state, id).await?;
    access::ensure_can_view_lease(&auth.actor(), lease.tenant_id)?;

    let paid = PaymentRepo::successful_amounts(&state.pool, id).await?;
    let summary =
        tenant_financials::summarize(&lease.terms()?, paid, params.as_of.unwrap_or_else(today));

    Ok(Json(DataResponse { data: summary }))
}
