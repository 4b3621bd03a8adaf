//! Handlers for the maintenance ticket lifecycle.
//!
//! Tenants open tickets and confirm repairs; staff assign artisans and mark
//! work as fixed. Every transition runs in the repository under a row lock.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use propdesk_core::access;
use propdesk_core::error::CoreError;
use propdesk_core::roles::Role;
use propdesk_core::types::DbId;
use propdesk_db::models::ticket::{
    AssignTicket, ConfirmResolutionRequest, CreateTicket, MarkFixedRequest,
};
use propdesk_db::repositories::{LeaseRepo, TicketRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::today;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireOperator;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/tickets
///
/// Open a ticket. Tenants must hold an active lease on the property.
pub async fn create_ticket(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTicket>,
) -> AppResult<impl IntoResponse> {
    let actor = auth.actor();
    let holds_active_lease = match actor.role {
        Role::Tenant => LeaseRepo::find_active_for_tenant(
            &state.pool,
            actor.user_id,
            input.property_id,
        )
        .await?
        .is_some(),
        _ => false,
    };
    access::ensure_can_create_ticket(&actor, holds_active_lease)?;

    let ticket = TicketRepo::create(&state.pool, &input, actor.user_id).await?;

    tracing::info!(
        user_id = actor.user_id,
        ticket_id = ticket.id,
        property_id = ticket.property_id,
        landlord_id = ticket.landlord_id,
        "Ticket opened"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: ticket })))
}

/// GET /api/v1/tickets/{id}
pub async fn get_ticket(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let ticket = TicketRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "Ticket", id }))?;
    access::ensure_can_view_ticket(&auth.actor(), ticket.requester_id, ticket.landlord_id)?;
    Ok(Json(DataResponse { data: ticket }))
}

/// POST /api/v1/tickets/{id}/assign
///
/// Assign an artisan, set who pays and optionally bind the ticket to a
/// rent cycle.
pub async fn assign_ticket(
    RequireOperator(operator): RequireOperator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AssignTicket>,
) -> AppResult<impl IntoResponse> {
    let ticket = TicketRepo::assign(&state.pool, id, &input).await?;

    tracing::info!(
        user_id = operator.user_id,
        ticket_id = id,
        payer_type_id = ticket.payer_type_id,
        rent_cycle_id = ?ticket.rent_cycle_id,
        "Ticket assigned"
    );

    Ok(Json(DataResponse { data: ticket }))
}

/// POST /api/v1/tickets/{id}/mark-fixed
///
/// Record the repair and ask the requester to confirm it. Landlord-paid
/// repairs write a pending expense in the same transaction.
pub async fn mark_fixed(
    RequireOperator(operator): RequireOperator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<MarkFixedRequest>,
) -> AppResult<impl IntoResponse> {
    let marked = TicketRepo::mark_fixed(&state.pool, id, &input, operator.user_id, today()).await?;
    Ok(Json(DataResponse { data: marked }))
}

/// POST /api/v1/tickets/{id}/confirm
///
/// The requester (or an admin) confirms or disputes the repair.
pub async fn confirm_resolution(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ConfirmResolutionRequest>,
) -> AppResult<impl IntoResponse> {
    let confirmed =
        TicketRepo::confirm_resolution(&state.pool, id, input.outcome, &auth.actor()).await?;
    Ok(Json(DataResponse { data: confirmed }))
}

/// POST /api/v1/tickets/{id}/close
pub async fn close_ticket(
    RequireOperator(operator): RequireOperator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let ticket = TicketRepo::close(&state.pool, id).await?;
    tracing::info!(user_id = operator.user_id, ticket_id = id, "Ticket closed");
    Ok(Json(DataResponse { data: ticket }))
}
