//! Handlers for the landlord expense ledger.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use propdesk_core::access;
use propdesk_core::types::DbId;
use propdesk_db::models::expense::{CreateManualExpense, ExpenseListParams};
use propdesk_db::repositories::ExpenseRepo;

use crate::error::AppResult;
use crate::handlers::today;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/expenses
///
/// Record a ticketless expense. It starts `pending` and needs approval.
pub async fn create_manual_expense(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateManualExpense>,
) -> AppResult<impl IntoResponse> {
    let expense = ExpenseRepo::create_manual(&state.pool, &input, today()).await?;

    tracing::info!(
        user_id = admin.user_id,
        expense_id = expense.id,
        landlord_id = expense.landlord_id,
        amount = %expense.amount,
        "Manual expense recorded"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: expense })))
}

/// GET /api/v1/expenses?landlord_id=&status_id=&unsettled=
pub async fn list_expenses(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ExpenseListParams>,
) -> AppResult<impl IntoResponse> {
    access::ensure_can_view_landlord(&auth.actor(), params.landlord_id)?;
    let expenses = ExpenseRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: expenses }))
}

/// POST /api/v1/expenses/{id}/approve
///
/// Approve a pending expense by hand. Rejected while the linked ticket is
/// still awaiting the tenant's confirmation.
pub async fn approve_expense(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let expense = ExpenseRepo::approve(&state.pool, id).await?;

    tracing::info!(
        user_id = admin.user_id,
        expense_id = id,
        ticket_id = ?expense.ticket_id,
        "Expense approved"
    );

    Ok(Json(DataResponse { data: expense }))
}
