//! Repository for the `landlord_expenses` ledger.
//!
//! Rows move `pending -> approved` here. The `approved -> deducted` move
//! belongs to [`PayoutRepo`](super::PayoutRepo) alone.

use sqlx::PgPool;
use propdesk_core::error::CoreError;
use propdesk_core::expense;
use propdesk_core::status::{ExpenseStatus, TicketStatus};
use propdesk_core::types::{Date, DbId, Money};

use crate::error::RepoResult;
use crate::models::expense::{CreateManualExpense, ExpenseListParams, LandlordExpense};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, amount, description, ticket_id, property_id, \
    landlord_id, status_id, expense_date, payout_id, created_at, updated_at";

/// Provides the landlord expense ledger.
pub struct ExpenseRepo;

impl ExpenseRepo {
    /// Record a ticketless expense entered by an administrator.
    pub async fn create_manual(
        pool: &PgPool,
        input: &CreateManualExpense,
        today: Date,
    ) -> RepoResult<LandlordExpense> {
        expense::validate_amount(input.amount)?;
        expense::validate_description(&input.description)?;

        let query = format!(
            "INSERT INTO landlord_expenses
                (amount, description, property_id, landlord_id, status_id, expense_date)
             SELECT $1, $2, p.id, p.landlord_id, $3, $4
             FROM properties p WHERE p.id = $5
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, LandlordExpense>(&query)
            .bind(input.amount)
            .bind(input.description.trim())
            .bind(ExpenseStatus::Pending.id())
            .bind(input.expense_date.unwrap_or(today))
            .bind(input.property_id)
            .fetch_optional(pool)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Property",
                id: input.property_id,
            })?;
        Ok(created)
    }

    /// Find an expense by its internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<LandlordExpense>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM landlord_expenses WHERE id = $1");
        sqlx::query_as::<_, LandlordExpense>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a landlord's ledger, optionally filtered by status and to rows
    /// not yet attached to a payout.
    pub async fn list(
        pool: &PgPool,
        params: &ExpenseListParams,
    ) -> Result<Vec<LandlordExpense>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM landlord_expenses
             WHERE landlord_id = $1
               AND ($2::SMALLINT IS NULL OR status_id = $2)
               AND (NOT $3 OR payout_id IS NULL)
             ORDER BY expense_date DESC, id DESC"
        );
        sqlx::query_as::<_, LandlordExpense>(&query)
            .bind(params.landlord_id)
            .bind(params.status_id)
            .bind(params.unsettled)
            .fetch_all(pool)
            .await
    }

    /// Amounts of every approved, unsettled expense for a landlord,
    /// regardless of cycle.
    pub async fn unsettled_approved_amounts(
        pool: &PgPool,
        landlord_id: DbId,
    ) -> Result<Vec<Money>, sqlx::Error> {
        sqlx::query_scalar::<_, Money>(
            "SELECT amount FROM landlord_expenses \
             WHERE landlord_id = $1 AND status_id = $2 AND payout_id IS NULL \
             ORDER BY id",
        )
        .bind(landlord_id)
        .bind(ExpenseStatus::Approved.id())
        .fetch_all(pool)
        .await
    }

    /// Approve a pending expense by hand.
    ///
    /// Rejected while the linked ticket awaits the tenant's confirmation.
    /// The ticket row is locked before the expense, matching the order used
    /// by the ticket transitions.
    pub async fn approve(pool: &PgPool, id: DbId) -> RepoResult<LandlordExpense> {
        let mut tx = pool.begin().await?;

        let ticket_id: Option<DbId> =
            sqlx::query_scalar("SELECT ticket_id FROM landlord_expenses WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "LandlordExpense",
                    id,
                })?;

        let ticket_status = match ticket_id {
            Some(ticket_id) => {
                let status_id: i16 =
                    sqlx::query_scalar("SELECT status_id FROM tickets WHERE id = $1 FOR UPDATE")
                        .bind(ticket_id)
                        .fetch_one(&mut *tx)
                        .await?;
                Some(TicketStatus::try_from(status_id)?)
            }
            None => None,
        };

        let query = format!("SELECT {COLUMNS} FROM landlord_expenses WHERE id = $1 FOR UPDATE");
        let current = sqlx::query_as::<_, LandlordExpense>(&query)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        expense::validate_approve(current.status()?, ticket_status)?;

        let query = format!(
            "UPDATE landlord_expenses SET status_id = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        let approved = sqlx::query_as::<_, LandlordExpense>(&query)
            .bind(id)
            .bind(ExpenseStatus::Approved.id())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(expense_id = id, ticket_id, amount = %approved.amount, "Expense approved");
        Ok(approved)
    }
}
