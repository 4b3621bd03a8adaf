//! Repository for the `tickets` table and the ticket-driven expense writes.

use sqlx::PgPool;
use propdesk_core::access;
use propdesk_core::error::CoreError;
use propdesk_core::rent_cycle;
use propdesk_core::roles::Actor;
use propdesk_core::status::{
    ConfirmationStatus, ExpenseStatus, PayerType, TicketPriority, TicketStatus,
};
use propdesk_core::ticket::{self, ConfirmationOutcome};
use propdesk_core::types::{Date, DbId};

use crate::error::RepoResult;
use crate::models::expense::LandlordExpense;
use crate::models::rent_cycle::RentCycle;
use crate::models::ticket::{
    AssignTicket, CreateTicket, MarkFixedRequest, MarkedFixed, ResolutionConfirmed, Ticket,
};
use crate::repositories::expense_repo::COLUMNS as EXPENSE_COLUMNS;
use crate::repositories::rent_cycle_repo::COLUMNS as CYCLE_COLUMNS;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, subject, category, description, requester_id, property_id, \
    landlord_id, status_id, priority_id, payer_type_id, artisan_name, artisan_phone, \
    cost_actual, resolution_note, resolved_by, resolved_at, confirmation_status_id, \
    rent_cycle_id, created_at, updated_at";

/// Provides the maintenance ticket lifecycle.
///
/// Every transition locks the ticket row (`FOR UPDATE`) and applies the
/// change in a single transaction together with any ledger write.
pub struct TicketRepo;

impl TicketRepo {
    /// Open a ticket on a property. The landlord is copied from the property.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTicket,
        requester_id: DbId,
    ) -> RepoResult<Ticket> {
        ticket::validate_subject(&input.subject)?;
        if input.category.trim().is_empty() {
            return Err(CoreError::Validation("Ticket category must not be empty".into()).into());
        }
        let priority = input
            .priority_id
            .map(TicketPriority::try_from)
            .transpose()?
            .unwrap_or(TicketPriority::Medium);
        let payer = input
            .payer_type_id
            .map(PayerType::try_from)
            .transpose()?
            .unwrap_or(PayerType::Landlord);

        let mut tx = pool.begin().await?;

        let landlord_id: DbId =
            sqlx::query_scalar("SELECT landlord_id FROM properties WHERE id = $1")
                .bind(input.property_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "Property",
                    id: input.property_id,
                })?;

        if let Some(cycle_id) = input.rent_cycle_id {
            Self::check_cycle_binding(&mut tx, cycle_id, landlord_id).await?;
        }

        let query = format!(
            "INSERT INTO tickets
                (subject, category, description, requester_id, property_id, landlord_id,
                 status_id, priority_id, payer_type_id, confirmation_status_id, rent_cycle_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, Ticket>(&query)
            .bind(input.subject.trim())
            .bind(input.category.trim())
            .bind(&input.description)
            .bind(requester_id)
            .bind(input.property_id)
            .bind(landlord_id)
            .bind(TicketStatus::Open.id())
            .bind(priority.id())
            .bind(payer.id())
            .bind(ConfirmationStatus::NotRequested.id())
            .bind(input.rent_cycle_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }

    /// Find a ticket by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tickets WHERE id = $1");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Assign an artisan and a payer, moving the ticket into progress.
    ///
    /// The rent cycle binding is set here, never inferred later from dates.
    pub async fn assign(pool: &PgPool, id: DbId, input: &AssignTicket) -> RepoResult<Ticket> {
        if input.artisan_name.trim().is_empty() {
            return Err(CoreError::Validation("Artisan name must not be empty".into()).into());
        }
        let payer = PayerType::try_from(input.payer_type_id)?;

        let mut tx = pool.begin().await?;

        let current = Self::lock(&mut tx, id).await?;
        let next = ticket::validate_assign(current.status()?)?;

        // The payer decides who owns the ticket's expense, so it is fixed
        // while that expense is still in the ledger.
        if payer != current.payer_type()? {
            if let Some(expense_id) = Self::unsettled_expense_id(&mut tx, id).await? {
                return Err(CoreError::InvalidState(format!(
                    "Payer cannot change while expense {expense_id} for this ticket is unsettled"
                ))
                .into());
            }
        }

        if let Some(cycle_id) = input.rent_cycle_id {
            Self::check_cycle_binding(&mut tx, cycle_id, current.landlord_id).await?;
        }

        let query = format!(
            "UPDATE tickets SET
                status_id = $2,
                artisan_name = $3,
                artisan_phone = $4,
                payer_type_id = $5,
                rent_cycle_id = COALESCE($6, rent_cycle_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(next.id())
            .bind(input.artisan_name.trim())
            .bind(&input.artisan_phone)
            .bind(payer.id())
            .bind(input.rent_cycle_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Record the repair as done and hand it to the tenant for confirmation.
    ///
    /// When the landlord pays, exactly one `pending` expense is written in
    /// the same transaction. A ticket re-fixed after a dispute re-prices its
    /// pending expense rather than adding a second one.
    pub async fn mark_fixed(
        pool: &PgPool,
        id: DbId,
        input: &MarkFixedRequest,
        resolved_by: DbId,
        today: Date,
    ) -> RepoResult<MarkedFixed> {
        ticket::validate_resolution_note(&input.resolution_note)?;

        let mut tx = pool.begin().await?;

        let current = Self::lock(&mut tx, id).await?;
        ticket::validate_mark_fixed(current.status()?)?;
        let payer = current.payer_type()?;
        ticket::validate_cost(payer, input.cost_actual)?;

        // An expense written against a closed cycle could never be settled.
        if ticket::creates_expense(payer) {
            if let Some(cycle_id) = current.rent_cycle_id {
                Self::check_cycle_binding(&mut tx, cycle_id, current.landlord_id).await?;
            }
        }

        let query = format!(
            "UPDATE tickets SET
                status_id = $2,
                confirmation_status_id = $3,
                cost_actual = $4,
                resolution_note = $5,
                resolved_by = $6,
                resolved_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(TicketStatus::AwaitingConfirmation.id())
            .bind(ConfirmationStatus::Pending.id())
            .bind(input.cost_actual)
            .bind(&input.resolution_note)
            .bind(resolved_by)
            .fetch_one(&mut *tx)
            .await?;

        let expense = if ticket::creates_expense(payer) {
            Some(Self::upsert_pending_expense(&mut tx, &updated, today).await?)
        } else {
            None
        };

        tx.commit().await?;

        tracing::info!(
            ticket_id = id,
            resolved_by,
            payer = %payer,
            cost = %input.cost_actual,
            expense_id = expense.as_ref().map(|e| e.id),
            "Ticket marked as fixed",
        );

        Ok(MarkedFixed {
            ticket: updated,
            expense,
        })
    }

    /// Apply the tenant's confirmation outcome.
    ///
    /// `confirmed` resolves the ticket and, when the landlord pays, approves
    /// its pending expense; `disputed` sends it back to work and leaves the
    /// expense pending.
    pub async fn confirm_resolution(
        pool: &PgPool,
        id: DbId,
        outcome: ConfirmationOutcome,
        actor: &Actor,
    ) -> RepoResult<ResolutionConfirmed> {
        let mut tx = pool.begin().await?;

        let current = Self::lock(&mut tx, id).await?;
        access::ensure_can_confirm(actor, current.requester_id)?;
        ticket::validate_confirm(current.status()?)?;

        let effect = ticket::confirmation_effect(outcome);

        let query = format!(
            "UPDATE tickets SET status_id = $2, confirmation_status_id = $3 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(effect.status.id())
            .bind(effect.confirmation.id())
            .fetch_one(&mut *tx)
            .await?;

        let approved_expense = if effect.approve_expense
            && ticket::creates_expense(current.payer_type()?)
        {
            let query = format!(
                "UPDATE landlord_expenses SET status_id = $2 \
                 WHERE ticket_id = $1 AND status_id = $3 AND payout_id IS NULL \
                 RETURNING {EXPENSE_COLUMNS}"
            );
            sqlx::query_as::<_, LandlordExpense>(&query)
                .bind(id)
                .bind(ExpenseStatus::Approved.id())
                .bind(ExpenseStatus::Pending.id())
                .fetch_optional(&mut *tx)
                .await?
        } else {
            None
        };

        tx.commit().await?;

        tracing::info!(
            ticket_id = id,
            user_id = actor.user_id,
            outcome = ?outcome,
            approved_expense_id = approved_expense.as_ref().map(|e| e.id),
            "Ticket resolution confirmed",
        );

        Ok(ResolutionConfirmed {
            ticket: updated,
            approved_expense,
        })
    }

    /// Close a resolved ticket.
    pub async fn close(pool: &PgPool, id: DbId) -> RepoResult<Ticket> {
        let mut tx = pool.begin().await?;

        let current = Self::lock(&mut tx, id).await?;
        ticket::validate_close(current.status()?)?;

        let query = format!("UPDATE tickets SET status_id = $2 WHERE id = $1 RETURNING {COLUMNS}");
        let updated = sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(TicketStatus::Closed.id())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    pub(crate) async fn lock(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
    ) -> RepoResult<Ticket> {
        let query = format!("SELECT {COLUMNS} FROM tickets WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| CoreError::NotFound { entity: "Ticket", id }.into())
    }

    async fn unsettled_expense_id(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        ticket_id: DbId,
    ) -> RepoResult<Option<DbId>> {
        let id = sqlx::query_scalar(
            "SELECT id FROM landlord_expenses WHERE ticket_id = $1 AND payout_id IS NULL",
        )
        .bind(ticket_id)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(id)
    }

    /// A ticket may only be bound to an open cycle of its own landlord.
    async fn check_cycle_binding(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        cycle_id: DbId,
        landlord_id: DbId,
    ) -> RepoResult<()> {
        let query = format!("SELECT {CYCLE_COLUMNS} FROM rent_cycles WHERE id = $1");
        let cycle = sqlx::query_as::<_, RentCycle>(&query)
            .bind(cycle_id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "RentCycle",
                id: cycle_id,
            })?;

        if cycle.landlord_id != landlord_id {
            return Err(CoreError::Validation(format!(
                "Rent cycle {cycle_id} belongs to a different landlord"
            ))
            .into());
        }
        rent_cycle::ensure_open(cycle.id, cycle.status()?)?;
        Ok(())
    }

    /// Insert the ticket's pending expense, or re-price it if one is still
    /// pending from an earlier, disputed fix.
    async fn upsert_pending_expense(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        fixed: &Ticket,
        today: Date,
    ) -> RepoResult<LandlordExpense> {
        let amount = fixed
            .cost_actual
            .ok_or_else(|| CoreError::Internal("Fixed ticket has no cost".into()))?;
        let description = format!("Repair: {}", fixed.subject);

        let query = format!(
            "INSERT INTO landlord_expenses
                (amount, description, ticket_id, property_id, landlord_id, status_id, expense_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (ticket_id) DO UPDATE SET
                amount = EXCLUDED.amount,
                description = EXCLUDED.description,
                expense_date = EXCLUDED.expense_date
             WHERE landlord_expenses.status_id = $6 AND landlord_expenses.payout_id IS NULL
             RETURNING {EXPENSE_COLUMNS}"
        );
        let written = sqlx::query_as::<_, LandlordExpense>(&query)
            .bind(amount)
            .bind(&description)
            .bind(fixed.id)
            .bind(fixed.property_id)
            .bind(fixed.landlord_id)
            .bind(ExpenseStatus::Pending.id())
            .bind(today)
            .fetch_optional(&mut **tx)
            .await?;

        if let Some(expense) = written {
            return Ok(expense);
        }

        // The existing expense was already approved by an administrator. It
        // stands as long as the cost is unchanged.
        let query = format!("SELECT {EXPENSE_COLUMNS} FROM landlord_expenses WHERE ticket_id = $1");
        let existing = sqlx::query_as::<_, LandlordExpense>(&query)
            .bind(fixed.id)
            .fetch_one(&mut **tx)
            .await?;
        if existing.amount != amount {
            return Err(CoreError::InvalidState(format!(
                "Expense {} for this ticket is already {} and cannot be re-priced",
                existing.id,
                existing.status()?
            ))
            .into());
        }
        Ok(existing)
    }
}
