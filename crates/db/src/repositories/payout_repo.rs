//! Repository for the `payouts` table and the cycle-closing settlement.

use sqlx::PgPool;
use propdesk_core::error::CoreError;
use propdesk_core::expense;
use propdesk_core::payout::{self, PayoutPreview, Settlement};
use propdesk_core::rent_cycle;
use propdesk_core::status::{ExpenseStatus, PayerType, RentCycleStatus};
use propdesk_core::types::{Date, DbId};

use crate::error::RepoResult;
use crate::models::expense::LandlordExpense;
use crate::models::payout::{GeneratedPayout, Payout};
use crate::models::rent_cycle::RentCycle;
use crate::repositories::expense_repo::COLUMNS as EXPENSE_COLUMNS;
use crate::repositories::rent_cycle_repo::COLUMNS as CYCLE_COLUMNS;
use crate::repositories::{ExpenseRepo, LeaseRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, reference, landlord_id, rent_cycle_id, amount, total_rent, \
    total_expenses, period_start, period_end, status_id, expense_snapshot, \
    created_at, updated_at";

/// Expense columns qualified with the `e` alias for joined queries.
const EXPENSE_COLUMNS_E: &str = "e.id, e.amount, e.description, e.ticket_id, e.property_id, \
    e.landlord_id, e.status_id, e.expense_date, e.payout_id, e.created_at, e.updated_at";

/// Provides payout generation and payout history.
pub struct PayoutRepo;

impl PayoutRepo {
    /// Close a rent cycle into a payout.
    ///
    /// In one transaction: lock the open cycle, total the landlord's active
    /// rent, select the cycle's approved and unsettled expenses, write the
    /// payout with a frozen snapshot, mark the expenses deducted, carry any
    /// deficit forward as a new approved expense, and close the cycle. Any
    /// failure leaves the cycle open and the ledger untouched.
    pub async fn generate_for_cycle(
        pool: &PgPool,
        cycle_id: DbId,
        today: Date,
    ) -> RepoResult<GeneratedPayout> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {CYCLE_COLUMNS} FROM rent_cycles WHERE id = $1 FOR UPDATE");
        let cycle = sqlx::query_as::<_, RentCycle>(&query)
            .bind(cycle_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "RentCycle",
                id: cycle_id,
            })?;
        rent_cycle::ensure_open(cycle.id, cycle.status()?)?;

        let total_rent = LeaseRepo::active_rent_total(&mut *tx, cycle.landlord_id).await?;

        // Ticket expenses match by explicit cycle binding; ticketless ones by
        // date window.
        let query = format!(
            "SELECT {EXPENSE_COLUMNS_E}
             FROM landlord_expenses e
             LEFT JOIN tickets t ON t.id = e.ticket_id
             WHERE e.landlord_id = $1
               AND e.status_id = $2
               AND e.payout_id IS NULL
               AND (
                    (e.ticket_id IS NOT NULL AND t.rent_cycle_id = $3 AND t.payer_type_id = $4)
                 OR (e.ticket_id IS NULL AND e.expense_date BETWEEN $5 AND $6)
               )
             ORDER BY e.id
             FOR UPDATE OF e"
        );
        let expenses = sqlx::query_as::<_, LandlordExpense>(&query)
            .bind(cycle.landlord_id)
            .bind(ExpenseStatus::Approved.id())
            .bind(cycle.id)
            .bind(PayerType::Landlord.id())
            .bind(cycle.start_date)
            .bind(cycle.end_date)
            .fetch_all(&mut *tx)
            .await?;
        for e in &expenses {
            if !expense::is_settleable(e.status()?, e.payout_id.is_some()) {
                return Err(CoreError::Conflict(format!(
                    "Expense {} cannot be settled by rent cycle {}",
                    e.id, cycle.id
                ))
                .into());
            }
        }

        let settlement = Settlement::compute(total_rent, expenses.iter().map(|e| e.amount));
        let snapshot = serde_json::to_value(&expenses)
            .map_err(|e| CoreError::Internal(format!("Failed to snapshot expenses: {e}")))?;

        let payout = Self::insert_with_fresh_reference(
            &mut tx,
            &cycle,
            &settlement,
            &snapshot,
            today,
        )
        .await?;

        let expense_ids: Vec<DbId> = expenses.iter().map(|e| e.id).collect();
        let deducted = sqlx::query(
            "UPDATE landlord_expenses SET status_id = $1, payout_id = $2 \
             WHERE id = ANY($3) AND status_id = $4 AND payout_id IS NULL",
        )
        .bind(ExpenseStatus::Deducted.id())
        .bind(payout.id)
        .bind(&expense_ids)
        .bind(ExpenseStatus::Approved.id())
        .execute(&mut *tx)
        .await?;
        if deducted.rows_affected() != expense_ids.len() as u64 {
            return Err(CoreError::Conflict(format!(
                "Expected to deduct {} expenses for rent cycle {}, deducted {}",
                expense_ids.len(),
                cycle.id,
                deducted.rows_affected()
            ))
            .into());
        }

        let deficit_expense = match settlement.deficit() {
            Some(deficit) => {
                let anchor: Option<DbId> = sqlx::query_scalar(
                    "SELECT id FROM properties WHERE landlord_id = $1 ORDER BY id LIMIT 1",
                )
                .bind(cycle.landlord_id)
                .fetch_optional(&mut *tx)
                .await?;
                let property_id = anchor
                    .or_else(|| expenses.first().map(|e| e.property_id))
                    .ok_or_else(|| {
                        CoreError::Internal(format!(
                            "Landlord {} has a deficit but no property to anchor it",
                            cycle.landlord_id
                        ))
                    })?;

                let query = format!(
                    "INSERT INTO landlord_expenses
                        (amount, description, property_id, landlord_id, status_id, expense_date)
                     VALUES ($1, $2, $3, $4, $5, $6)
                     RETURNING {EXPENSE_COLUMNS}"
                );
                let row = sqlx::query_as::<_, LandlordExpense>(&query)
                    .bind(deficit)
                    .bind(expense::deficit_description(&payout.reference))
                    .bind(property_id)
                    .bind(cycle.landlord_id)
                    .bind(ExpenseStatus::Approved.id())
                    .bind(expense::deficit_date(today, cycle.end_date))
                    .fetch_one(&mut *tx)
                    .await?;
                Some(row)
            }
            None => None,
        };

        let closed = sqlx::query(
            "UPDATE rent_cycles SET status_id = $2, closed_at = NOW() \
             WHERE id = $1 AND status_id = $3",
        )
        .bind(cycle.id)
        .bind(RentCycleStatus::Closed.id())
        .bind(RentCycleStatus::Open.id())
        .execute(&mut *tx)
        .await?;
        if closed.rows_affected() != 1 {
            return Err(CoreError::AlreadyClosed {
                entity: "RentCycle",
                id: cycle.id,
            }
            .into());
        }

        tx.commit().await?;

        tracing::info!(
            cycle_id = cycle.id,
            landlord_id = cycle.landlord_id,
            payout_id = payout.id,
            reference = %payout.reference,
            total_rent = %settlement.total_rent,
            total_expenses = %settlement.total_expenses,
            net = %settlement.net_payout,
            expense_count = settlement.expense_count,
            deficit_expense_id = deficit_expense.as_ref().map(|e| e.id),
            "Payout generated and rent cycle closed",
        );

        Ok(GeneratedPayout {
            payout,
            deficit_expense,
        })
    }

    /// Read-only preview of what a landlord would net right now.
    ///
    /// Counts every approved, unsettled expense regardless of cycle, so it
    /// can differ from what the next closure actually deducts.
    pub async fn preview(pool: &PgPool, landlord_id: DbId) -> Result<PayoutPreview, sqlx::Error> {
        let rent = LeaseRepo::active_rent_total(pool, landlord_id).await?;
        let amounts = ExpenseRepo::unsettled_approved_amounts(pool, landlord_id).await?;
        Ok(Settlement::compute(rent, amounts).into())
    }

    /// Find a payout by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Payout>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payouts WHERE id = $1");
        sqlx::query_as::<_, Payout>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A landlord's payouts, newest period first.
    pub async fn list_by_landlord(
        pool: &PgPool,
        landlord_id: DbId,
    ) -> Result<Vec<Payout>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payouts WHERE landlord_id = $1 \
             ORDER BY period_start DESC, id DESC"
        );
        sqlx::query_as::<_, Payout>(&query)
            .bind(landlord_id)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Insert the payout row, drawing a new reference whenever the random
    /// suffix collides with an existing one.
    async fn insert_with_fresh_reference(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        cycle: &RentCycle,
        settlement: &Settlement,
        snapshot: &serde_json::Value,
        today: Date,
    ) -> RepoResult<Payout> {
        let query = format!(
            "INSERT INTO payouts
                (reference, landlord_id, rent_cycle_id, amount, total_rent, total_expenses,
                 period_start, period_end, status_id, expense_snapshot)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             ON CONFLICT (reference) DO NOTHING
             RETURNING {COLUMNS}"
        );

        for attempt in 1..=payout::MAX_REFERENCE_ATTEMPTS {
            let reference = payout::generate_reference(today);
            let inserted = sqlx::query_as::<_, Payout>(&query)
                .bind(&reference)
                .bind(cycle.landlord_id)
                .bind(cycle.id)
                .bind(settlement.net_payout)
                .bind(settlement.total_rent)
                .bind(settlement.total_expenses)
                .bind(cycle.start_date)
                .bind(cycle.end_date)
                .bind(settlement.status().id())
                .bind(snapshot)
                .fetch_optional(&mut **tx)
                .await?;

            match inserted {
                Some(payout) => return Ok(payout),
                None => tracing::warn!(%reference, attempt, "Payout reference collision, retrying"),
            }
        }

        Err(CoreError::Conflict(format!(
            "Could not allocate a unique payout reference after {} attempts",
            payout::MAX_REFERENCE_ATTEMPTS
        ))
        .into())
    }
}
