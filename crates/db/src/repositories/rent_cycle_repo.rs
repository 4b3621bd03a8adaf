//! Repository for the `rent_cycles` table.

use sqlx::PgPool;
use propdesk_core::error::CoreError;
use propdesk_core::rent_cycle;
use propdesk_core::status::RentCycleStatus;
use propdesk_core::types::{Date, DbId};

use crate::error::RepoResult;
use crate::models::rent_cycle::{CreateRentCycle, RentCycle};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str =
    "id, landlord_id, start_date, end_date, status_id, closed_at, created_at, updated_at";

/// Provides access to landlord billing windows.
///
/// Closing a cycle is not exposed here; it only happens as the last step of
/// [`PayoutRepo::generate_for_cycle`](super::PayoutRepo::generate_for_cycle).
pub struct RentCycleRepo;

impl RentCycleRepo {
    /// Open a new cycle for a landlord.
    ///
    /// Fails with `Conflict` if the landlord already has an open cycle. The
    /// `uq_rent_cycles_open_landlord` index backs this check under races.
    pub async fn open(pool: &PgPool, input: &CreateRentCycle) -> RepoResult<RentCycle> {
        rent_cycle::validate_window(input.start_date, input.end_date)?;

        if let Some(existing) = Self::find_open_for_landlord(pool, input.landlord_id).await? {
            return Err(CoreError::Conflict(format!(
                "Landlord {} already has an open rent cycle ({})",
                input.landlord_id, existing.id
            ))
            .into());
        }

        let query = format!(
            "INSERT INTO rent_cycles (landlord_id, start_date, end_date, status_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let cycle = sqlx::query_as::<_, RentCycle>(&query)
            .bind(input.landlord_id)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(RentCycleStatus::Open.id())
            .fetch_one(pool)
            .await?;
        Ok(cycle)
    }

    /// Find a cycle by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<RentCycle>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rent_cycles WHERE id = $1");
        sqlx::query_as::<_, RentCycle>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The landlord's open cycle, if any.
    pub async fn find_open_for_landlord(
        pool: &PgPool,
        landlord_id: DbId,
    ) -> Result<Option<RentCycle>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM rent_cycles WHERE landlord_id = $1 AND status_id = $2"
        );
        sqlx::query_as::<_, RentCycle>(&query)
            .bind(landlord_id)
            .bind(RentCycleStatus::Open.id())
            .fetch_optional(pool)
            .await
    }

    /// Return the landlord's open cycle, creating one for the calendar month
    /// containing `today` if none exists.
    pub async fn get_or_create_current(
        pool: &PgPool,
        landlord_id: DbId,
        today: Date,
    ) -> Result<RentCycle, sqlx::Error> {
        if let Some(cycle) = Self::find_open_for_landlord(pool, landlord_id).await? {
            return Ok(cycle);
        }

        let (start, end) = rent_cycle::month_window(today);
        let query = format!(
            "INSERT INTO rent_cycles (landlord_id, start_date, end_date, status_id)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (landlord_id) WHERE status_id = 1 DO NOTHING
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, RentCycle>(&query)
            .bind(landlord_id)
            .bind(start)
            .bind(end)
            .bind(RentCycleStatus::Open.id())
            .fetch_optional(pool)
            .await?;

        match inserted {
            Some(cycle) => {
                tracing::info!(landlord_id, cycle_id = cycle.id, %start, %end, "Rent cycle opened on demand");
                Ok(cycle)
            }
            // Another request created it first.
            None => Self::find_open_for_landlord(pool, landlord_id)
                .await?
                .ok_or(sqlx::Error::RowNotFound),
        }
    }

    /// All cycles for a landlord, newest first.
    pub async fn list_by_landlord(
        pool: &PgPool,
        landlord_id: DbId,
    ) -> Result<Vec<RentCycle>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM rent_cycles WHERE landlord_id = $1 ORDER BY start_date DESC, id DESC"
        );
        sqlx::query_as::<_, RentCycle>(&query)
            .bind(landlord_id)
            .fetch_all(pool)
            .await
    }
}
