//! Repository for the `leases` and `lease_rent_changes` tables.

use sqlx::{PgExecutor, PgPool};
use propdesk_core::error::CoreError;
use propdesk_core::lease;
use propdesk_core::status::BillingCycle;
use propdesk_core::types::{DbId, Money};

use crate::error::RepoResult;
use crate::models::lease::{
    ChangeRentRequest, CreateLease, Lease, LeaseRentChange, TerminateLeaseRequest,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, tenant_id, property_id, rent_amount, billing_cycle_id, \
    start_date, end_date, service_charge, caution_deposit, is_active, termination_date, \
    created_at, updated_at";

const CHANGE_COLUMNS: &str =
    "id, lease_id, previous_amount, new_amount, reason, changed_by, created_at, updated_at";

/// Provides lease administration and the rent aggregate used by payouts.
pub struct LeaseRepo;

impl LeaseRepo {
    /// Insert a new active lease.
    ///
    /// Fails with a `uq_leases_active_property` violation if the property
    /// already has an active lease.
    pub async fn create(pool: &PgPool, input: &CreateLease) -> Result<Lease, sqlx::Error> {
        let query = format!(
            "INSERT INTO leases
                (tenant_id, property_id, rent_amount, billing_cycle_id, start_date, end_date,
                 service_charge, caution_deposit)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 0), COALESCE($8, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lease>(&query)
            .bind(input.tenant_id)
            .bind(input.property_id)
            .bind(input.rent_amount)
            .bind(input.billing_cycle_id.unwrap_or(BillingCycle::Monthly.id()))
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.service_charge)
            .bind(input.caution_deposit)
            .fetch_one(pool)
            .await
    }

    /// Find a lease by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Lease>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM leases WHERE id = $1");
        sqlx::query_as::<_, Lease>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The tenant's active lease on a property, if any.
    pub async fn find_active_for_tenant(
        pool: &PgPool,
        tenant_id: DbId,
        property_id: DbId,
    ) -> Result<Option<Lease>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM leases \
             WHERE tenant_id = $1 AND property_id = $2 AND is_active"
        );
        sqlx::query_as::<_, Lease>(&query)
            .bind(tenant_id)
            .bind(property_id)
            .fetch_optional(pool)
            .await
    }

    /// Sum of `rent_amount` over the landlord's active leases.
    ///
    /// A point-in-time snapshot: leases terminated or re-priced mid-cycle
    /// count at their current state. No active leases yields zero.
    pub async fn active_rent_total<'e, E>(executor: E, landlord_id: DbId) -> Result<Money, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, Money>(
            "SELECT COALESCE(SUM(l.rent_amount), 0) \
             FROM leases l \
             JOIN properties p ON p.id = l.property_id \
             WHERE p.landlord_id = $1 AND l.is_active",
        )
        .bind(landlord_id)
        .fetch_one(executor)
        .await
    }

    /// Change the rent on an active lease and record the audit row.
    pub async fn change_rent(
        pool: &PgPool,
        id: DbId,
        input: &ChangeRentRequest,
        changed_by: DbId,
    ) -> RepoResult<LeaseRentChange> {
        let mut tx = pool.begin().await?;

        let lease = Self::lock(&mut tx, id).await?;
        lease::validate_rent_change(
            lease.is_active,
            lease.rent_amount,
            input.new_amount,
            &input.reason,
        )?;

        let query = format!(
            "INSERT INTO lease_rent_changes (lease_id, previous_amount, new_amount, reason, changed_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {CHANGE_COLUMNS}"
        );
        let change = sqlx::query_as::<_, LeaseRentChange>(&query)
            .bind(id)
            .bind(lease.rent_amount)
            .bind(input.new_amount)
            .bind(input.reason.trim())
            .bind(changed_by)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE leases SET rent_amount = $2 WHERE id = $1")
            .bind(id)
            .bind(input.new_amount)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(change)
    }

    /// Rent-change history for a lease, newest first.
    pub async fn list_rent_changes(
        pool: &PgPool,
        lease_id: DbId,
    ) -> Result<Vec<LeaseRentChange>, sqlx::Error> {
        let query = format!(
            "SELECT {CHANGE_COLUMNS} FROM lease_rent_changes \
             WHERE lease_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, LeaseRentChange>(&query)
            .bind(lease_id)
            .fetch_all(pool)
            .await
    }

    /// Deactivate a lease as of `termination_date`.
    pub async fn terminate(
        pool: &PgPool,
        id: DbId,
        input: &TerminateLeaseRequest,
    ) -> RepoResult<Lease> {
        let mut tx = pool.begin().await?;

        let lease = Self::lock(&mut tx, id).await?;
        lease::validate_termination(lease.is_active, lease.start_date, input.termination_date)?;

        let query = format!(
            "UPDATE leases SET is_active = false, termination_date = $2 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Lease>(&query)
            .bind(id)
            .bind(input.termination_date)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    async fn lock(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
    ) -> RepoResult<Lease> {
        let query = format!("SELECT {COLUMNS} FROM leases WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Lease>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| CoreError::NotFound { entity: "Lease", id }.into())
    }
}
