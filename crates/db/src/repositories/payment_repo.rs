//! Repository for the `rent_payments` table.
//!
//! Payment intake is upstream of the settlement engine; these methods exist
//! so the intake can record what it verified and the tenant summary can
//! read it back.

use sqlx::PgPool;
use propdesk_core::status::PaymentStatus;
use propdesk_core::types::{DbId, Money};

use crate::models::payment::{CreateRentPayment, RentPayment};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, lease_id, amount, paid_on, status_id, reference, created_at, updated_at";

/// Provides access to recorded rent payments.
pub struct PaymentRepo;

impl PaymentRepo {
    /// Record a payment reported by the payment intake.
    pub async fn create(
        pool: &PgPool,
        input: &CreateRentPayment,
    ) -> Result<RentPayment, sqlx::Error> {
        let query = format!(
            "INSERT INTO rent_payments (lease_id, amount, paid_on, status_id, reference)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RentPayment>(&query)
            .bind(input.lease_id)
            .bind(input.amount)
            .bind(input.paid_on)
            .bind(input.status_id)
            .bind(&input.reference)
            .fetch_one(pool)
            .await
    }

    /// Amounts of all successful payments on a lease.
    pub async fn successful_amounts(
        pool: &PgPool,
        lease_id: DbId,
    ) -> Result<Vec<Money>, sqlx::Error> {
        sqlx::query_scalar::<_, Money>(
            "SELECT amount FROM rent_payments \
             WHERE lease_id = $1 AND status_id = $2 \
             ORDER BY paid_on, id",
        )
        .bind(lease_id)
        .bind(PaymentStatus::Successful.id())
        .fetch_all(pool)
        .await
    }
}
