//! Tenant rent payment models (upstream payment intake).

use propdesk_core::status::StatusId;
use propdesk_core::types::{Date, DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `rent_payments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RentPayment {
    pub id: DbId,
    pub lease_id: DbId,
    pub amount: Money,
    pub paid_on: Date,
    pub status_id: StatusId,
    pub reference: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording a payment reported by the payment intake.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRentPayment {
    pub lease_id: DbId,
    pub amount: Money,
    pub paid_on: Date,
    pub status_id: StatusId,
    pub reference: Option<String>,
}
