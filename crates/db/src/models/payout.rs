//! Payout models.

use propdesk_core::error::CoreError;
use propdesk_core::status::{PayoutStatus, StatusId};
use propdesk_core::types::{Date, DbId, Money, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::expense::LandlordExpense;

/// A row from the `payouts` table.
///
/// `expense_snapshot` is a frozen JSON copy of the expense rows the payout
/// deducted, taken before they were marked `deducted`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Payout {
    pub id: DbId,
    pub reference: String,
    pub landlord_id: DbId,
    pub rent_cycle_id: DbId,
    pub amount: Money,
    pub total_rent: Money,
    pub total_expenses: Money,
    pub period_start: Date,
    pub period_end: Date,
    pub status_id: StatusId,
    pub expense_snapshot: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Payout {
    pub fn status(&self) -> Result<PayoutStatus, CoreError> {
        PayoutStatus::try_from(self.status_id)
    }

    /// Decode the frozen expense snapshot.
    pub fn snapshot_expenses(&self) -> Result<Vec<LandlordExpense>, serde_json::Error> {
        serde_json::from_value(self.expense_snapshot.clone())
    }
}

/// Result of closing a rent cycle.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPayout {
    pub payout: Payout,
    /// The approved ledger row carrying a negative net into the next cycle.
    pub deficit_expense: Option<LandlordExpense>,
}
