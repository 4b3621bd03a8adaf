//! Landlord expense ledger models.

use propdesk_core::error::CoreError;
use propdesk_core::status::{ExpenseStatus, StatusId};
use propdesk_core::types::{Date, DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `landlord_expenses` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct LandlordExpense {
    pub id: DbId,
    pub amount: Money,
    pub description: String,
    pub ticket_id: Option<DbId>,
    pub property_id: DbId,
    pub landlord_id: DbId,
    pub status_id: StatusId,
    pub expense_date: Date,
    pub payout_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl LandlordExpense {
    pub fn status(&self) -> Result<ExpenseStatus, CoreError> {
        ExpenseStatus::try_from(self.status_id)
    }

    pub fn is_settled(&self) -> bool {
        self.payout_id.is_some()
    }
}

/// DTO for an administrator's manual ledger entry. The landlord is copied
/// from the property.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateManualExpense {
    pub property_id: DbId,
    pub amount: Money,
    pub description: String,
    pub expense_date: Option<Date>,
}

/// Query parameters for listing a landlord's ledger.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseListParams {
    pub landlord_id: DbId,
    pub status_id: Option<StatusId>,
    #[serde(default)]
    pub unsettled: bool,
}
