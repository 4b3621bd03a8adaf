//! Maintenance ticket models.

use propdesk_core::error::CoreError;
use propdesk_core::status::{ConfirmationStatus, PayerType, StatusId, TicketStatus};
use propdesk_core::ticket::ConfirmationOutcome;
use propdesk_core::types::{DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::expense::LandlordExpense;

/// A row from the `tickets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Ticket {
    pub id: DbId,
    pub subject: String,
    pub category: String,
    pub description: Option<String>,
    pub requester_id: DbId,
    pub property_id: DbId,
    pub landlord_id: DbId,
    pub status_id: StatusId,
    pub priority_id: StatusId,
    pub payer_type_id: StatusId,
    pub artisan_name: Option<String>,
    pub artisan_phone: Option<String>,
    pub cost_actual: Option<Money>,
    pub resolution_note: Option<String>,
    pub resolved_by: Option<DbId>,
    pub resolved_at: Option<Timestamp>,
    pub confirmation_status_id: StatusId,
    pub rent_cycle_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Ticket {
    pub fn status(&self) -> Result<TicketStatus, CoreError> {
        TicketStatus::try_from(self.status_id)
    }

    pub fn payer_type(&self) -> Result<PayerType, CoreError> {
        PayerType::try_from(self.payer_type_id)
    }

    pub fn confirmation_status(&self) -> Result<ConfirmationStatus, CoreError> {
        ConfirmationStatus::try_from(self.confirmation_status_id)
    }
}

/// DTO for opening a ticket. The landlord is copied from the property.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTicket {
    pub subject: String,
    pub category: String,
    pub description: Option<String>,
    pub property_id: DbId,
    pub priority_id: Option<StatusId>,
    pub payer_type_id: Option<StatusId>,
    pub rent_cycle_id: Option<DbId>,
}

/// Request body for assigning an artisan and a payer.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignTicket {
    pub artisan_name: String,
    pub artisan_phone: Option<String>,
    pub payer_type_id: StatusId,
    pub rent_cycle_id: Option<DbId>,
}

/// Request body for marking a ticket as fixed.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkFixedRequest {
    pub resolution_note: String,
    pub cost_actual: Money,
}

/// Request body for the tenant's confirmation.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmResolutionRequest {
    pub outcome: ConfirmationOutcome,
}

/// Result of marking a ticket as fixed.
#[derive(Debug, Clone, Serialize)]
pub struct MarkedFixed {
    pub ticket: Ticket,
    /// The pending ledger entry, present when the landlord pays.
    pub expense: Option<LandlordExpense>,
}

/// Result of the tenant's confirmation.
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionConfirmed {
    pub ticket: Ticket,
    /// The expense advanced to `approved`, if one was pending.
    pub approved_expense: Option<LandlordExpense>,
}
