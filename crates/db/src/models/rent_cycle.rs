//! Rent cycle models.

use propdesk_core::error::CoreError;
use propdesk_core::status::{RentCycleStatus, StatusId};
use propdesk_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `rent_cycles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RentCycle {
    pub id: DbId,
    pub landlord_id: DbId,
    pub start_date: Date,
    pub end_date: Date,
    pub status_id: StatusId,
    pub closed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl RentCycle {
    pub fn status(&self) -> Result<RentCycleStatus, CoreError> {
        RentCycleStatus::try_from(self.status_id)
    }
}

/// DTO for opening a rent cycle.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRentCycle {
    pub landlord_id: DbId,
    pub start_date: Date,
    pub end_date: Date,
}
