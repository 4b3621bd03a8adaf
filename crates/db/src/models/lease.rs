//! Lease models and rent-change audit rows.

use propdesk_core::error::CoreError;
use propdesk_core::lease;
use propdesk_core::status::{BillingCycle, StatusId};
use propdesk_core::tenant_financials::LeaseTerms;
use propdesk_core::types::{Date, DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `leases` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lease {
    pub id: DbId,
    pub tenant_id: DbId,
    pub property_id: DbId,
    pub rent_amount: Money,
    pub billing_cycle_id: StatusId,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub service_charge: Money,
    pub caution_deposit: Money,
    pub is_active: bool,
    pub termination_date: Option<Date>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Lease {
    pub fn billing_cycle(&self) -> Result<BillingCycle, CoreError> {
        BillingCycle::try_from(self.billing_cycle_id)
    }

    /// Terms for the tenant accrual model. Accrual stops at whichever of
    /// the end date and termination date comes first.
    pub fn terms(&self) -> Result<LeaseTerms, CoreError> {
        let end_date = match (self.end_date, self.termination_date) {
            (Some(end), Some(term)) => Some(end.min(term)),
            (end, term) => end.or(term),
        };
        Ok(LeaseTerms {
            rent_amount: self.rent_amount,
            billing_cycle: self.billing_cycle()?,
            start_date: self.start_date,
            end_date,
            service_charge: self.service_charge,
            caution_deposit: self.caution_deposit,
        })
    }
}

/// DTO for creating a lease.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLease {
    pub tenant_id: DbId,
    pub property_id: DbId,
    pub rent_amount: Money,
    pub billing_cycle_id: Option<StatusId>,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub service_charge: Option<Money>,
    pub caution_deposit: Option<Money>,
}

impl CreateLease {
    /// Validate the lease terms before insert.
    pub fn validate(&self) -> Result<(), CoreError> {
        lease::validate_rent_amount(self.rent_amount)?;
        lease::validate_term(self.start_date, self.end_date)?;
        if let Some(id) = self.billing_cycle_id {
            BillingCycle::try_from(id)?;
        }
        if let Some(charge) = self.service_charge {
            lease::validate_charge("Service charge", charge)?;
        }
        if let Some(deposit) = self.caution_deposit {
            lease::validate_charge("Caution deposit", deposit)?;
        }
        Ok(())
    }
}

/// Request body for changing a lease's rent.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeRentRequest {
    pub new_amount: Money,
    pub reason: String,
}

/// Request body for terminating a lease.
#[derive(Debug, Clone, Deserialize)]
pub struct TerminateLeaseRequest {
    pub termination_date: Date,
}

/// A row from the `lease_rent_changes` audit table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LeaseRentChange {
    pub id: DbId,
    pub lease_id: DbId,
    pub previous_amount: Money,
    pub new_amount: Money,
    pub reason: String,
    pub changed_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
