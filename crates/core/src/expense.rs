//! Landlord expense ledger rules.
//!
//! Two transitions exist: `pending -> approved` (tenant confirmation or an
//! administrator) and `approved -> deducted` (payout generation only, which
//! sets `payout_id` in the same statement). `deducted` is terminal.

use crate::error::CoreError;
use crate::status::{ExpenseStatus, TicketStatus};
use crate::types::{Date, Money};

/// Maximum length for an expense description.
pub const MAX_DESCRIPTION_LENGTH: usize = 1_000;

/// Prefix of the description written on deficit carry-forward rows.
pub const DEFICIT_DESCRIPTION_PREFIX: &str = "Deficit carried forward";

/// Validate an expense amount. Ledger rows are always positive.
pub fn validate_amount(amount: Money) -> Result<(), CoreError> {
    if amount <= Money::ZERO {
        return Err(CoreError::Validation(format!(
            "Expense amount must be greater than zero (got {amount})"
        )));
    }
    Ok(())
}

/// Validate an expense description.
pub fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.trim().is_empty() {
        return Err(CoreError::Validation(
            "Expense description must not be empty".into(),
        ));
    }
    if description.len() > MAX_DESCRIPTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Expense description exceeds maximum length of {MAX_DESCRIPTION_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a manual approval.
///
/// `linked_ticket` is the status of the ticket the expense belongs to, if
/// any. An expense whose repair is still awaiting the tenant's verdict must
/// never be approved; a disputed repair (ticket back in progress) may be
/// approved by a human who has resolved the dispute.
pub fn validate_approve(
    current: ExpenseStatus,
    linked_ticket: Option<TicketStatus>,
) -> Result<(), CoreError> {
    match current {
        ExpenseStatus::Pending => {}
        ExpenseStatus::Approved | ExpenseStatus::Deducted => {
            return Err(CoreError::InvalidState(format!(
                "Only pending expenses can be approved (expense is {current})"
            )));
        }
    }
    if linked_ticket == Some(TicketStatus::AwaitingConfirmation) {
        return Err(CoreError::InvalidState(
            "Expense cannot be approved while its ticket awaits tenant confirmation".into(),
        ));
    }
    Ok(())
}

/// Whether an expense may be picked up by a payout.
pub fn is_settleable(status: ExpenseStatus, has_payout: bool) -> bool {
    status == ExpenseStatus::Approved && !has_payout
}

/// Description for the ledger row that carries a deficit into the next cycle.
pub fn deficit_description(payout_reference: &str) -> String {
    format!("{DEFICIT_DESCRIPTION_PREFIX} from payout {payout_reference}")
}

/// Date for a deficit row so that the next cycle's window picks it up.
///
/// A cycle closed before its window ends would otherwise leave a deficit
/// dated inside the closed window, where no later closure looks.
pub fn deficit_date(today: Date, closed_window_end: Date) -> Date {
    closed_window_end
        .succ_opt()
        .map_or(today, |next_window_start| next_window_start.max(today))
}
