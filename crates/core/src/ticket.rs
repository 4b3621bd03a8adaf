//! Maintenance ticket lifecycle rules.
//!
//! ```text
//! OPEN -> IN_PROGRESS -> AWAITING_CONFIRMATION -> RESOLVED -> CLOSED
//!                 ^                 |
//!                 +---- disputed ---+
//! ```
//!
//! `AWAITING_CONFIRMATION` is only entered through mark-as-fixed and always
//! carries a `pending` confirmation. The functions here validate a move and
//! describe its effect; the repository layer applies it under a row lock.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::status::{ConfirmationStatus, PayerType, TicketStatus};
use crate::types::Money;

/// Maximum length for a ticket subject.
pub const MAX_SUBJECT_LENGTH: usize = 200;

/// Maximum length for a resolution note.
pub const MAX_RESOLUTION_NOTE_LENGTH: usize = 5_000;

/// The tenant's answer to "was this fixed?".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmationOutcome {
    Confirmed,
    Disputed,
}

/// What a confirmation outcome does to the ticket and its expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationEffect {
    pub status: TicketStatus,
    pub confirmation: ConfirmationStatus,
    /// Advance a linked `pending` expense to `approved`.
    pub approve_expense: bool,
}

/// Validate a ticket subject.
pub fn validate_subject(subject: &str) -> Result<(), CoreError> {
    if subject.trim().is_empty() {
        return Err(CoreError::Validation("Ticket subject must not be empty".into()));
    }
    if subject.len() > MAX_SUBJECT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Ticket subject exceeds maximum length of {MAX_SUBJECT_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Assigning an artisan moves an open ticket into progress. Re-assigning an
/// in-progress ticket (e.g. after a dispute) is allowed.
pub fn validate_assign(current: TicketStatus) -> Result<TicketStatus, CoreError> {
    match current {
        TicketStatus::Open | TicketStatus::InProgress => Ok(TicketStatus::InProgress),
        TicketStatus::AwaitingConfirmation | TicketStatus::Resolved | TicketStatus::Closed => {
            Err(CoreError::InvalidState(format!(
                "Cannot assign a ticket that is {current}"
            )))
        }
    }
}

/// Mark-as-fixed is allowed while work is outstanding.
pub fn validate_mark_fixed(current: TicketStatus) -> Result<(), CoreError> {
    match current {
        TicketStatus::Open | TicketStatus::InProgress => Ok(()),
        TicketStatus::AwaitingConfirmation => Err(CoreError::InvalidState(
            "Ticket is already awaiting tenant confirmation".into(),
        )),
        TicketStatus::Resolved | TicketStatus::Closed => Err(CoreError::InvalidState(format!(
            "Cannot mark a {current} ticket as fixed"
        ))),
    }
}

/// Validate the reported repair cost for the given payer.
///
/// Landlord-paid repairs become ledger entries, so they need a positive
/// amount. Company-absorbed repairs may be free.
pub fn validate_cost(payer: PayerType, cost: Money) -> Result<(), CoreError> {
    match payer {
        PayerType::Landlord if cost <= Money::ZERO => Err(CoreError::Validation(
            "Repair cost must be greater than zero when the landlord pays".into(),
        )),
        PayerType::Company if cost < Money::ZERO => Err(CoreError::Validation(
            "Repair cost must not be negative".into(),
        )),
        _ => Ok(()),
    }
}

/// Validate a resolution note's length.
pub fn validate_resolution_note(note: &str) -> Result<(), CoreError> {
    if note.len() > MAX_RESOLUTION_NOTE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Resolution note exceeds maximum length of {MAX_RESOLUTION_NOTE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Whether marking a ticket fixed must record a landlord expense.
pub fn creates_expense(payer: PayerType) -> bool {
    match payer {
        PayerType::Landlord => true,
        PayerType::Company => false,
    }
}

/// Confirmation is only possible while the tenant's verdict is outstanding.
pub fn validate_confirm(current: TicketStatus) -> Result<(), CoreError> {
    match current {
        TicketStatus::AwaitingConfirmation => Ok(()),
        TicketStatus::Open
        | TicketStatus::InProgress
        | TicketStatus::Resolved
        | TicketStatus::Closed => Err(CoreError::InvalidState(format!(
            "Ticket is {current}, not awaiting confirmation"
        ))),
    }
}

/// Describe the effect of a confirmation outcome.
///
/// A dispute reopens the work and leaves the expense `pending`; it is never
/// cancelled automatically.
pub fn confirmation_effect(outcome: ConfirmationOutcome) -> ConfirmationEffect {
    match outcome {
        ConfirmationOutcome::Confirmed => ConfirmationEffect {
            status: TicketStatus::Resolved,
            confirmation: ConfirmationStatus::Confirmed,
            approve_expense: true,
        },
        ConfirmationOutcome::Disputed => ConfirmationEffect {
            status: TicketStatus::InProgress,
            confirmation: ConfirmationStatus::Disputed,
            approve_expense: false,
        },
    }
}

/// Only resolved tickets can be closed.
pub fn validate_close(current: TicketStatus) -> Result<(), CoreError> {
    match current {
        TicketStatus::Resolved => Ok(()),
        other => Err(CoreError::InvalidState(format!(
            "Only resolved tickets can be closed (ticket is {other})"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_must_be_present_and_bounded() {
        assert!(validate_subject("Leaking tap").is_ok());
        assert!(validate_subject("   ").is_err());
        assert!(validate_subject(&"x".repeat(MAX_SUBJECT_LENGTH + 1)).is_err());
    }

    #[test]
    fn assign_moves_open_to_in_progress() {
        assert_eq!(
            validate_assign(TicketStatus::Open).unwrap(),
            TicketStatus::InProgress
        );
        assert_eq!(
            validate_assign(TicketStatus::InProgress).unwrap(),
            TicketStatus::InProgress
        );
        assert!(validate_assign(TicketStatus::AwaitingConfirmation).is_err());
        assert!(validate_assign(TicketStatus::Closed).is_err());
    }

    #[test]
    fn mark_fixed_rejected_once_resolved() {
        assert!(validate_mark_fixed(TicketStatus::Open).is_ok());
        assert!(validate_mark_fixed(TicketStatus::InProgress).is_ok());
        for status in [
            TicketStatus::AwaitingConfirmation,
            TicketStatus::Resolved,
            TicketStatus::Closed,
        ] {
            assert!(matches!(
                validate_mark_fixed(status),
                Err(CoreError::InvalidState(_))
            ));
        }
    }

    #[test]
    fn landlord_cost_must_be_positive() {
        assert!(validate_cost(PayerType::Landlord, Money::from(5000)).is_ok());
        assert!(validate_cost(PayerType::Landlord, Money::ZERO).is_err());
        assert!(validate_cost(PayerType::Company, Money::ZERO).is_ok());
        assert!(validate_cost(PayerType::Company, Money::from(-1)).is_err());
    }

    #[test]
    fn only_landlord_payer_creates_expense() {
        assert!(creates_expense(PayerType::Landlord));
        assert!(!creates_expense(PayerType::Company));
    }

    #[test]
    fn confirm_requires_awaiting_confirmation() {
        assert!(validate_confirm(TicketStatus::AwaitingConfirmation).is_ok());
        for status in [
            TicketStatus::Open,
            TicketStatus::InProgress,
            TicketStatus::Resolved,
            TicketStatus::Closed,
        ] {
            assert!(matches!(
                validate_confirm(status),
                Err(CoreError::InvalidState(_))
            ));
        }
    }

    #[test]
    fn confirmed_resolves_and_approves_expense() {
        let effect = confirmation_effect(ConfirmationOutcome::Confirmed);
        assert_eq!(effect.status, TicketStatus::Resolved);
        assert_eq!(effect.confirmation, ConfirmationStatus::Confirmed);
        assert!(effect.approve_expense);
    }

    #[test]
    fn disputed_reopens_without_touching_expense() {
        let effect = confirmation_effect(ConfirmationOutcome::Disputed);
        assert_eq!(effect.status, TicketStatus::InProgress);
        assert_eq!(effect.confirmation, ConfirmationStatus::Disputed);
        assert!(!effect.approve_expense);
    }

    #[test]
    fn close_only_from_resolved() {
        assert!(validate_close(TicketStatus::Resolved).is_ok());
        assert!(validate_close(TicketStatus::AwaitingConfirmation).is_err());
        assert!(validate_close(TicketStatus::Closed).is_err());
    }
}
