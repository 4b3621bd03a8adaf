//! Lease administration rules used by the directory endpoints.

use crate::error::CoreError;
use crate::types::{Date, Money};

/// Maximum length for a rent-change reason.
pub const MAX_REASON_LENGTH: usize = 1_000;

/// Rent must be a positive amount.
pub fn validate_rent_amount(amount: Money) -> Result<(), CoreError> {
    if amount <= Money::ZERO {
        return Err(CoreError::Validation(format!(
            "Rent amount must be greater than zero (got {amount})"
        )));
    }
    Ok(())
}

/// Service charge and caution deposit may be zero but never negative.
pub fn validate_charge(name: &str, amount: Money) -> Result<(), CoreError> {
    if amount < Money::ZERO {
        return Err(CoreError::Validation(format!("{name} must not be negative")));
    }
    Ok(())
}

/// A lease may not end before it starts.
pub fn validate_term(start: Date, end: Option<Date>) -> Result<(), CoreError> {
    match end {
        Some(end) if end < start => Err(CoreError::Validation(format!(
            "Lease end date {end} is before start date {start}"
        ))),
        _ => Ok(()),
    }
}

/// Validate a rent change against the current lease.
pub fn validate_rent_change(
    is_active: bool,
    current: Money,
    new_amount: Money,
    reason: &str,
) -> Result<(), CoreError> {
    if !is_active {
        return Err(CoreError::InvalidState(
            "Rent can only be changed on an active lease".into(),
        ));
    }
    validate_rent_amount(new_amount)?;
    if new_amount == current {
        return Err(CoreError::Validation(format!(
            "New rent amount equals the current amount ({current})"
        )));
    }
    if reason.trim().is_empty() {
        return Err(CoreError::Validation("A reason is required for a rent change".into()));
    }
    if reason.len() > MAX_REASON_LENGTH {
        return Err(CoreError::Validation(format!(
            "Reason exceeds maximum length of {MAX_REASON_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a termination request.
pub fn validate_termination(
    is_active: bool,
    start: Date,
    termination_date: Date,
) -> Result<(), CoreError> {
    if !is_active {
        return Err(CoreError::InvalidState("Lease is already terminated".into()));
    }
    if termination_date < start {
        return Err(CoreError::Validation(format!(
            "Termination date {termination_date} is before lease start {start}"
        )));
    }
    Ok(())
}
