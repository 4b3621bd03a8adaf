//! Rent cycle (landlord billing window) rules.
//!
//! A cycle moves `open -> closed` exactly once. Its inclusive date window
//! matches ticketless ledger entries; ticket expenses are bound to a cycle
//! explicitly when the ticket is created or assigned.

use chrono::{Datelike, Months};

use crate::error::CoreError;
use crate::status::RentCycleStatus;
use crate::types::{Date, DbId};

/// Validate that a billing window is well-formed.
pub fn validate_window(start: Date, end: Date) -> Result<(), CoreError> {
    if end < start {
        return Err(CoreError::Validation(format!(
            "Rent cycle end date {end} is before start date {start}"
        )));
    }
    Ok(())
}

/// Fail with `AlreadyClosed` unless the cycle is still open.
pub fn ensure_open(id: DbId, status: RentCycleStatus) -> Result<(), CoreError> {
    match status {
        RentCycleStatus::Open => Ok(()),
        RentCycleStatus::Closed => Err(CoreError::AlreadyClosed {
            entity: "RentCycle",
            id,
        }),
    }
}

/// Whether `date` falls inside the inclusive window `[start, end]`.
pub fn window_contains(start: Date, end: Date, date: Date) -> bool {
    start <= date && date <= end
}

/// The calendar-month window containing `today`, used when a landlord has
/// no open cycle and one must be created on demand.
pub fn month_window(today: Date) -> (Date, Date) {
    let start = today.with_day(1).unwrap_or(today);
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(start);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn window_must_not_be_inverted() {
        assert!(validate_window(d(2026, 1, 1), d(2026, 1, 31)).is_ok());
        assert!(validate_window(d(2026, 1, 1), d(2026, 1, 1)).is_ok());
        assert!(validate_window(d(2026, 2, 1), d(2026, 1, 31)).is_err());
    }

    #[test]
    fn closed_cycle_reports_already_closed() {
        assert!(ensure_open(3, RentCycleStatus::Open).is_ok());
        let err = ensure_open(3, RentCycleStatus::Closed).unwrap_err();
        assert!(matches!(
            err,
            CoreError::AlreadyClosed {
                entity: "RentCycle",
                id: 3
            }
        ));
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let (start, end) = (d(2026, 3, 1), d(2026, 3, 31));
        assert!(window_contains(start, end, start));
        assert!(window_contains(start, end, end));
        assert!(!window_contains(start, end, d(2026, 4, 1)));
        assert!(!window_contains(start, end, d(2026, 2, 28)));
    }

    #[test]
    fn month_window_handles_short_months() {
        assert_eq!(month_window(d(2026, 2, 14)), (d(2026, 2, 1), d(2026, 2, 28)));
        assert_eq!(month_window(d(2028, 2, 29)), (d(2028, 2, 1), d(2028, 2, 29)));
        assert_eq!(month_window(d(2026, 12, 31)), (d(2026, 12, 1), d(2026, 12, 31)));
    }
}
