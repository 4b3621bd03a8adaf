//! Tenant-side accrual model.
//!
//! Rent accrues per billing cycle elapsed since the lease started (the first
//! cycle falls due on the start date), the service charge accrues per lease
//! year started, and the caution deposit is due once. This model is
//! independent of landlord settlement.

use chrono::Months;
use serde::Serialize;

use crate::status::BillingCycle;
use crate::types::{Date, Money};

/// Lease terms needed to compute what a tenant owes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaseTerms {
    pub rent_amount: Money,
    pub billing_cycle: BillingCycle,
    pub start_date: Date,
    /// Last day of the tenancy: the earlier of the lease end date and the
    /// termination date, if either is set.
    pub end_date: Option<Date>,
    /// Charged once per lease year.
    pub service_charge: Money,
    pub caution_deposit: Money,
}

/// What a tenant owes and has paid as of a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinancialSummary {
    pub as_of: Date,
    pub cycles_elapsed: u32,
    pub rent_due: Money,
    pub service_charge_due: Money,
    pub caution_deposit: Money,
    pub total_due: Money,
    pub total_paid: Money,
    /// Positive when the tenant owes money, negative when in credit.
    pub balance: Money,
    pub is_overdue: bool,
    pub next_due_date: Option<Date>,
}

/// Length of one billing cycle in months.
pub fn cycle_months(cycle: BillingCycle) -> u32 {
    match cycle {
        BillingCycle::Monthly => 1,
        BillingCycle::Quarterly => 3,
        BillingCycle::Yearly => 12,
    }
}

/// Number of periods of `period_months` that have started on or before
/// `until`, counting the one starting on `start`.
fn periods_started(start: Date, until: Date, period_months: u32) -> u32 {
    let mut count = 0;
    while let Some(due) = start.checked_add_months(Months::new(count * period_months)) {
        if due > until {
            break;
        }
        count += 1;
    }
    count
}

/// Compute the tenant's position on a lease as of `as_of`.
///
/// `successful_payments` must contain only verified payments.
pub fn summarize<I>(terms: &LeaseTerms, successful_payments: I, as_of: Date) -> FinancialSummary
where
    I: IntoIterator<Item = Money>,
{
    let accrual_until = match terms.end_date {
        Some(end) if end < as_of => end,
        _ => as_of,
    };

    let period = cycle_months(terms.billing_cycle);
    let (cycles_elapsed, years_started) = if accrual_until < terms.start_date {
        (0, 0)
    } else {
        (
            periods_started(terms.start_date, accrual_until, period),
            periods_started(terms.start_date, accrual_until, 12),
        )
    };

    let rent_due = terms.rent_amount * Money::from(cycles_elapsed);
    let service_charge_due = terms.service_charge * Money::from(years_started);
    let caution_deposit = if cycles_elapsed > 0 {
        terms.caution_deposit
    } else {
        Money::ZERO
    };
    let total_due = rent_due + service_charge_due + caution_deposit;
    let total_paid: Money = successful_payments.into_iter().sum();
    let balance = total_due - total_paid;

    let next_due_date = terms
        .start_date
        .checked_add_months(Months::new(cycles_elapsed * period))
        .filter(|next| terms.end_date.map_or(true, |end| *next <= end));

    FinancialSummary {
        as_of,
        cycles_elapsed,
        rent_due,
        service_charge_due,
        caution_deposit,
        total_due,
        total_paid,
        balance,
        is_overdue: balance > Money::ZERO,
        next_due_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_PAYMENTS: [Money; 0] = [];

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd_opt(y, m, day).unwrap()
    }

    fn monthly(start: Date) -> LeaseTerms {
        LeaseTerms {
            rent_amount: Money::from(1000),
            billing_cycle: BillingCycle::Monthly,
            start_date: start,
            end_date: None,
            service_charge: Money::from(600),
            caution_deposit: Money::from(2000),
        }
    }

    #[test]
    fn first_cycle_is_due_on_start_date() {
        let s = summarize(&monthly(d(2026, 1, 15)), NO_PAYMENTS, d(2026, 1, 15));
        assert_eq!(s.cycles_elapsed, 1);
        assert_eq!(s.rent_due, Money::from(1000));
        assert_eq!(s.service_charge_due, Money::from(600));
        assert_eq!(s.caution_deposit, Money::from(2000));
        assert_eq!(s.total_due, Money::from(3600));
        assert_eq!(s.next_due_date, Some(d(2026, 2, 15)));
    }

    #[test]
    fn nothing_due_before_start() {
        let s = summarize(&monthly(d(2026, 5, 1)), NO_PAYMENTS, d(2026, 4, 30));
        assert_eq!(s.cycles_elapsed, 0);
        assert_eq!(s.total_due, Money::ZERO);
        assert!(!s.is_overdue);
        assert_eq!(s.next_due_date, Some(d(2026, 5, 1)));
    }

    #[test]
    fn accrues_monthly_and_yearly_charges() {
        let s = summarize(&monthly(d(2025, 1, 1)), NO_PAYMENTS, d(2026, 2, 10));
        // Jan 2025 .. Feb 2026 inclusive.
        assert_eq!(s.cycles_elapsed, 14);
        assert_eq!(s.rent_due, Money::from(14_000));
        // Two lease years have started.
        assert_eq!(s.service_charge_due, Money::from(1200));
    }

    #[test]
    fn quarterly_cycles() {
        let mut terms = monthly(d(2026, 1, 1));
        terms.billing_cycle = BillingCycle::Quarterly;
        let s = summarize(&terms, NO_PAYMENTS, d(2026, 7, 1));
        assert_eq!(s.cycles_elapsed, 3);
        assert_eq!(s.next_due_date, Some(d(2026, 10, 1)));
    }

    #[test]
    fn payments_reduce_balance() {
        let s = summarize(
            &monthly(d(2026, 1, 1)),
            [Money::from(3600), Money::from(1000)],
            d(2026, 2, 1),
        );
        assert_eq!(s.total_due, Money::from(4600));
        assert_eq!(s.total_paid, Money::from(4600));
        assert_eq!(s.balance, Money::ZERO);
        assert!(!s.is_overdue);
    }

    #[test]
    fn underpayment_is_overdue() {
        let s = summarize(&monthly(d(2026, 1, 1)), [Money::from(3000)], d(2026, 1, 20));
        assert_eq!(s.balance, Money::from(600));
        assert!(s.is_overdue);
    }

    #[test]
    fn accrual_stops_at_end_date() {
        let mut terms = monthly(d(2026, 1, 1));
        terms.end_date = Some(d(2026, 3, 31));
        let s = summarize(&terms, NO_PAYMENTS, d(2027, 1, 1));
        assert_eq!(s.cycles_elapsed, 3);
        assert_eq!(s.next_due_date, None);
    }

    #[test]
    fn month_end_start_clamps() {
        let s = summarize(&monthly(d(2026, 1, 31)), NO_PAYMENTS, d(2026, 2, 28));
        assert_eq!(s.cycles_elapsed, 2);
    }
}
