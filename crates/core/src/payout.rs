//! Payout arithmetic and reference generation.
//!
//! The repository layer gathers rent and eligible expenses inside a
//! transaction and hands the numbers here; this module decides the net
//! amount, the payout status, and whether a deficit must be carried forward.

use chrono::Datelike;
use rand::Rng;
use serde::Serialize;

use crate::status::PayoutStatus;
use crate::types::{Date, Money};

/// Prefix of every payout reference.
pub const REFERENCE_PREFIX: &str = "PO";

/// Number of random characters at the end of a reference.
pub const REFERENCE_SUFFIX_LENGTH: usize = 4;

/// How many fresh references to try before giving up on a collision.
pub const MAX_REFERENCE_ATTEMPTS: usize = 5;

/// Outcome of reconciling a cycle's rent against its expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settlement {
    pub total_rent: Money,
    pub total_expenses: Money,
    pub net_payout: Money,
    pub expense_count: usize,
}

impl Settlement {
    /// Reconcile `total_rent` against the given expense amounts.
    pub fn compute<I>(total_rent: Money, expense_amounts: I) -> Self
    where
        I: IntoIterator<Item = Money>,
    {
        let (total_expenses, expense_count) = expense_amounts
            .into_iter()
            .fold((Money::ZERO, 0usize), |(sum, n), amount| (sum + amount, n + 1));

        Self {
            total_rent,
            total_expenses,
            net_payout: total_rent - total_expenses,
            expense_count,
        }
    }

    /// A negative net is never paid out; it becomes a deficit instead.
    pub fn status(&self) -> PayoutStatus {
        if self.net_payout < Money::ZERO {
            PayoutStatus::DeficitCarriedForward
        } else {
            PayoutStatus::Pending
        }
    }

    /// Amount to carry into the next cycle as an approved expense, if any.
    pub fn deficit(&self) -> Option<Money> {
        (self.net_payout < Money::ZERO).then(|| self.net_payout.abs())
    }
}

/// Read-only payout preview for dashboards.
///
/// Uses every approved, unsettled expense regardless of cycle, so it is
/// broader than the closing calculation and must not be treated as
/// authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayoutPreview {
    pub rent: Money,
    pub expenses: Money,
    pub net_payout: Money,
    pub expense_count: usize,
}

impl From<Settlement> for PayoutPreview {
    fn from(s: Settlement) -> Self {
        Self {
            rent: s.total_rent,
            expenses: s.total_expenses,
            net_payout: s.net_payout,
            expense_count: s.expense_count,
        }
    }
}

/// Generate a human-readable reference such as `PO-2026-10-7QX2`.
pub fn generate_reference(today: Date) -> String {
    let suffix: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(REFERENCE_SUFFIX_LENGTH)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect();

    format!(
        "{REFERENCE_PREFIX}-{:04}-{:02}-{suffix}",
        today.year(),
        today.month()
    )
}
