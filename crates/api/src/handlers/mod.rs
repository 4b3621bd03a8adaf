//! HTTP handlers, one module per resource.

pub mod expense;
pub mod landlord;
pub mod lease;
pub mod payout;
pub mod property;
pub mod rent_cycle;
pub mod ticket;

use propdesk_core::types::Date;

/// The server's current UTC date. Expense dates, reference months and
/// on-demand cycle windows are all derived from it.
pub(crate) fn today() -> Date {
    chrono::Utc::now().date_naive()
}
