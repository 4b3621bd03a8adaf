//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Plain reads and inserts return
//! `sqlx::Error`; engine operations return [`RepoResult`](crate::error::RepoResult)
//! and run inside their own transaction.

pub mod expense_repo;
pub mod lease_repo;
pub mod payment_repo;
pub mod payout_repo;
pub mod property_repo;
pub mod rent_cycle_repo;
pub mod ticket_repo;

pub use expense_repo::ExpenseRepo;
pub use lease_repo::LeaseRepo;
pub use payment_repo::PaymentRepo;
pub use payout_repo::PayoutRepo;
pub use property_repo::PropertyRepo;
pub use rent_cycle_repo::RentCycleRepo;
pub use ticket_repo::TicketRepo;
