//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for inserts and state transitions

pub mod expense;
pub mod lease;
pub mod payment;
pub mod payout;
pub mod property;
pub mod rent_cycle;
pub mod ticket;
