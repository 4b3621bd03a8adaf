//! Domain layer of the PropDesk settlement engine.
//!
//! Everything here is pure: closed status enumerations, state-machine
//! transition rules, money aggregation, and authorization policy. The
//! `propdesk-db` crate applies these rules inside transactions and the
//! `propdesk-api` crate exposes them over HTTP.

pub mod access;
pub mod error;
pub mod expense;
pub mod lease;
pub mod payout;
pub mod rent_cycle;
pub mod roles;
pub mod status;
pub mod tenant_financials;
pub mod ticket;
pub mod types;
