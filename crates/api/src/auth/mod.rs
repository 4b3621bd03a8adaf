//! Authentication primitives.
//!
//! - [`jwt`] -- HS256 access-token generation and validation.
//!
//! Tokens are issued by the identity service; this crate only verifies them
//! and turns their claims into an explicit actor.

pub mod jwt;
