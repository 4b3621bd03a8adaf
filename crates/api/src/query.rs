//! Shared query parameter types for API handlers.

use propdesk_core::types::Date;
use serde::Deserialize;

/// `?as_of=YYYY-MM-DD` for point-in-time projections. Defaults to today.
#[derive(Debug, Deserialize)]
pub struct AsOfParams {
    pub as_of: Option<Date>,
}
