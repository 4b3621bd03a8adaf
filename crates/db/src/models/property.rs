//! Property directory models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use propdesk_core::types::{DbId, Timestamp};

/// A row from the `properties` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Property {
    pub id: DbId,
    pub landlord_id: DbId,
    pub name: String,
    pub address: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a property.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProperty {
    pub landlord_id: DbId,
    pub name: String,
    pub address: Option<String>,
}
