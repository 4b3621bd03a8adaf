//! Repository for the `properties` table.

use sqlx::PgPool;
use propdesk_core::types::DbId;

use crate::models::property::{CreateProperty, Property};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, landlord_id, name, address, created_at, updated_at";

/// Provides access to the property directory.
pub struct PropertyRepo;

impl PropertyRepo {
    /// Insert a new property, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProperty) -> Result<Property, sqlx::Error> {
        let query = format!(
            "INSERT INTO properties (landlord_id, name, address)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(input.landlord_id)
            .bind(&input.name)
            .bind(&input.address)
            .fetch_one(pool)
            .await
    }

    /// Find a property by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Property>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM properties WHERE id = $1");
        sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All properties owned by a landlord, oldest first.
    pub async fn list_by_landlord(
        pool: &PgPool,
        landlord_id: DbId,
    ) -> Result<Vec<Property>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM properties WHERE landlord_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(landlord_id)
            .fetch_all(pool)
            .await
    }
}
