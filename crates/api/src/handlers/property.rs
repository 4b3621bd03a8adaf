//! Handlers for the property directory.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use propdesk_core::error::CoreError;
use propdesk_db::models::property::CreateProperty;
use propdesk_db::repositories::PropertyRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/properties
///
/// Register a property under a landlord. Admin only.
pub async fn create_property(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateProperty>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("Property name must not be empty".into()).into());
    }

    let property = PropertyRepo::create(&state.pool, &input).await?;

    tracing::info!(
        user_id = admin.user_id,
        property_id = property.id,
        landlord_id = property.landlord_id,
        "Property created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: property })))
}
