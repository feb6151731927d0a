//! Settings endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::settings::{SaveShopSettings, ShopIdentity, ShopSettings},
};

use super::{ApiJson, AuthenticatedUser};

/// Settings response
#[derive(Serialize, ToSchema)]
pub struct SettingsResponse {
    /// Identity printed on receipts
    pub settings: ShopIdentity,
}

#[derive(Serialize, ToSchema)]
pub struct SaveSettingsResponse {
    pub success: bool,
    pub settings: ShopSettings,
}

/// Get current shop settings
#[utoipa::path(
    get,
    path = "/settings",
    tag = "settings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current shop settings", body = SettingsResponse)
    )
)]
pub async fn get_settings(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<SettingsResponse>> {
    let settings = state.services.settings.shop_identity().await?;
    Ok(Json(SettingsResponse { settings }))
}

/// Save shop settings (admin only)
#[utoipa::path(
    post,
    path = "/settings",
    tag = "settings",
    security(("bearer_auth" = [])),
    request_body = SaveShopSettings,
    responses(
        (status = 200, description = "Settings saved", body = SaveSettingsResponse),
        (status = 403, description = "Administrator privileges required", body = crate::error::ErrorResponse)
    )
)]
pub async fn save_settings(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiJson(data): ApiJson<SaveShopSettings>,
) -> AppResult<Json<SaveSettingsResponse>> {
    claims.require_admin()?;
    let settings = state.services.settings.save(&data).await?;
    Ok(Json(SaveSettingsResponse { success: true, settings }))
}
