//! Mechanics API endpoint

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::mechanic::{MechanicListResponse, MechanicQuery},
};

use super::AuthenticatedUser;

/// List mechanics
#[utoipa::path(
    get,
    path = "/mechanics",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(MechanicQuery),
    responses(
        (status = 200, description = "Mechanic list", body = MechanicListResponse)
    )
)]
pub async fn list_mechanics(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<MechanicQuery>,
) -> AppResult<Json<MechanicListResponse>> {
    let data = state.services.catalog.list_mechanics(query.active).await?;
    Ok(Json(MechanicListResponse { success: true, data }))
}
