//! Dashboard API endpoint

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::dashboard::{DashboardQuery, DashboardResponse},
};

use super::AuthenticatedUser;

/// Ticket counts and revenue over a trailing window
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "dashboard",
    security(("bearer_auth" = [])),
    params(DashboardQuery),
    responses(
        (status = 200, description = "Dashboard statistics", body = DashboardResponse),
        (status = 400, description = "Invalid time range", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_dashboard(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<DashboardResponse>> {
    let stats = state.services.dashboard.stats(query.time_range).await?;
    Ok(Json(DashboardResponse { stats }))
}
