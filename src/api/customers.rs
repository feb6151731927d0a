//! Customer API endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::customer::{CreateCustomer, CustomerListResponse, CustomerQuery, CustomerResponse},
};

use super::{ApiJson, AuthenticatedUser};

/// List or search customers
#[utoipa::path(
    get,
    path = "/customers",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(CustomerQuery),
    responses(
        (status = 200, description = "Customer list", body = CustomerListResponse)
    )
)]
pub async fn list_customers(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<CustomerQuery>,
) -> AppResult<Json<CustomerListResponse>> {
    let customers = state.services.catalog.list_customers(query.query.as_deref()).await?;
    Ok(Json(CustomerListResponse { customers }))
}

/// Create a customer
#[utoipa::path(
    post,
    path = "/customers",
    tag = "catalog",
    security(("bearer_auth" = [])),
    request_body = CreateCustomer,
    responses(
        (status = 201, description = "Customer created", body = CustomerResponse),
        (status = 409, description = "Email already registered", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_customer(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    ApiJson(data): ApiJson<CreateCustomer>,
) -> AppResult<(StatusCode, Json<CustomerResponse>)> {
    let customer = state.services.catalog.create_customer(&data).await?;
    Ok((StatusCode::CREATED, Json(CustomerResponse { customer })))
}
