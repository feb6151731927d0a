//! Product (inventory) API endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::product::{
        CreateProduct, ProductListResponse, ProductQuery, ProductResponse, ProductSearchQuery,
        ProductSearchResponse, UpdateProduct,
    },
};

use super::{ApiJson, AuthenticatedUser};

/// List products
#[utoipa::path(
    get,
    path = "/products",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(ProductQuery),
    responses(
        (status = 200, description = "Product list", body = ProductListResponse)
    )
)]
pub async fn list_products(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ProductListResponse>> {
    let products = state.services.catalog.list_products(&query).await?;
    Ok(Json(ProductListResponse { products }))
}

/// Quick search by name or barcode
#[utoipa::path(
    get,
    path = "/products/search",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(ProductSearchQuery),
    responses(
        (status = 200, description = "Up to ten matching products", body = ProductSearchResponse)
    )
)]
pub async fn search_products(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<ProductSearchQuery>,
) -> AppResult<Json<ProductSearchResponse>> {
    let data = state.services.catalog.search_products(query.q.as_deref()).await?;
    Ok(Json(ProductSearchResponse { success: true, data }))
}

/// Create a product
#[utoipa::path(
    post,
    path = "/products",
    tag = "catalog",
    security(("bearer_auth" = [])),
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = ProductResponse)
    )
)]
pub async fn create_product(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    ApiJson(data): ApiJson<CreateProduct>,
) -> AppResult<(StatusCode, Json<ProductResponse>)> {
    let product = state.services.catalog.create_product(&data).await?;
    Ok((StatusCode::CREATED, Json(ProductResponse { product })))
}

/// Update a product
#[utoipa::path(
    patch,
    path = "/products",
    tag = "catalog",
    security(("bearer_auth" = [])),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 404, description = "Product not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_product(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    ApiJson(data): ApiJson<UpdateProduct>,
) -> AppResult<Json<ProductResponse>> {
    let product = state.services.catalog.update_product(&data).await?;
    Ok(Json(ProductResponse { product }))
}
