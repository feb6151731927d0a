//! Product (inventory) model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Stock level below which a product is reported as low
pub const LOW_STOCK_THRESHOLD: i32 = 10;

/// Product record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub buy_in_price: Option<Decimal>,
    pub stock: i32,
    pub barcode: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        return Err(ValidationError::new("negative_amount"));
    }
    Ok(())
}

/// Create product request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[validate(custom(function = "non_negative"))]
    pub price: Decimal,
    pub buy_in_price: Option<Decimal>,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i32,
    pub barcode: Option<String>,
    pub description: Option<String>,
}

/// `PATCH /products` body
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    pub id: Uuid,
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub category: Option<String>,
    #[validate(custom(function = "non_negative"))]
    pub price: Option<Decimal>,
    pub buy_in_price: Option<Decimal>,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: Option<i32>,
    pub barcode: Option<String>,
    pub description: Option<String>,
}

/// Inventory listing filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct ProductQuery {
    /// Matches name, category or description
    pub query: Option<String>,
    pub category: Option<String>,
    /// Only products with stock below the low-stock threshold
    #[serde(default)]
    pub low_stock: bool,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ProductSearchQuery {
    /// Name or barcode fragment (at least two characters)
    pub q: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub product: Product,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductSearchResponse {
    pub success: bool,
    pub data: Vec<Product>,
}
