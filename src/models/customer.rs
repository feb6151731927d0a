//! Customer model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Customer record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    /// Unique; intake updates the existing customer with the same email
    pub email: String,
    pub phone: String,
    pub marketing_consent: bool,
    pub created_at: DateTime<Utc>,
}

/// Customer details captured at intake or from the customer page
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomer {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
    #[serde(default)]
    pub marketing_consent: bool,
}

/// Customer search
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct CustomerQuery {
    /// Matches name, email or phone (case-insensitive)
    pub query: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerListResponse {
    pub customers: Vec<Customer>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerResponse {
    pub customer: Customer,
}
