//! Shop settings model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::config::ShopConfig;

/// Shop identity; the most recently created row is the current one
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShopSettings {
    pub id: Uuid,
    pub shop_name: String,
    pub shop_phone: Option<String>,
    pub shop_email: Option<String>,
    pub shop_address: Option<String>,
    /// Base64 image payload, optionally a `data:` URL
    pub logo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `POST /settings` body
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveShopSettings {
    #[validate(length(min = 1, message = "Shop name is required"))]
    pub shop_name: String,
    pub shop_phone: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub shop_email: Option<String>,
    pub shop_address: Option<String>,
    pub logo: Option<String>,
}

/// What the receipt header and footer print
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShopIdentity {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl ShopIdentity {
    pub fn from_settings(settings: Option<ShopSettings>, defaults: &ShopConfig) -> Self {
        match settings {
            Some(s) => Self {
                name: s.shop_name,
                phone: s.shop_phone,
                email: s.shop_email,
                address: s.shop_address,
                logo: s.logo.filter(|l| !l.trim().is_empty()),
            },
            None => Self {
                name: defaults.default_name.clone(),
                phone: None,
                email: None,
                address: Some(defaults.default_address.clone()),
                logo: None,
            },
        }
    }
}
