//! Mechanic model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Mechanic record (referenced by tickets and receipts)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Mechanic {
    pub id: Uuid,
    pub name: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct MechanicQuery {
    /// `true` lists active mechanics only, `false` inactive only
    pub active: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MechanicListResponse {
    pub success: bool,
    pub data: Vec<Mechanic>,
}
