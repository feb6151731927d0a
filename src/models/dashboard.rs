//! Dashboard statistics model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Trailing window used when none is given
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct DashboardQuery {
    /// Trailing window in days (default 30)
    pub time_range: Option<i64>,
}

/// Counts by status and revenue figures over a window
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub todo_count: u64,
    pub in_progress_count: u64,
    pub waiting_for_parts_count: u64,
    pub done_count: u64,
    pub archived_count: u64,
    /// Tickets considered after the window filter
    pub total_count: u64,
    pub total_revenue: Decimal,
    pub estimated_revenue: Decimal,
    pub window_days: i64,
    pub generated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub stats: DashboardStats,
}
