//! Service request and service ticket models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::{
    comment::{CommentEntry, ServiceDetails, StoredComment},
    customer::{CreateCustomer, Customer},
    enums::{ServiceStatus, ServiceType},
    receipt::Receipt,
};
use crate::error::AppError;

/// Intake record a ticket is derived from
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub equipment_brand: String,
    pub service_type: String,
    pub recipient: String,
    pub additional_details: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Part recorded against a ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PartUsed {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub price: Decimal,
}

/// Service ticket with its request and customer
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceTicket {
    pub id: Uuid,
    pub service_request_id: Uuid,
    pub customer_id: Uuid,
    pub customer: Customer,
    pub equipment_brand: String,
    pub service_type: ServiceType,
    pub recipient: String,
    pub additional_details: String,
    pub status: ServiceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub mechanic_id: Option<Uuid>,
    /// Set the first time the ticket reaches done
    pub completion_date: Option<DateTime<Utc>>,
    pub total_cost: Option<Decimal>,
    pub comments: Vec<CommentEntry>,
    pub parts_used: Vec<PartUsed>,
    pub receipt: Option<Receipt>,
}

impl ServiceTicket {
    /// Revenue attributed to the ticket: receipt total, else flat total cost
    pub fn revenue(&self) -> Decimal {
        self.receipt
            .as_ref()
            .map(|r| r.total_amount)
            .filter(|total| !total.is_zero())
            .or(self.total_cost)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Flat row of the ticket / request / customer join
#[derive(Debug, Clone, FromRow)]
pub struct TicketRow {
    pub id: Uuid,
    pub service_request_id: Uuid,
    pub status: String,
    pub mechanic_id: Option<Uuid>,
    pub completion_date: Option<DateTime<Utc>>,
    pub total_cost: Option<Decimal>,
    pub comments: Json<Vec<StoredComment>>,
    pub parts_used: Option<Json<Vec<PartUsed>>>,
    pub receipt: Option<Json<Receipt>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub customer_id: Uuid,
    pub equipment_brand: String,
    pub service_type: String,
    pub recipient: String,
    pub additional_details: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_marketing_consent: bool,
    pub customer_created_at: DateTime<Utc>,
}

impl TryFrom<TicketRow> for ServiceTicket {
    type Error = AppError;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<ServiceStatus>().map_err(|_| {
            AppError::Internal(format!("Ticket {} has unknown status '{}'", row.id, row.status))
        })?;
        let service_type = row.service_type.parse::<ServiceType>().unwrap_or(ServiceType::Other);
        let created_at = row.created_at;

        Ok(ServiceTicket {
            id: row.id,
            service_request_id: row.service_request_id,
            customer_id: row.customer_id,
            customer: Customer {
                id: row.customer_id,
                name: row.customer_name,
                email: row.customer_email,
                phone: row.customer_phone,
                marketing_consent: row.customer_marketing_consent,
                created_at: row.customer_created_at,
            },
            equipment_brand: row.equipment_brand,
            service_type,
            recipient: row.recipient,
            additional_details: row.additional_details,
            status,
            created_at,
            updated_at: row.updated_at,
            mechanic_id: row.mechanic_id,
            completion_date: row.completion_date,
            total_cost: row.total_cost,
            comments: row
                .comments
                .0
                .into_iter()
                .map(|c| c.into_entry(created_at))
                .collect(),
            parts_used: row.parts_used.map(|p| p.0).unwrap_or_default(),
            receipt: row.receipt.map(|r| r.0),
        })
    }
}

// ---------------------------------------------------------------------------
// Intake
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequestIntake {
    #[validate(length(min = 1, message = "Equipment brand is required"))]
    pub equipment_brand: String,
    pub service_type: ServiceType,
    #[serde(default = "default_recipient")]
    pub recipient: String,
    #[serde(default)]
    pub additional_details: String,
}

fn default_recipient() -> String {
    "Self".to_string()
}

/// `POST /service-tickets` body
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketIntake {
    #[validate(nested)]
    pub customer: CreateCustomer,
    #[validate(nested)]
    pub service_request: ServiceRequestIntake,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IntakeRecord {
    pub ticket: ServiceTicket,
    pub service_request: ServiceRequest,
    pub customer: Customer,
}

// ---------------------------------------------------------------------------
// Status and field updates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdates {
    /// One of todo, in-progress, waiting-for-parts, done, archived
    pub status: String,
    /// Completion time to record when moving to done (defaults to now)
    pub completion_date: Option<DateTime<Utc>>,
    /// Free-text note appended after the audit entry
    pub new_comment: Option<String>,
    /// Column the caller believes the ticket is in
    pub from_status: Option<String>,
}

/// `POST /service-tickets/update-status` body
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub ticket_id: Uuid,
    pub updates: StatusUpdates,
}

/// Allow-listed ticket fields for the generic update
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TicketPatch {
    pub status: Option<String>,
    #[serde(rename = "mechanic_id", alias = "mechanicId")]
    pub mechanic_id: Option<Uuid>,
    pub additional_details: Option<String>,
    pub total_cost: Option<Decimal>,
    pub completion_date: Option<DateTime<Utc>>,
}

impl TicketPatch {
    /// Everything except the status, which goes through the state machine
    pub fn fields(&self) -> TicketFieldPatch {
        TicketFieldPatch {
            mechanic_id: self.mechanic_id,
            additional_details: self.additional_details.clone(),
            total_cost: self.total_cost,
            completion_date: self.completion_date,
        }
    }
}

/// `POST /service-tickets/update` body
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketRequest {
    pub ticket_id: Uuid,
    pub updates: TicketPatch,
}

/// Non-status columns written by the generic update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketFieldPatch {
    pub mechanic_id: Option<Uuid>,
    pub additional_details: Option<String>,
    pub total_cost: Option<Decimal>,
    pub completion_date: Option<DateTime<Utc>>,
}

impl TicketFieldPatch {
    pub fn is_empty(&self) -> bool {
        self.mechanic_id.is_none()
            && self.additional_details.is_none()
            && self.total_cost.is_none()
            && self.completion_date.is_none()
    }
}

/// Everything a status transition writes, in one update
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub status: ServiceStatus,
    /// Only set when moving to done
    pub completion_date: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    /// Audit entry first, then any note
    pub entries: Vec<CommentEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TicketUpdateResponse {
    pub message: String,
    pub ticket: ServiceTicket,
    /// True when the ticket was just archived
    pub archived: bool,
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

/// `POST /service-tickets/comment` body
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub ticket_id: Uuid,
    pub comment: String,
}

/// `POST /service-tickets/service-details` body
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDetailsRequest {
    pub ticket_id: Uuid,
    pub details: ServiceDetails,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommentResponse {
    pub success: bool,
    pub message: String,
    pub comments: Vec<CommentEntry>,
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct TicketQuery {
    /// Only tickets in this status
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TicketListResponse {
    pub tickets: Vec<ServiceTicket>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TicketResponse {
    pub ticket: ServiceTicket,
}
