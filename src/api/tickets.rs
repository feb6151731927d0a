//! Service ticket API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::ticket::{
        CommentRequest, CommentResponse, IntakeRecord, ServiceDetailsRequest, TicketIntake,
        TicketListResponse, TicketQuery, TicketResponse, TicketUpdateResponse, UpdateStatusRequest,
        UpdateTicketRequest,
    },
    services::workshop::TransitionOutcome,
};

use super::{ApiJson, AuthenticatedUser};

fn update_response(outcome: TransitionOutcome, message: &str) -> TicketUpdateResponse {
    TicketUpdateResponse {
        message: message.to_string(),
        ticket: outcome.ticket,
        archived: outcome.archived,
    }
}

/// List service tickets, newest first
#[utoipa::path(
    get,
    path = "/service-tickets",
    tag = "service-tickets",
    security(("bearer_auth" = [])),
    params(TicketQuery),
    responses(
        (status = 200, description = "Ticket list", body = TicketListResponse),
        (status = 400, description = "Unknown status filter", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_tickets(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<TicketQuery>,
) -> AppResult<Json<TicketListResponse>> {
    let tickets = state.services.workshop.list(query.status.as_deref()).await?;
    Ok(Json(TicketListResponse { tickets }))
}

/// Intake: customer, service request and ticket in one call
#[utoipa::path(
    post,
    path = "/service-tickets",
    tag = "service-tickets",
    security(("bearer_auth" = [])),
    request_body = TicketIntake,
    responses(
        (status = 201, description = "Ticket created", body = IntakeRecord),
        (status = 400, description = "Invalid intake data", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_ticket(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    ApiJson(intake): ApiJson<TicketIntake>,
) -> AppResult<(StatusCode, Json<IntakeRecord>)> {
    let record = state.services.workshop.intake(&intake).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Get one ticket with its customer
#[utoipa::path(
    get,
    path = "/service-tickets/{id}",
    tag = "service-tickets",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Ticket ID")),
    responses(
        (status = 200, description = "Ticket details", body = TicketResponse),
        (status = 404, description = "Ticket not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_ticket(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<TicketResponse>> {
    let ticket = state.services.workshop.get(id).await?;
    Ok(Json(TicketResponse { ticket }))
}

/// Move a ticket to another status column
#[utoipa::path(
    post,
    path = "/service-tickets/update-status",
    tag = "service-tickets",
    security(("bearer_auth" = [])),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = TicketUpdateResponse),
        (status = 400, description = "Invalid status value", body = crate::error::ErrorResponse),
        (status = 409, description = "Transition not allowed", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiJson(request): ApiJson<UpdateStatusRequest>,
) -> AppResult<Json<TicketUpdateResponse>> {
    let outcome = state
        .services
        .workshop
        .transition(request.ticket_id, &request.updates, &claims.author_label())
        .await?;
    Ok(Json(update_response(outcome, "Status updated successfully")))
}

/// Patch allow-listed ticket fields
#[utoipa::path(
    post,
    path = "/service-tickets/update",
    tag = "service-tickets",
    security(("bearer_auth" = [])),
    request_body = UpdateTicketRequest,
    responses(
        (status = 200, description = "Ticket updated", body = TicketUpdateResponse),
        (status = 400, description = "Unknown or invalid field", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_ticket(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiJson(request): ApiJson<UpdateTicketRequest>,
) -> AppResult<Json<TicketUpdateResponse>> {
    let outcome = state
        .services
        .workshop
        .update(request.ticket_id, &request.updates, &claims.author_label())
        .await?;
    Ok(Json(update_response(outcome, "Ticket updated successfully")))
}

/// Append a free-text comment
#[utoipa::path(
    post,
    path = "/service-tickets/comment",
    tag = "service-tickets",
    security(("bearer_auth" = [])),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Comment added", body = CommentResponse)
    )
)]
pub async fn add_comment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiJson(request): ApiJson<CommentRequest>,
) -> AppResult<Json<CommentResponse>> {
    let comments = state
        .services
        .workshop
        .add_comment(request.ticket_id, &request.comment, &claims.author_label())
        .await?;
    Ok(Json(CommentResponse {
        success: true,
        message: "Comment added successfully".to_string(),
        comments,
    }))
}

/// Append a structured completed-work record
#[utoipa::path(
    post,
    path = "/service-tickets/service-details",
    tag = "service-tickets",
    security(("bearer_auth" = [])),
    request_body = ServiceDetailsRequest,
    responses(
        (status = 200, description = "Service details added", body = CommentResponse)
    )
)]
pub async fn add_service_details(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiJson(request): ApiJson<ServiceDetailsRequest>,
) -> AppResult<Json<CommentResponse>> {
    let comments = state
        .services
        .workshop
        .add_service_details(request.ticket_id, request.details, &claims.author_label())
        .await?;
    Ok(Json(CommentResponse {
        success: true,
        message: "Service details added successfully".to_string(),
        comments,
    }))
}
