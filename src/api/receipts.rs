//! Receipt API endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::receipt::{CustomReceiptQuery, GenerateReceiptQuery, SaveReceiptRequest, SaveReceiptResponse},
    receipt::ReceiptLayout,
};

use super::{ApiJson, AuthenticatedUser};

/// Store a receipt snapshot on a ticket, replacing any previous one
#[utoipa::path(
    post,
    path = "/service-tickets/receipt/save",
    tag = "receipts",
    security(("bearer_auth" = [])),
    request_body = SaveReceiptRequest,
    responses(
        (status = 200, description = "Receipt saved", body = SaveReceiptResponse),
        (status = 400, description = "Invalid line item", body = crate::error::ErrorResponse),
        (status = 404, description = "Ticket not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn save_receipt(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    ApiJson(request): ApiJson<SaveReceiptRequest>,
) -> AppResult<Json<SaveReceiptResponse>> {
    let ticket = state.services.receipts.save(&request).await?;
    Ok(Json(SaveReceiptResponse {
        success: true,
        message: "Receipt saved to ticket".to_string(),
        ticket,
    }))
}

/// Print layout built from query parameters (counter sales, reprints)
#[utoipa::path(
    get,
    path = "/receipt/custom",
    tag = "receipts",
    params(CustomReceiptQuery),
    responses(
        (status = 200, description = "Receipt print layout", body = ReceiptLayout)
    )
)]
pub async fn custom_receipt(
    State(state): State<crate::AppState>,
    Query(query): Query<CustomReceiptQuery>,
) -> Json<ReceiptLayout> {
    Json(state.services.receipts.render_custom(&query).await)
}

/// Print layout for a stored ticket
#[utoipa::path(
    get,
    path = "/receipt/generate",
    tag = "receipts",
    security(("bearer_auth" = [])),
    params(GenerateReceiptQuery),
    responses(
        (status = 200, description = "Receipt print layout", body = ReceiptLayout),
        (status = 404, description = "Ticket not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn generate_receipt(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<GenerateReceiptQuery>,
) -> AppResult<Json<ReceiptLayout>> {
    let layout = state.services.receipts.render_for_ticket(query.ticket_id).await?;
    Ok(Json(layout))
}
