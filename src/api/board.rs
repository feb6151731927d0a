//! Workshop board API endpoints

use axum::{extract::State, Json};

use crate::{
    board::{BoardView, MoveCardRequest, MoveCardResponse},
    error::AppResult,
    models::enums::ServiceStatus,
};

use super::{ApiJson, AuthenticatedUser};

/// Tickets grouped into the five status columns
#[utoipa::path(
    get,
    path = "/workshop/board",
    tag = "workshop",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Board columns", body = BoardView)
    )
)]
pub async fn get_board(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<BoardView>> {
    let board = state.services.workshop.board().await?;
    Ok(Json(board.view()))
}

/// Move a card to another column and return the reloaded board
#[utoipa::path(
    post,
    path = "/workshop/board/move",
    tag = "workshop",
    security(("bearer_auth" = [])),
    request_body = MoveCardRequest,
    responses(
        (status = 200, description = "Card moved", body = MoveCardResponse),
        (status = 400, description = "Invalid status value", body = crate::error::ErrorResponse),
        (status = 409, description = "Transition not allowed", body = crate::error::ErrorResponse)
    )
)]
pub async fn move_card(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ApiJson(request): ApiJson<MoveCardRequest>,
) -> AppResult<Json<MoveCardResponse>> {
    let to = request.to_status.trim().parse::<ServiceStatus>()?;
    let workshop = &state.services.workshop;
    let mut board = workshop.board().await?;
    let archived = board
        .drop_card(workshop, &request.ticket_id.to_string(), to, &claims.author_label())
        .await?;
    Ok(Json(MoveCardResponse {
        board: board.view(),
        archived,
    }))
}
