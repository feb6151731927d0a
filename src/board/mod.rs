//! Workshop kanban board
//!
//! Tickets are laid out in the five status columns. Moving a card between
//! columns is optimistic: the board changes immediately, a placeholder card
//! stands in at the destination, and the move is either committed by
//! reloading every ticket or rolled back to the snapshot taken before it.
//! A saved move whose reload fails keeps the optimistic layout.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{ServiceStatus, ServiceType},
        ticket::ServiceTicket,
    },
};

/// Prefix of placeholder card ids
pub const PLACEHOLDER_PREFIX: &str = "temp-";

/// What the board needs from the ticket workflow
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransitionGateway: Send + Sync {
    /// Persist a status move; `Ok(true)` when the ticket was archived
    async fn move_ticket(
        &self,
        ticket_id: Uuid,
        from: ServiceStatus,
        to: ServiceStatus,
        author: &str,
    ) -> AppResult<bool>;

    /// Every ticket, authoritative
    async fn fetch_all(&self) -> AppResult<Vec<ServiceTicket>>;
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoardCard {
    /// Ticket id, or `temp-<millis>` for a card whose move is in flight
    pub id: String,
    pub customer_name: String,
    pub equipment_brand: String,
    pub service_type: ServiceType,
    pub status: ServiceStatus,
    pub created_at: DateTime<Utc>,
    pub comment_count: usize,
    pub pending: bool,
}

impl From<&ServiceTicket> for BoardCard {
    fn from(ticket: &ServiceTicket) -> Self {
        Self {
            id: ticket.id.to_string(),
            customer_name: ticket.customer.name.clone(),
            equipment_brand: ticket.equipment_brand.clone(),
            service_type: ticket.service_type,
            status: ticket.status,
            created_at: ticket.created_at,
            comment_count: ticket.comments.len(),
            pending: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoardColumn {
    pub status: ServiceStatus,
    pub title: String,
    pub cards: Vec<BoardCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BoardView {
    pub columns: Vec<BoardColumn>,
}

/// `POST /workshop/board/move` body
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoveCardRequest {
    pub ticket_id: Uuid,
    pub to_status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MoveCardResponse {
    pub board: BoardView,
    pub archived: bool,
}

type Columns = IndexMap<ServiceStatus, Vec<BoardCard>>;

/// An applied, not yet settled, move between columns
#[derive(Debug, Clone)]
pub struct MoveCommand {
    pub ticket_id: Uuid,
    pub from: ServiceStatus,
    pub to: ServiceStatus,
    pub placeholder_id: String,
    snapshot: Columns,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    columns: Columns,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            columns: ServiceStatus::ALL.into_iter().map(|s| (s, Vec::new())).collect(),
        }
    }
}

impl Board {
    /// Cards keep the order of `tickets` within each column
    pub fn from_tickets(tickets: &[ServiceTicket]) -> Self {
        let mut board = Self::default();
        for ticket in tickets {
            if let Some(column) = board.columns.get_mut(&ticket.status) {
                column.push(BoardCard::from(ticket));
            }
        }
        board
    }

    pub fn column(&self, status: ServiceStatus) -> &[BoardCard] {
        self.columns.get(&status).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn card_count(&self) -> usize {
        self.columns.values().map(Vec::len).sum()
    }

    fn locate(&self, card_id: &str) -> Option<(ServiceStatus, usize)> {
        self.columns.iter().find_map(|(status, cards)| {
            cards.iter().position(|c| c.id == card_id).map(|i| (*status, i))
        })
    }

    /// Reorder within one column. Never touches the store.
    pub fn reorder(&mut self, status: ServiceStatus, from: usize, to: usize) -> bool {
        let Some(cards) = self.columns.get_mut(&status) else {
            return false;
        };
        if from >= cards.len() || to >= cards.len() {
            return false;
        }
        let card = cards.remove(from);
        cards.insert(to, card);
        true
    }

    /// Apply a move optimistically and return the command that settles it
    pub fn begin_move(&mut self, card_id: &str, to: ServiceStatus) -> AppResult<MoveCommand> {
        if card_id.starts_with(PLACEHOLDER_PREFIX) {
            return Err(AppError::Conflict(
                "Card is still being moved".to_string(),
            ));
        }
        let ticket_id = Uuid::parse_str(card_id)
            .map_err(|_| AppError::BadRequest(format!("Invalid card id: {}", card_id)))?;
        let (from, index) = self
            .locate(card_id)
            .ok_or_else(|| AppError::NotFound(format!("Card {} is not on the board", card_id)))?;
        if from == to {
            return Err(AppError::BadRequest(
                "Card is already in that column; reorder it instead".to_string(),
            ));
        }

        let snapshot = self.columns.clone();
        let placeholder_id = format!("{}{}", PLACEHOLDER_PREFIX, Utc::now().timestamp_millis());

        let mut card = match self.columns.get_mut(&from) {
            Some(cards) => cards.remove(index),
            None => return Err(AppError::Internal(format!("Column {} missing", from))),
        };
        card.id = placeholder_id.clone();
        card.status = to;
        card.pending = true;
        self.columns.entry(to).or_default().push(card);

        Ok(MoveCommand {
            ticket_id,
            from,
            to,
            placeholder_id,
            snapshot,
        })
    }

    /// Settle a move: rebuild from the reload on success, restore the snapshot on failure
    pub fn finish_move(&mut self, command: MoveCommand, outcome: AppResult<Vec<ServiceTicket>>) -> AppResult<()> {
        match outcome {
            Ok(tickets) => {
                *self = Board::from_tickets(&tickets);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    "Rolling back move of ticket {} from {} to {}: {}",
                    command.ticket_id,
                    command.from,
                    command.to,
                    e
                );
                self.columns = command.snapshot;
                Err(e)
            }
        }
    }

    /// Keep the optimistic layout once the move is saved, swapping the placeholder for the real card
    pub fn confirm_move(&mut self, command: &MoveCommand) {
        let card = self
            .columns
            .get_mut(&command.to)
            .and_then(|cards| cards.iter_mut().find(|c| c.id == command.placeholder_id));
        if let Some(card) = card {
            card.id = command.ticket_id.to_string();
            card.pending = false;
        }
    }

    /// Full drag-and-drop protocol against a gateway. Returns whether the ticket was archived.
    ///
    /// Only a failed move rolls back. When the move is saved but the reload
    /// fails, the optimistic board stands.
    pub async fn drop_card<G>(&mut self, gateway: &G, card_id: &str, to: ServiceStatus, author: &str) -> AppResult<bool>
    where
        G: TransitionGateway + ?Sized,
    {
        let command = self.begin_move(card_id, to)?;
        let archived = match gateway.move_ticket(command.ticket_id, command.from, command.to, author).await {
            Ok(archived) => archived,
            Err(e) => return self.finish_move(command, Err(e)).map(|()| false),
        };
        match gateway.fetch_all().await {
            Ok(tickets) => self.finish_move(command, Ok(tickets))?,
            Err(e) => {
                tracing::warn!(
                    "Ticket {} moved to {} but the board reload failed: {}",
                    command.ticket_id,
                    command.to,
                    e
                );
                self.confirm_move(&command);
            }
        }
        Ok(archived)
    }

    pub fn view(&self) -> BoardView {
        BoardView {
            columns: self
                .columns
                .iter()
                .map(|(status, cards)| BoardColumn {
                    status: *status,
                    title: status.title().to_string(),
                    cards: cards.clone(),
                })
                .collect(),
        }
    }
}
