//! Ticket workflow: intake, status moves and the comment log

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::{
    board::{Board, TransitionGateway},
    error::{AppError, AppResult},
    models::{
        comment::{CommentEntry, ServiceDetails},
        enums::ServiceStatus,
        ticket::{
            IntakeRecord, ServiceTicket, StatusChange, StatusUpdates, TicketIntake, TicketPatch,
        },
    },
    repository::TicketStore,
};

/// Result of a status move
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    pub ticket: ServiceTicket,
    /// The move archived the ticket
    pub archived: bool,
}

fn parse_status(raw: &str) -> AppResult<ServiceStatus> {
    raw.trim().parse::<ServiceStatus>()
}

fn check_completion_date(status: ServiceStatus) -> AppResult<()> {
    if status.is_completed() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "completionDate can only be set on done or archived tickets (ticket is {})",
            status
        )))
    }
}

fn non_empty(text: Option<&str>) -> Option<String> {
    text.map(str::trim).filter(|t| !t.is_empty()).map(str::to_string)
}

#[derive(Clone)]
pub struct WorkshopService {
    store: Arc<dyn TicketStore>,
}

impl WorkshopService {
    pub fn new(store: Arc<dyn TicketStore>) -> Self {
        Self { store }
    }

    /// List tickets, newest first
    pub async fn list(&self, status: Option<&str>) -> AppResult<Vec<ServiceTicket>> {
        let status = match status.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(parse_status(raw)?),
            None => None,
        };
        self.store.list(status).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<ServiceTicket> {
        self.store.get(id).await
    }

    /// Create customer (or update the one with the same email), request and ticket
    pub async fn intake(&self, intake: &TicketIntake) -> AppResult<IntakeRecord> {
        intake.validate()?;
        let record = self.store.create(intake).await.map_err(|e| {
            tracing::error!("Ticket intake failed for {}: {}", intake.customer.email, e);
            e
        })?;
        tracing::info!(
            "Created ticket {} for customer {} ({})",
            record.ticket.id,
            record.customer.id,
            record.customer.name
        );
        Ok(record)
    }

    /// Move a ticket to another status.
    ///
    /// The target is parsed before anything is read or written. One audit
    /// entry is always appended, followed by the optional note.
    pub async fn transition(&self, id: Uuid, updates: &StatusUpdates, author: &str) -> AppResult<TransitionOutcome> {
        let to = parse_status(&updates.status)?;
        let from = match updates.from_status.as_deref() {
            Some(raw) => Some(parse_status(raw)?),
            None => None,
        };
        self.move_to(
            id,
            from,
            to,
            updates.completion_date,
            non_empty(updates.new_comment.as_deref()),
            author,
        )
        .await
    }

    /// Check the move against the stored ticket and build what it writes
    async fn plan_move(
        &self,
        id: Uuid,
        expected_from: Option<ServiceStatus>,
        to: ServiceStatus,
        completion_override: Option<DateTime<Utc>>,
        note: Option<String>,
        author: &str,
    ) -> AppResult<(ServiceStatus, StatusChange)> {
        let current = self.store.get(id).await?;
        if let Some(expected) = expected_from {
            if expected != current.status {
                tracing::warn!(
                    "Ticket {} is {} but the caller moved it from {}",
                    id,
                    current.status,
                    expected
                );
            }
        }
        current.status.check_transition(to)?;

        let now = Utc::now();
        let completion_date = (to == ServiceStatus::Done).then(|| completion_override.unwrap_or(now));
        let mut entries = vec![CommentEntry::status_change(to, author, now)];
        if let Some(note) = note {
            entries.push(CommentEntry::free_text(note, author, now));
        }
        let change = StatusChange {
            status: to,
            completion_date,
            updated_at: completion_date.unwrap_or(now),
            entries,
        };
        Ok((current.status, change))
    }

    async fn move_to(
        &self,
        id: Uuid,
        expected_from: Option<ServiceStatus>,
        to: ServiceStatus,
        completion_override: Option<DateTime<Utc>>,
        note: Option<String>,
        author: &str,
    ) -> AppResult<TransitionOutcome> {
        let (from, change) = self
            .plan_move(id, expected_from, to, completion_override, note, author)
            .await?;

        let ticket = self.store.apply_transition(id, &change).await.map_err(|e| {
            tracing::error!("Failed to move ticket {} to {}: {}", id, to, e);
            e
        })?;
        tracing::info!("{} moved ticket {} from {} to {}", author, id, from, to);

        Ok(TransitionOutcome {
            ticket,
            archived: to == ServiceStatus::Archived,
        })
    }

    /// Apply an allow-listed patch.
    ///
    /// A status in the patch goes through the state machine and is committed
    /// together with the other fields. A completion date is only accepted
    /// for a ticket that is, or ends up, done or archived.
    pub async fn update(&self, id: Uuid, patch: &TicketPatch, author: &str) -> AppResult<TransitionOutcome> {
        let status = match patch.status.as_deref() {
            Some(raw) => Some(parse_status(raw)?),
            None => None,
        };
        let fields = patch.fields();
        if status.is_none() && fields.is_empty() {
            return Err(AppError::BadRequest("No fields to update".to_string()));
        }
        if matches!(fields.total_cost, Some(cost) if cost.is_sign_negative() && !cost.is_zero()) {
            return Err(AppError::Validation("Total cost cannot be negative".to_string()));
        }

        let Some(to) = status else {
            if fields.completion_date.is_some() {
                check_completion_date(self.store.get(id).await?.status)?;
            }
            let ticket = self.store.patch(id, &fields).await.map_err(|e| {
                tracing::error!("Failed to update ticket {}: {}", id, e);
                e
            })?;
            tracing::info!("{} updated ticket {}", author, id);
            return Ok(TransitionOutcome {
                ticket,
                archived: false,
            });
        };

        if fields.completion_date.is_some() {
            check_completion_date(to)?;
        }
        if fields.is_empty() {
            return self.move_to(id, None, to, None, None, author).await;
        }

        let (from, change) = self
            .plan_move(id, None, to, fields.completion_date, None, author)
            .await?;
        let ticket = self
            .store
            .apply_transition_with_fields(id, &change, &fields)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update ticket {}: {}", id, e);
                e
            })?;
        tracing::info!("{} moved ticket {} from {} to {} and updated it", author, id, from, to);

        Ok(TransitionOutcome {
            ticket,
            archived: to == ServiceStatus::Archived,
        })
    }

    /// Append a free-text comment
    pub async fn add_comment(&self, id: Uuid, text: &str, author: &str) -> AppResult<Vec<CommentEntry>> {
        let text = non_empty(Some(text))
            .ok_or_else(|| AppError::Validation("Comment cannot be empty".to_string()))?;
        let entry = CommentEntry::free_text(text, author, Utc::now());
        self.append(id, entry).await
    }

    /// Append a completed-work breakdown
    pub async fn add_service_details(
        &self,
        id: Uuid,
        details: ServiceDetails,
        author: &str,
    ) -> AppResult<Vec<CommentEntry>> {
        if details.items.is_empty() && details.notes.is_none() {
            return Err(AppError::Validation(
                "Service details need at least one item or a note".to_string(),
            ));
        }
        let entry = CommentEntry::service_detail(details, author, Utc::now());
        self.append(id, entry).await
    }

    async fn append(&self, id: Uuid, entry: CommentEntry) -> AppResult<Vec<CommentEntry>> {
        let comments = self
            .store
            .append_comments(id, std::slice::from_ref(&entry))
            .await
            .map_err(|e| {
                tracing::error!("Failed to append comment to ticket {}: {}", id, e);
                e
            })?;
        tracing::info!("{} commented on ticket {}", entry.author, id);
        Ok(comments)
    }

    /// Current board, built from every ticket
    pub async fn board(&self) -> AppResult<Board> {
        Ok(Board::from_tickets(&self.store.list(None).await?))
    }
}

#[async_trait]
impl TransitionGateway for WorkshopService {
    async fn move_ticket(
        &self,
        ticket_id: Uuid,
        from: ServiceStatus,
        to: ServiceStatus,
        author: &str,
    ) -> AppResult<bool> {
        let outcome = self.move_to(ticket_id, Some(from), to, None, None, author).await?;
        Ok(outcome.archived)
    }

    async fn fetch_all(&self) -> AppResult<Vec<ServiceTicket>> {
        self.store.list(None).await
    }
}
