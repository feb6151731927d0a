//! Repository layer for database operations

pub mod customers;
pub mod mechanics;
pub mod products;
pub mod settings;
pub mod tickets;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        comment::CommentEntry,
        enums::ServiceStatus,
        receipt::Receipt,
        ticket::{IntakeRecord, ServiceTicket, StatusChange, TicketFieldPatch, TicketIntake},
    },
};

/// Persistence operations the ticket workflow depends on.
///
/// Every write is a single statement or transaction; a failed call leaves the
/// stored ticket unchanged.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Tickets newest first, optionally restricted to one status
    async fn list(&self, status: Option<ServiceStatus>) -> AppResult<Vec<ServiceTicket>>;

    async fn get(&self, id: Uuid) -> AppResult<ServiceTicket>;

    /// Upsert the customer by email, then create the request and its ticket
    async fn create(&self, intake: &TicketIntake) -> AppResult<IntakeRecord>;

    /// Write status, timestamps and log entries in one transaction
    async fn apply_transition(&self, id: Uuid, change: &StatusChange) -> AppResult<ServiceTicket>;

    /// Append to the comment log, returning the whole log
    async fn append_comments(&self, id: Uuid, entries: &[CommentEntry]) -> AppResult<Vec<CommentEntry>>;

    async fn patch(&self, id: Uuid, fields: &TicketFieldPatch) -> AppResult<ServiceTicket>;

    /// Status move and field patch committed together, or not at all
    async fn apply_transition_with_fields(
        &self,
        id: Uuid,
        change: &StatusChange,
        fields: &TicketFieldPatch,
    ) -> AppResult<ServiceTicket>;

    /// Replace the embedded receipt snapshot
    async fn save_receipt(&self, id: Uuid, receipt: &Receipt) -> AppResult<ServiceTicket>;

    async fn list_created_since(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<ServiceTicket>>;
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub tickets: tickets::TicketsRepository,
    pub customers: customers::CustomersRepository,
    pub mechanics: mechanics::MechanicsRepository,
    pub products: products::ProductsRepository,
    pub settings: settings::SettingsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            tickets: tickets::TicketsRepository::new(pool.clone()),
            customers: customers::CustomersRepository::new(pool.clone()),
            mechanics: mechanics::MechanicsRepository::new(pool.clone()),
            products: products::ProductsRepository::new(pool.clone()),
            settings: settings::SettingsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round-trip to the database
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
