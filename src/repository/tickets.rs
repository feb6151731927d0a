//! Service tickets repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, PgConnection, Pool, Postgres};
use uuid::Uuid;

use super::TicketStore;
use crate::{
    error::{AppError, AppResult},
    models::{
        comment::{CommentEntry, StoredComment},
        customer::Customer,
        enums::ServiceStatus,
        receipt::Receipt,
        ticket::{
            IntakeRecord, ServiceRequest, ServiceTicket, StatusChange, TicketFieldPatch,
            TicketIntake, TicketRow,
        },
    },
};

/// Columns of `TicketRow`, selected from a ticket aliased `t`
const TICKET_COLUMNS: &str = r#"
    t.id, t.service_request_id, t.status, t.mechanic_id, t.completion_date,
    t.total_cost, t.comments, t.parts_used, t.receipt, t.created_at, t.updated_at,
    r.customer_id, r.equipment_brand, r.service_type, r.recipient, r.additional_details,
    c.name AS customer_name, c.email AS customer_email, c.phone AS customer_phone,
    c.marketing_consent AS customer_marketing_consent, c.created_at AS customer_created_at
"#;

const TICKET_JOINS: &str = r#"
    JOIN service_requests r ON r.id = t.service_request_id
    JOIN customers c ON c.id = r.customer_id
"#;

fn into_tickets(rows: Vec<TicketRow>) -> AppResult<Vec<ServiceTicket>> {
    rows.into_iter().map(ServiceTicket::try_from).collect()
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Service ticket {} not found", id))
}

#[derive(Clone)]
pub struct TicketsRepository {
    pool: Pool<Postgres>,
}

impl TicketsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn fetch_updated(&self, id: Uuid, builder: TicketRowQuery<'_>) -> AppResult<ServiceTicket> {
        let row = builder.fetch_optional(&self.pool).await?.ok_or_else(|| not_found(id))?;
        ServiceTicket::try_from(row)
    }
}

/// Status, timestamps and log entries of the ticket, plus the status of its
/// service request
async fn write_transition(conn: &mut PgConnection, id: Uuid, change: &StatusChange) -> AppResult<()> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        WITH t AS (
            UPDATE service_tickets
            SET status = $2,
                completion_date = COALESCE($3, completion_date),
                updated_at = $4,
                comments = comments || $5::jsonb
            WHERE id = $1
            RETURNING service_request_id
        )
        UPDATE service_requests r
        SET status = $2, updated_at = $4
        FROM t
        WHERE r.id = t.service_request_id
        RETURNING r.id
        "#,
    )
    .bind(id)
    .bind(change.status.as_str())
    .bind(change.completion_date)
    .bind(change.updated_at)
    .bind(Json(&change.entries))
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| not_found(id))?;
    Ok(())
}

async fn write_fields(
    conn: &mut PgConnection,
    id: Uuid,
    fields: &TicketFieldPatch,
    updated_at: DateTime<Utc>,
) -> AppResult<()> {
    let mut sets = vec!["updated_at = $2".to_string()];
    let mut idx = 3;

    macro_rules! add_field {
        ($field:expr, $name:expr) => {
            if $field.is_some() {
                sets.push(format!("{} = ${}", $name, idx));
                idx += 1;
            }
        };
    }

    add_field!(fields.mechanic_id, "mechanic_id");
    add_field!(fields.total_cost, "total_cost");
    add_field!(fields.completion_date, "completion_date");

    let query = format!(
        "UPDATE service_tickets SET {} WHERE id = $1 RETURNING service_request_id",
        sets.join(", ")
    );
    let mut builder = sqlx::query_scalar::<_, Uuid>(&query).bind(id).bind(updated_at);

    macro_rules! bind_field {
        ($field:expr) => {
            if let Some(ref val) = $field {
                builder = builder.bind(val);
            }
        };
    }

    bind_field!(fields.mechanic_id);
    bind_field!(fields.total_cost);
    bind_field!(fields.completion_date);

    let request_id = builder
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| not_found(id))?;

    if let Some(ref details) = fields.additional_details {
        sqlx::query(
            "UPDATE service_requests SET additional_details = $2, updated_at = $3 WHERE id = $1",
        )
        .bind(request_id)
        .bind(details)
        .bind(updated_at)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

type TicketRowQuery<'q> = sqlx::query::QueryAs<'q, Postgres, TicketRow, sqlx::postgres::PgArguments>;

#[async_trait]
impl TicketStore for TicketsRepository {
    async fn list(&self, status: Option<ServiceStatus>) -> AppResult<Vec<ServiceTicket>> {
        let where_clause = if status.is_some() { "WHERE t.status = $1" } else { "" };
        let query = format!(
            "SELECT {} FROM service_tickets t {} {} ORDER BY t.created_at DESC",
            TICKET_COLUMNS, TICKET_JOINS, where_clause
        );
        let mut builder = sqlx::query_as::<_, TicketRow>(&query);
        if let Some(status) = status {
            builder = builder.bind(status.as_str());
        }
        into_tickets(builder.fetch_all(&self.pool).await?)
    }

    async fn get(&self, id: Uuid) -> AppResult<ServiceTicket> {
        let query = format!(
            "SELECT {} FROM service_tickets t {} WHERE t.id = $1",
            TICKET_COLUMNS, TICKET_JOINS
        );
        let row = sqlx::query_as::<_, TicketRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))?;
        ServiceTicket::try_from(row)
    }

    async fn create(&self, intake: &TicketIntake) -> AppResult<IntakeRecord> {
        let mut tx = self.pool.begin().await?;

        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (name, email, phone, marketing_consent)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO UPDATE
                SET name = EXCLUDED.name,
                    phone = EXCLUDED.phone,
                    marketing_consent = EXCLUDED.marketing_consent
            RETURNING *
            "#,
        )
        .bind(intake.customer.name.trim())
        .bind(intake.customer.email.trim())
        .bind(intake.customer.phone.trim())
        .bind(intake.customer.marketing_consent)
        .fetch_one(&mut *tx)
        .await?;

        let request = &intake.service_request;
        let service_request = sqlx::query_as::<_, ServiceRequest>(
            r#"
            INSERT INTO service_requests
                (customer_id, equipment_brand, service_type, recipient, additional_details, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(customer.id)
        .bind(request.equipment_brand.trim())
        .bind(request.service_type.to_string())
        .bind(&request.recipient)
        .bind(&request.additional_details)
        .bind(ServiceStatus::Todo.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let ticket_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO service_tickets (service_request_id, status, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            RETURNING id
            "#,
        )
        .bind(service_request.id)
        .bind(ServiceStatus::Todo.as_str())
        .bind(service_request.created_at)
        .fetch_one(&mut *tx)
        .await?;

        let query = format!(
            "SELECT {} FROM service_tickets t {} WHERE t.id = $1",
            TICKET_COLUMNS, TICKET_JOINS
        );
        let row = sqlx::query_as::<_, TicketRow>(&query)
            .bind(ticket_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(IntakeRecord {
            ticket: ServiceTicket::try_from(row)?,
            service_request,
            customer,
        })
    }

    async fn apply_transition(&self, id: Uuid, change: &StatusChange) -> AppResult<ServiceTicket> {
        let mut tx = self.pool.begin().await?;
        write_transition(&mut *tx, id, change).await?;
        tx.commit().await?;
        self.get(id).await
    }

    async fn append_comments(&self, id: Uuid, entries: &[CommentEntry]) -> AppResult<Vec<CommentEntry>> {
        let (comments, created_at) = sqlx::query_as::<_, (Json<Vec<StoredComment>>, DateTime<Utc>)>(
            r#"
            UPDATE service_tickets
            SET comments = comments || $2::jsonb
            WHERE id = $1
            RETURNING comments, created_at
            "#,
        )
        .bind(id)
        .bind(Json(entries))
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found(id))?;

        Ok(comments.0.into_iter().map(|c| c.into_entry(created_at)).collect())
    }

    async fn patch(&self, id: Uuid, fields: &TicketFieldPatch) -> AppResult<ServiceTicket> {
        let mut tx = self.pool.begin().await?;
        write_fields(&mut *tx, id, fields, Utc::now()).await?;
        tx.commit().await?;
        self.get(id).await
    }

    async fn apply_transition_with_fields(
        &self,
        id: Uuid,
        change: &StatusChange,
        fields: &TicketFieldPatch,
    ) -> AppResult<ServiceTicket> {
        let mut tx = self.pool.begin().await?;
        write_transition(&mut *tx, id, change).await?;
        if !fields.is_empty() {
            write_fields(&mut *tx, id, fields, change.updated_at).await?;
        }
        tx.commit().await?;
        self.get(id).await
    }

    async fn save_receipt(&self, id: Uuid, receipt: &Receipt) -> AppResult<ServiceTicket> {
        let query = format!(
            r#"
            WITH t AS (
                UPDATE service_tickets
                SET receipt = $2, updated_at = $3
                WHERE id = $1
                RETURNING *
            )
            SELECT {} FROM t {}
            "#,
            TICKET_COLUMNS, TICKET_JOINS
        );
        let builder = sqlx::query_as::<_, TicketRow>(&query)
            .bind(id)
            .bind(Json(receipt))
            .bind(Utc::now());
        self.fetch_updated(id, builder).await
    }

    async fn list_created_since(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<ServiceTicket>> {
        let query = format!(
            "SELECT {} FROM service_tickets t {} WHERE t.created_at >= $1 ORDER BY t.created_at DESC",
            TICKET_COLUMNS, TICKET_JOINS
        );
        let rows = sqlx::query_as::<_, TicketRow>(&query)
            .bind(cutoff)
            .fetch_all(&self.pool)
            .await?;
        into_tickets(rows)
    }
}
