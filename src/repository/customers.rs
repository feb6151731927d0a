//! Customers repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::customer::{CreateCustomer, Customer},
};

#[derive(Clone)]
pub struct CustomersRepository {
    pool: Pool<Postgres>,
}

impl CustomersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List customers, newest first, optionally matching name, email or phone
    pub async fn list(&self, query: Option<&str>) -> AppResult<Vec<Customer>> {
        let rows = match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => {
                sqlx::query_as::<_, Customer>(
                    r#"
                    SELECT * FROM customers
                    WHERE name ILIKE $1 OR email ILIKE $1 OR phone ILIKE $1
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(format!("%{}%", q))
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Customer>("SELECT * FROM customers ORDER BY created_at DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(rows)
    }

    /// Create a customer; the email must not be taken
    pub async fn create(&self, data: &CreateCustomer) -> AppResult<Customer> {
        let existing: Option<i64> = sqlx::query_scalar("SELECT 1::bigint FROM customers WHERE email = $1")
            .bind(data.email.trim())
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict(format!(
                "A customer with email {} already exists",
                data.email.trim()
            )));
        }

        let row = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (name, email, phone, marketing_consent)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(data.name.trim())
        .bind(data.email.trim())
        .bind(data.phone.trim())
        .bind(data.marketing_consent)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
