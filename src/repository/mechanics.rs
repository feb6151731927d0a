//! Mechanics repository

use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::mechanic::Mechanic};

#[derive(Clone)]
pub struct MechanicsRepository {
    pool: Pool<Postgres>,
}

impl MechanicsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List mechanics by name, optionally filtered on the active flag
    pub async fn list(&self, active: Option<bool>) -> AppResult<Vec<Mechanic>> {
        let rows = match active {
            Some(active) => {
                sqlx::query_as::<_, Mechanic>("SELECT * FROM mechanics WHERE active = $1 ORDER BY name")
                    .bind(active)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_as::<_, Mechanic>("SELECT * FROM mechanics ORDER BY name")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(rows)
    }
}
