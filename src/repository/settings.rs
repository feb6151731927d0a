//! Shop settings repository

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::settings::{SaveShopSettings, ShopSettings},
};

#[derive(Clone)]
pub struct SettingsRepository {
    pool: Pool<Postgres>,
}

impl SettingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Most recently created settings row
    pub async fn current(&self) -> AppResult<Option<ShopSettings>> {
        let row = sqlx::query_as::<_, ShopSettings>(
            "SELECT * FROM shop_settings ORDER BY created_at DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update the current row, or insert the first one
    pub async fn save(&self, data: &SaveShopSettings) -> AppResult<ShopSettings> {
        let now = Utc::now();
        let updated = sqlx::query_as::<_, ShopSettings>(
            r#"
            UPDATE shop_settings
            SET shop_name = $1, shop_phone = $2, shop_email = $3, shop_address = $4,
                logo = $5, updated_at = $6
            WHERE id = (SELECT id FROM shop_settings ORDER BY created_at DESC LIMIT 1)
            RETURNING *
            "#,
        )
        .bind(data.shop_name.trim())
        .bind(&data.shop_phone)
        .bind(&data.shop_email)
        .bind(&data.shop_address)
        .bind(&data.logo)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = updated {
            return Ok(row);
        }

        let row = sqlx::query_as::<_, ShopSettings>(
            r#"
            INSERT INTO shop_settings (shop_name, shop_phone, shop_email, shop_address, logo, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING *
            "#,
        )
        .bind(data.shop_name.trim())
        .bind(&data.shop_phone)
        .bind(&data.shop_email)
        .bind(&data.shop_address)
        .bind(&data.logo)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
