//! Products (inventory) repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::product::{CreateProduct, Product, ProductQuery, UpdateProduct, LOW_STOCK_THRESHOLD},
};

/// Upper bound on quick-search results
pub const SEARCH_LIMIT: i64 = 10;

#[derive(Clone)]
pub struct ProductsRepository {
    pool: Pool<Postgres>,
}

impl ProductsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List products by name with optional filters
    pub async fn list(&self, query: &ProductQuery) -> AppResult<Vec<Product>> {
        let text = query.query.as_deref().map(str::trim).filter(|q| !q.is_empty());
        let category = query.category.as_deref().map(str::trim).filter(|c| !c.is_empty());

        let mut conditions = Vec::new();
        let mut idx = 1;

        if text.is_some() {
            conditions.push(format!(
                "(name ILIKE ${0} OR category ILIKE ${0} OR description ILIKE ${0})",
                idx
            ));
            idx += 1;
        }
        if category.is_some() {
            conditions.push(format!("category = ${}", idx));
            idx += 1;
        }
        if query.low_stock {
            conditions.push(format!("stock < ${}", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let select_q = format!("SELECT * FROM products {} ORDER BY name", where_clause);
        let mut builder = sqlx::query_as::<_, Product>(&select_q);
        if let Some(t) = text { builder = builder.bind(format!("%{}%", t)); }
        if let Some(c) = category { builder = builder.bind(c); }
        if query.low_stock { builder = builder.bind(LOW_STOCK_THRESHOLD); }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Product> {
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))
    }

    /// Name or barcode match, at most `SEARCH_LIMIT` rows
    pub async fn search(&self, term: &str) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE name ILIKE $1 OR barcode ILIKE $1
            ORDER BY name
            LIMIT $2
            "#,
        )
        .bind(format!("%{}%", term))
        .bind(SEARCH_LIMIT)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn create(&self, data: &CreateProduct) -> AppResult<Product> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, category, price, buy_in_price, stock, barcode, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(data.name.trim())
        .bind(data.category.trim())
        .bind(data.price)
        .bind(data.buy_in_price)
        .bind(data.stock)
        .bind(&data.barcode)
        .bind(&data.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&self, data: &UpdateProduct) -> AppResult<Product> {
        let mut sets = Vec::new();
        let mut idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.name, "name");
        add_field!(data.category, "category");
        add_field!(data.price, "price");
        add_field!(data.buy_in_price, "buy_in_price");
        add_field!(data.stock, "stock");
        add_field!(data.barcode, "barcode");
        add_field!(data.description, "description");

        if sets.is_empty() {
            return self.get_by_id(data.id).await;
        }

        let query = format!("UPDATE products SET {} WHERE id = $1 RETURNING *", sets.join(", "));
        let mut builder = sqlx::query_as::<_, Product>(&query).bind(data.id);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.name);
        bind_field!(data.category);
        bind_field!(data.price);
        bind_field!(data.buy_in_price);
        bind_field!(data.stock);
        bind_field!(data.barcode);
        bind_field!(data.description);

        builder
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product {} not found", data.id)))
    }
}
