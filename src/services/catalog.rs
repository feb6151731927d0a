//! Customers, mechanics and products

use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        customer::{CreateCustomer, Customer},
        mechanic::Mechanic,
        product::{CreateProduct, Product, ProductQuery, UpdateProduct},
    },
    repository::Repository,
};

/// Shortest quick-search term that hits the database
pub const MIN_SEARCH_LEN: usize = 2;

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_customers(&self, query: Option<&str>) -> AppResult<Vec<Customer>> {
        self.repository.customers.list(query).await
    }

    pub async fn create_customer(&self, data: &CreateCustomer) -> AppResult<Customer> {
        data.validate()?;
        let customer = self.repository.customers.create(data).await?;
        tracing::info!("Created customer {} ({})", customer.id, customer.email);
        Ok(customer)
    }

    pub async fn list_mechanics(&self, active: Option<bool>) -> AppResult<Vec<Mechanic>> {
        self.repository.mechanics.list(active).await
    }

    pub async fn list_products(&self, query: &ProductQuery) -> AppResult<Vec<Product>> {
        self.repository.products.list(query).await
    }

    /// Name or barcode search for the receipt builder
    pub async fn search_products(&self, term: Option<&str>) -> AppResult<Vec<Product>> {
        match term.map(str::trim) {
            Some(term) if term.chars().count() >= MIN_SEARCH_LEN => {
                self.repository.products.search(term).await
            }
            _ => Ok(Vec::new()),
        }
    }

    pub async fn create_product(&self, data: &CreateProduct) -> AppResult<Product> {
        data.validate()?;
        let product = self.repository.products.create(data).await?;
        tracing::info!("Created product {} ({})", product.id, product.name);
        Ok(product)
    }

    pub async fn update_product(&self, data: &UpdateProduct) -> AppResult<Product> {
        data.validate()?;
        let product = self.repository.products.update(data).await?;
        tracing::info!("Updated product {}", product.id);
        Ok(product)
    }
}
