//! Editable receipt line items and totals

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        comment::{ServiceDetailLine, ServiceDetails},
        product::Product,
        receipt::{max_unit_amount, Receipt, ReceiptItem, MAX_QUANTITY},
    },
};

/// Sums over a line-item list, rounded to cents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptTotals {
    /// Σ price × quantity
    pub product_total: Decimal,
    /// Σ service fee × quantity
    pub service_fee_total: Decimal,
    pub grand_total: Decimal,
}

impl ReceiptTotals {
    pub fn of(items: &[ReceiptItem]) -> Self {
        let product_total = saturating_sum(items.iter().map(ReceiptItem::product_subtotal)).round_dp(2);
        let service_fee_total = saturating_sum(items.iter().map(ReceiptItem::fee_subtotal)).round_dp(2);
        Self {
            product_total,
            service_fee_total,
            grand_total: product_total.checked_add(service_fee_total).unwrap_or(Decimal::MAX),
        }
    }
}

fn saturating_sum(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    amounts.fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount).unwrap_or(Decimal::MAX))
}

/// Receipt under construction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReceiptDraft {
    items: Vec<ReceiptItem>,
}

fn check_item(name: &str, quantity: u32, price: Decimal, service_fee: Decimal) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("Item name is required".to_string()));
    }
    if quantity < 1 {
        return Err(AppError::Validation(format!(
            "Quantity for '{}' must be at least 1",
            name
        )));
    }
    if price.is_sign_negative() && !price.is_zero() {
        return Err(AppError::Validation(format!("Price for '{}' cannot be negative", name)));
    }
    if service_fee.is_sign_negative() && !service_fee.is_zero() {
        return Err(AppError::Validation(format!(
            "Service fee for '{}' cannot be negative",
            name
        )));
    }
    if quantity > MAX_QUANTITY {
        return Err(AppError::Validation(format!(
            "Quantity for '{}' cannot exceed {}",
            name, MAX_QUANTITY
        )));
    }
    if price > max_unit_amount() || service_fee > max_unit_amount() {
        return Err(AppError::Validation(format!(
            "Amounts for '{}' cannot exceed {}",
            name,
            max_unit_amount()
        )));
    }
    Ok(())
}

impl ReceiptDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from items received over the wire, rejecting invalid lines
    pub fn from_items(items: Vec<ReceiptItem>) -> AppResult<Self> {
        for item in &items {
            check_item(&item.name, item.quantity, item.price, item.service_fee)?;
        }
        Ok(Self { items })
    }

    pub fn add_item(
        &mut self,
        name: &str,
        quantity: u32,
        unit_price: Decimal,
        service_fee: Decimal,
    ) -> AppResult<&ReceiptItem> {
        check_item(name, quantity, unit_price, service_fee)?;
        self.items.push(ReceiptItem {
            id: format!("custom-{}", Uuid::new_v4().simple()),
            name: name.trim().to_string(),
            price: unit_price,
            quantity,
            service_fee,
        });
        Ok(&self.items[self.items.len() - 1])
    }

    /// Add a catalog product, copying its current name and price
    pub fn add_product(
        &mut self,
        product: &Product,
        quantity: u32,
        service_fee: Decimal,
    ) -> AppResult<&ReceiptItem> {
        check_item(&product.name, quantity, product.price, service_fee)?;
        self.items.push(ReceiptItem {
            id: product.id.to_string(),
            name: product.name.clone(),
            price: product.price,
            quantity,
            service_fee,
        });
        Ok(&self.items[self.items.len() - 1])
    }

    /// Remove by position; `None` when out of range
    pub fn remove_item(&mut self, index: usize) -> Option<ReceiptItem> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    pub fn items(&self) -> &[ReceiptItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn totals(&self) -> ReceiptTotals {
        ReceiptTotals::of(&self.items)
    }

    /// Completed-work breakdown for the comment log
    pub fn service_details(&self, notes: Option<String>) -> ServiceDetails {
        let totals = self.totals();
        ServiceDetails {
            items: self
                .items
                .iter()
                .map(|item| ServiceDetailLine {
                    name: item.name.clone(),
                    quantity: item.quantity,
                    price: item.price,
                    service_fee: item.service_fee,
                    total: item.total(),
                })
                .collect(),
            product_total: totals.product_total,
            service_fee_total: totals.service_fee_total,
            grand_total: totals.grand_total,
            notes: notes.filter(|n| !n.trim().is_empty()),
        }
    }

    /// Freeze into the snapshot stored on a ticket
    pub fn into_receipt(
        self,
        mechanic: Option<String>,
        mechanic_id: Option<Uuid>,
        pdf_url: Option<String>,
        generated_at: DateTime<Utc>,
    ) -> Receipt {
        let totals = self.totals();
        Receipt {
            items: self.items,
            total_amount: totals.grand_total,
            generated_at,
            mechanic: mechanic.filter(|m| !m.trim().is_empty()),
            mechanic_id,
            pdf_url: pdf_url.filter(|u| !u.is_empty()),
        }
    }
}
