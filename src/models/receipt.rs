//! Receipt snapshot and receipt request payloads

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::ticket::ServiceTicket;

/// Priced line on a receipt.
///
/// Name and prices are copied from the product at the time the receipt is
/// built, so later catalog changes do not alter stored receipts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptItem {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    /// Fee per unit, charged on top of the price
    #[serde(default)]
    pub service_fee: Decimal,
}

/// Largest quantity accepted on one line
pub const MAX_QUANTITY: u32 = 9_999;

/// Largest unit price or fee, the range of a `NUMERIC(10,2)` column
pub fn max_unit_amount() -> Decimal {
    Decimal::new(9_999_999_999, 2)
}

/// `amount * quantity`, saturating instead of overflowing
fn line_amount(amount: Decimal, quantity: u32) -> Decimal {
    amount.checked_mul(Decimal::from(quantity)).unwrap_or(Decimal::MAX)
}

impl ReceiptItem {
    /// `(price + serviceFee) * quantity`
    pub fn total(&self) -> Decimal {
        self.product_subtotal()
            .checked_add(self.fee_subtotal())
            .unwrap_or(Decimal::MAX)
    }

    pub fn product_subtotal(&self) -> Decimal {
        line_amount(self.price, self.quantity)
    }

    pub fn fee_subtotal(&self) -> Decimal {
        line_amount(self.service_fee, self.quantity)
    }

    /// Quantity and amounts are within the stored ranges
    pub fn in_range(&self) -> bool {
        self.quantity <= MAX_QUANTITY
            && self.price <= max_unit_amount()
            && self.service_fee <= max_unit_amount()
    }
}

/// Receipt embedded in a ticket; regenerating overwrites it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub items: Vec<ReceiptItem>,
    pub total_amount: Decimal,
    pub generated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mechanic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mechanic_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
}

/// Receipt data posted by the receipt builder
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptData {
    pub items: Vec<ReceiptItem>,
    /// Client-side total; the server recomputes it from the items
    pub total_amount: Option<Decimal>,
    pub mechanic: Option<String>,
    pub mechanic_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveReceiptRequest {
    pub ticket_id: Uuid,
    pub receipt_data: ReceiptData,
    pub pdf_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaveReceiptResponse {
    pub success: bool,
    pub message: String,
    pub ticket: ServiceTicket,
}

/// Query parameters of the ad-hoc receipt render
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct CustomReceiptQuery {
    /// Receipt id printed under the header (ticket id or counter-sale id)
    pub id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub equipment_brand: Option<String>,
    pub service_type: Option<String>,
    pub mechanic: Option<String>,
    pub details: Option<String>,
    /// Base64 image, optionally as a `data:` URL; overrides the shop logo
    pub logo: Option<String>,
    /// JSON array of receipt items
    pub items: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct GenerateReceiptQuery {
    pub ticket_id: Uuid,
}
