//! Receipt persistence and rendering

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use super::settings::SettingsService;
use crate::{
    config::ShopConfig,
    error::AppResult,
    models::{
        receipt::{CustomReceiptQuery, Receipt, ReceiptItem, SaveReceiptRequest},
        ticket::ServiceTicket,
    },
    receipt::{compose_document, ReceiptDraft, ReceiptHeader, ReceiptLayout},
    repository::TicketStore,
};

/// Item as sent by the print page; every field is optional there
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LooseItem {
    id: Option<String>,
    name: Option<String>,
    quantity: Option<u32>,
    price: Option<Decimal>,
    service_fee: Option<Decimal>,
}

impl LooseItem {
    /// Fill in defaults; `None` when the line is outside the stored ranges
    fn into_item(self, index: usize) -> Option<ReceiptItem> {
        let item = ReceiptItem {
            id: self.id.unwrap_or_else(|| format!("item-{}", index + 1)),
            name: self
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| "Unnamed item".to_string()),
            quantity: self.quantity.filter(|q| *q > 0).unwrap_or(1),
            price: self.price.unwrap_or_default().max(Decimal::ZERO),
            service_fee: self.service_fee.unwrap_or_default().max(Decimal::ZERO),
        };
        if item.in_range() {
            Some(item)
        } else {
            tracing::warn!("Dropping out-of-range receipt item {} ({})", index + 1, item.name);
            None
        }
    }
}

/// Parse the `items` query parameter; malformed input yields no items
pub fn parse_items_param(raw: Option<&str>) -> Vec<ReceiptItem> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<LooseItem>>(raw) {
        Ok(items) => items
            .into_iter()
            .enumerate()
            .filter_map(|(i, item)| item.into_item(i))
            .collect(),
        Err(e) => {
            tracing::warn!("Ignoring malformed receipt items parameter: {}", e);
            Vec::new()
        }
    }
}

/// Line item for a ticket that has no stored receipt
fn fallback_items(ticket: &ServiceTicket) -> Vec<ReceiptItem> {
    vec![ReceiptItem {
        id: ticket.id.to_string(),
        name: format!("{} - {}", ticket.service_type, ticket.equipment_brand),
        price: ticket.total_cost.unwrap_or_default(),
        quantity: 1,
        service_fee: Decimal::ZERO,
    }]
}

#[derive(Clone)]
pub struct ReceiptService {
    store: Arc<dyn TicketStore>,
    settings: SettingsService,
    shop: ShopConfig,
}

impl ReceiptService {
    pub fn new(store: Arc<dyn TicketStore>, settings: SettingsService, shop: ShopConfig) -> Self {
        Self { store, settings, shop }
    }

    /// Replace the ticket's receipt snapshot. Status is left alone.
    pub async fn save(&self, request: &SaveReceiptRequest) -> AppResult<ServiceTicket> {
        let data = &request.receipt_data;
        let draft = ReceiptDraft::from_items(data.items.clone())?;
        let totals = draft.totals();
        if let Some(client_total) = data.total_amount {
            if client_total.round_dp(2) != totals.grand_total {
                tracing::warn!(
                    "Receipt for ticket {}: client total {} differs from computed {}",
                    request.ticket_id,
                    client_total,
                    totals.grand_total
                );
            }
        }

        let receipt = draft.into_receipt(
            data.mechanic.clone(),
            data.mechanic_id,
            request.pdf_url.clone(),
            Utc::now(),
        );
        let ticket = self
            .store
            .save_receipt(request.ticket_id, &receipt)
            .await
            .map_err(|e| {
                tracing::error!("Failed to save receipt to ticket {}: {}", request.ticket_id, e);
                e
            })?;
        tracing::info!(
            "Saved receipt with {} item(s), total {} to ticket {}",
            receipt.items.len(),
            receipt.total_amount,
            request.ticket_id
        );
        Ok(ticket)
    }

    /// Render a receipt entirely from query parameters
    pub async fn render_custom(&self, query: &CustomReceiptQuery) -> ReceiptLayout {
        let items = parse_items_param(query.items.as_deref());
        let shop = self.settings.shop_identity_or_default().await;
        let now = Utc::now();
        let header = ReceiptHeader {
            receipt_id: query
                .id
                .clone()
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| now.format("%Y%m%d%H%M%S").to_string()),
            customer_name: query.customer_name.clone(),
            customer_email: query.customer_email.clone(),
            customer_phone: query.customer_phone.clone(),
            equipment_brand: query.equipment_brand.clone(),
            service_type: query.service_type.clone(),
            mechanic: query.mechanic.clone(),
            details: query.details.clone(),
            issued_at: now,
        };
        compose_document(&items, &shop, &header, query.logo.as_deref(), &self.shop.currency_symbol)
    }

    /// Render the receipt of a stored ticket.
    ///
    /// Without a stored snapshot a single line is built from the total cost
    /// and saved back; a failed save is logged and the layout still returned.
    pub async fn render_for_ticket(&self, ticket_id: Uuid) -> AppResult<ReceiptLayout> {
        let ticket = self.store.get(ticket_id).await?;

        let receipt = match ticket.receipt.clone() {
            Some(receipt) => receipt,
            None => {
                let generated = ReceiptDraft::from_items(fallback_items(&ticket))?
                    .into_receipt(None, ticket.mechanic_id, None, Utc::now());
                if let Err(e) = self.store.save_receipt(ticket_id, &generated).await {
                    tracing::warn!("Could not store generated receipt for ticket {}: {}", ticket_id, e);
                }
                generated
            }
        };

        let shop = self.settings.shop_identity_or_default().await;
        let header = ticket_header(&ticket, &receipt);
        Ok(compose_document(
            &receipt.items,
            &shop,
            &header,
            None,
            &self.shop.currency_symbol,
        ))
    }
}

fn ticket_header(ticket: &ServiceTicket, receipt: &Receipt) -> ReceiptHeader {
    ReceiptHeader {
        receipt_id: ticket.id.to_string(),
        customer_name: Some(ticket.customer.name.clone()),
        customer_email: Some(ticket.customer.email.clone()),
        customer_phone: Some(ticket.customer.phone.clone()),
        equipment_brand: Some(ticket.equipment_brand.clone()),
        service_type: Some(ticket.service_type.to_string()),
        mechanic: receipt.mechanic.clone(),
        details: Some(ticket.additional_details.clone()),
        issued_at: receipt.generated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::ShopIdentity;

    #[test]
    fn test_parse_items_fills_defaults() {
        let items = parse_items_param(Some(r#"[{"name":"Chain","quantity":2,"price":10},{"price":5,"quantity":0}]"#));
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Chain");
        assert_eq!(items[0].service_fee, Decimal::ZERO);
        assert_eq!(items[1].name, "Unnamed item");
        assert_eq!(items[1].quantity, 1);
        assert_eq!(items[1].id, "item-2");
    }

    #[test]
    fn test_malformed_items_are_empty() {
        assert!(parse_items_param(Some("[{not json")).is_empty());
        assert!(parse_items_param(Some(r#"{"name":"x"}"#)).is_empty());
        assert!(parse_items_param(None).is_empty());
    }

    #[test]
    fn test_oversized_line_is_dropped() {
        let items = parse_items_param(Some(
            r#"[{"quantity":4000000000,"price":1e20},{"name":"Tube","quantity":1,"price":8}]"#,
        ));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Tube");

        let shop = ShopIdentity {
            name: "Cycle Track".to_string(),
            phone: None,
            email: None,
            address: None,
            logo: None,
        };
        let header = ReceiptHeader {
            receipt_id: "R-1".to_string(),
            customer_name: None,
            customer_email: None,
            customer_phone: None,
            equipment_brand: None,
            service_type: None,
            mechanic: None,
            details: None,
            issued_at: Utc::now(),
        };
        let layout = compose_document(&items, &shop, &header, None, "$");
        assert!(!layout.ops.is_empty());
    }
}
