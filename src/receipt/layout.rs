//! Print layout for 80mm receipt paper
//!
//! Produces positioned drawing instructions only. Rasterizing them to PDF is
//! left to the print client.

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use super::draft::ReceiptTotals;
use crate::models::{receipt::ReceiptItem, settings::ShopIdentity};

pub const PAGE_WIDTH_MM: f32 = 80.0;
const LEFT: f32 = 5.0;
const RIGHT: f32 = 75.0;
const CENTER: f32 = PAGE_WIDTH_MM / 2.0;
const QTY_COL: f32 = 42.0;
const PRICE_COL: f32 = 54.0;
const FEE_COL: f32 = 64.0;
const LINE_HEIGHT: f32 = 4.0;
/// Characters that fit the item-name column at 8pt
const NAME_COLUMN_CHARS: usize = 20;
/// Characters per line of the details block at 8pt
const DETAILS_CHARS: usize = 42;
const LOGO_SIZE: f32 = 20.0;
const MARK_SIZE: f32 = 12.0;
/// Light gray used for row separators
const SEPARATOR_GRAY: u8 = 200;

const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
}

/// One drawing instruction; coordinates in millimetres from the top left
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        text: String,
        size: f32,
        bold: bool,
        align: Align,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        /// 0 is black, 255 white
        gray: u8,
    },
    Circle {
        x: f32,
        y: f32,
        r: f32,
        filled: bool,
    },
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        format: ImageFormat,
        /// Base64 image bytes
        data: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLayout {
    pub width_mm: f32,
    pub height_mm: f32,
    pub ops: Vec<DrawOp>,
}

/// Customer and job fields printed above the item table
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptHeader {
    pub receipt_id: String,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub equipment_brand: Option<String>,
    pub service_type: Option<String>,
    pub mechanic: Option<String>,
    pub details: Option<String>,
    pub issued_at: DateTime<Utc>,
}

struct LogoImage {
    format: ImageFormat,
    data: String,
}

/// Decode a base64 logo (plain or `data:` URL) and check it is PNG or JPEG
fn decode_logo(raw: &str) -> Option<LogoImage> {
    let payload = match raw.split_once("base64,") {
        Some((_, data)) => data,
        None => raw,
    };
    let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = match STANDARD.decode(payload.as_bytes()) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Logo is not valid base64, using default mark: {}", e);
            return None;
        }
    };
    let format = if bytes.starts_with(PNG_MAGIC) {
        ImageFormat::Png
    } else if bytes.starts_with(JPEG_MAGIC) {
        ImageFormat::Jpeg
    } else {
        tracing::warn!("Logo is neither PNG nor JPEG, using default mark");
        return None;
    };
    Some(LogoImage {
        format,
        data: STANDARD.encode(&bytes),
    })
}

/// Word-wrap to `width` characters, splitting words that do not fit
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                lines.push(word.drain(..width).collect());
            }
            let word: String = word.into_iter().collect();
            if word.is_empty() {
                continue;
            }
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > width {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

/// Shop name split at the first space: `"Cycle Track Shop"` → `("Cycle", "Track Shop")`
fn split_shop_name(name: &str) -> (&str, Option<&str>) {
    match name.trim().split_once(' ') {
        Some((first, rest)) if !rest.trim().is_empty() => (first, Some(rest.trim())),
        _ => (name.trim(), None),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

struct Canvas {
    ops: Vec<DrawOp>,
    y: f32,
    currency: String,
}

impl Canvas {
    fn text(&mut self, x: f32, text: impl Into<String>, size: f32, bold: bool, align: Align) {
        self.ops.push(DrawOp::Text {
            x,
            y: self.y,
            text: text.into(),
            size,
            bold,
            align,
        });
    }

    fn rule(&mut self, gray: u8) {
        self.ops.push(DrawOp::Line {
            x1: LEFT,
            y1: self.y,
            x2: RIGHT,
            y2: self.y,
            gray,
        });
    }

    fn money(&self, amount: Decimal) -> String {
        format!("{}{:.2}", self.currency, amount.round_dp(2))
    }

    /// Bicycle glyph: two wheels joined by a frame, centred on the page
    fn mark(&mut self, size: f32) {
        let r = size * 0.28;
        let cy = self.y + size / 2.0;
        let left = CENTER - size * 0.4;
        let right = CENTER + size * 0.4;
        let top = cy - size * 0.35;
        self.ops.push(DrawOp::Circle { x: left, y: cy, r, filled: false });
        self.ops.push(DrawOp::Circle { x: right, y: cy, r, filled: false });
        for (x1, y1, x2, y2) in [
            (left, cy, CENTER, cy),
            (CENTER, cy, right, top),
            (left, cy, CENTER - size * 0.1, top),
            (CENTER - size * 0.1, top, right, top),
            (CENTER, cy, CENTER - size * 0.1, top),
        ] {
            self.ops.push(DrawOp::Line { x1, y1, x2, y2, gray: 0 });
        }
        self.y += size + 2.0;
    }

    fn header(&mut self, shop: &ShopIdentity, logo: Option<LogoImage>) {
        match logo {
            Some(image) => {
                self.ops.push(DrawOp::Image {
                    x: CENTER - LOGO_SIZE / 2.0,
                    y: self.y,
                    width: LOGO_SIZE,
                    height: LOGO_SIZE,
                    format: image.format,
                    data: image.data,
                });
                self.y += LOGO_SIZE + 4.0;
            }
            None => self.mark(MARK_SIZE),
        }

        let (first, second) = split_shop_name(&shop.name);
        self.y += 2.0;
        self.text(CENTER, first, 14.0, true, Align::Center);
        if let Some(second) = second {
            self.y += 6.0;
            self.text(CENTER, second, 12.0, true, Align::Center);
        }
        self.y += 6.0;
        self.text(CENTER, "Service Receipt", 10.0, false, Align::Center);
        self.y += 6.0;
    }

    fn fields(&mut self, info: &ReceiptHeader) {
        self.text(LEFT, info.issued_at.format("%d.%m.%Y %H:%M").to_string(), 8.0, false, Align::Left);
        self.text(RIGHT, format!("Receipt #{}", info.receipt_id), 8.0, false, Align::Right);
        self.y += 3.0;
        self.rule(0);
        self.y += 5.0;

        let customer = non_empty(&info.customer_name).unwrap_or("Counter Sale");
        let equipment = non_empty(&info.equipment_brand).unwrap_or("Various");
        let service = non_empty(&info.service_type).unwrap_or("Service");
        let rows = [
            ("Customer:", Some(customer)),
            ("Equipment:", Some(equipment)),
            ("Phone:", non_empty(&info.customer_phone)),
            ("Email:", non_empty(&info.customer_email)),
            ("Service type:", Some(service)),
            ("Mechanic:", non_empty(&info.mechanic)),
        ];
        for (label, value) in rows {
            let Some(value) = value else { continue };
            self.text(LEFT, label, 9.0, false, Align::Left);
            self.text(RIGHT, value, 9.0, true, Align::Right);
            self.y += 5.0;
        }

        if let Some(details) = non_empty(&info.details) {
            self.y += 1.0;
            self.text(LEFT, "Details:", 9.0, true, Align::Left);
            self.y += LINE_HEIGHT;
            for line in wrap_text(details, DETAILS_CHARS) {
                self.text(LEFT, line, 8.0, false, Align::Left);
                self.y += LINE_HEIGHT;
            }
        }
        self.y += 2.0;
    }

    fn items(&mut self, items: &[ReceiptItem]) {
        self.text(LEFT, "Item", 9.0, true, Align::Left);
        self.text(QTY_COL, "Qty", 9.0, true, Align::Right);
        self.text(PRICE_COL, "Price", 9.0, true, Align::Right);
        self.text(FEE_COL, "Fee", 9.0, true, Align::Right);
        self.text(RIGHT, "Total", 9.0, true, Align::Right);
        self.y += 2.0;
        self.rule(0);
        self.y += 5.0;

        if items.is_empty() {
            self.text(LEFT, "No items", 8.0, false, Align::Left);
            self.y += 5.0;
        }

        for item in items {
            let name = if item.name.trim().is_empty() {
                "Unnamed item"
            } else {
                item.name.as_str()
            };
            let name_lines = wrap_text(name, NAME_COLUMN_CHARS);
            let row_y = self.y;
            for line in &name_lines {
                self.text(LEFT, line.clone(), 8.0, false, Align::Left);
                self.y += LINE_HEIGHT;
            }
            self.y = row_y;
            self.text(QTY_COL, item.quantity.to_string(), 8.0, false, Align::Right);
            self.text(PRICE_COL, self.money(item.price), 8.0, false, Align::Right);
            self.text(FEE_COL, self.money(item.service_fee), 8.0, false, Align::Right);
            self.text(RIGHT, self.money(item.total()), 8.0, false, Align::Right);

            self.y = row_y + (name_lines.len().max(1) as f32 * LINE_HEIGHT).max(5.0) - 2.0;
            self.rule(SEPARATOR_GRAY);
            self.y += 5.0;
        }
    }

    fn totals(&mut self, totals: &ReceiptTotals) {
        self.rule(0);
        self.y += 5.0;
        self.text(CENTER, "Subtotal:", 9.0, false, Align::Left);
        self.text(RIGHT, self.money(totals.product_total), 9.0, false, Align::Right);
        self.y += 5.0;
        self.text(CENTER, "Service fees:", 9.0, false, Align::Left);
        self.text(RIGHT, self.money(totals.service_fee_total), 9.0, false, Align::Right);
        self.y += 6.0;
        self.text(CENTER, "Total:", 10.0, true, Align::Left);
        self.text(RIGHT, self.money(totals.grand_total), 10.0, true, Align::Right);
        self.y += 10.0;
    }

    fn footer(&mut self, shop: &ShopIdentity) {
        self.text(CENTER, "Thank you for your business!", 8.0, false, Align::Center);
        self.y += LINE_HEIGHT;
        let contact = [
            Some(shop.name.trim()),
            non_empty(&shop.address),
            non_empty(&shop.phone),
            non_empty(&shop.email),
        ];
        for line in contact.into_iter().flatten() {
            self.text(CENTER, line, 8.0, false, Align::Center);
            self.y += LINE_HEIGHT;
        }
        self.y += 2.0;
        self.mark(8.0);
    }
}

/// Lay out a receipt.
///
/// `logo_override` replaces the shop logo when given. An image that fails to
/// decode, or that is not PNG or JPEG, is replaced by the default mark.
pub fn compose_document(
    items: &[ReceiptItem],
    shop: &ShopIdentity,
    info: &ReceiptHeader,
    logo_override: Option<&str>,
    currency: &str,
) -> ReceiptLayout {
    let logo = logo_override
        .or(shop.logo.as_deref())
        .filter(|l| !l.trim().is_empty())
        .and_then(decode_logo);

    let mut canvas = Canvas {
        ops: Vec::new(),
        y: 6.0,
        currency: currency.to_string(),
    };
    canvas.header(shop, logo);
    canvas.fields(info);
    canvas.items(items);
    canvas.totals(&ReceiptTotals::of(items));
    canvas.footer(shop);

    ReceiptLayout {
        width_mm: PAGE_WIDTH_MM,
        height_mm: canvas.y + 6.0,
        ops: canvas.ops,
    }
}
