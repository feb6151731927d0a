//! Ticket comment log entries
//!
//! Entries are stored as tagged JSON. The older pipe-delimited string form
//! (`<payload>|<author>|<DD.MM.YYYY/HH:MM>`, or `<author>|moved the card
//! <status>|<timestamp>` for audit lines) is still read and written so that
//! rows created before the JSON form remain displayable.

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::enums::ServiceStatus;

/// Display format of entry timestamps
pub const TIMESTAMP_FORMAT: &str = "%d.%m.%Y/%H:%M";

const SERVICE_DETAILS_TAG: &str = "[service_details]";
const MOVED_PREFIX: &str = "moved the card ";
const UNKNOWN_AUTHOR: &str = "unknown";

/// One line of a completed-work breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDetailLine {
    pub name: String,
    pub quantity: u32,
    pub price: Decimal,
    pub service_fee: Decimal,
    pub total: Decimal,
}

/// Structured completed-work record attached to the comment log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDetails {
    pub items: Vec<ServiceDetailLine>,
    pub product_total: Decimal,
    pub service_fee_total: Decimal,
    pub grand_total: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// What an entry says
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommentKind {
    FreeText { text: String },
    StatusChange { status: ServiceStatus },
    ServiceDetail { details: ServiceDetails },
}

/// A single log record; insertion order is display order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CommentEntry {
    pub author: String,
    /// Minute precision
    #[schema(value_type = String)]
    pub timestamp: NaiveDateTime,
    pub body: CommentKind,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommentDecodeError {
    #[error("entry has fewer than three fields")]
    MissingFields,
    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),
    #[error("invalid status '{0}'")]
    InvalidStatus(String),
    #[error("malformed service details payload: {reason}")]
    MalformedServiceDetails {
        stripped: String,
        author: String,
        timestamp: NaiveDateTime,
        reason: String,
    },
}

/// Authors are a delimited field, so `|` is replaced
fn clean_author(author: &str) -> String {
    author.replace('|', "/")
}

impl CommentEntry {
    pub fn new(body: CommentKind, author: impl Into<String>, at: DateTime<Utc>) -> Self {
        let naive = at.naive_utc();
        let timestamp = naive
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(naive);
        Self {
            author: clean_author(&author.into()),
            timestamp,
            body,
        }
    }

    pub fn free_text(text: impl Into<String>, author: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self::new(CommentKind::FreeText { text: text.into() }, author, at)
    }

    pub fn status_change(status: ServiceStatus, author: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self::new(CommentKind::StatusChange { status }, author, at)
    }

    pub fn service_detail(details: ServiceDetails, author: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self::new(CommentKind::ServiceDetail { details }, author, at)
    }

    /// Timestamp as shown in the log (`DD.MM.YYYY/HH:MM`)
    pub fn display_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Human readable line, e.g. `Sam moved the card done`
    pub fn summary(&self) -> String {
        match &self.body {
            CommentKind::FreeText { text } => text.clone(),
            CommentKind::StatusChange { status } => format!("{} {}{}", self.author, MOVED_PREFIX, status),
            CommentKind::ServiceDetail { details } => {
                format!("Service details: {} item(s), total {:.2}", details.items.len(), details.grand_total)
            }
        }
    }

    pub fn is_status_change(&self) -> bool {
        matches!(self.body, CommentKind::StatusChange { .. })
    }

    /// Encode in the delimited string form
    pub fn encode(&self) -> String {
        let ts = self.display_timestamp();
        let author = clean_author(&self.author);
        match &self.body {
            CommentKind::FreeText { text } => format!("{}|{}|{}", text, author, ts),
            CommentKind::StatusChange { status } => {
                format!("{}|{}{}|{}", author, MOVED_PREFIX, status, ts)
            }
            CommentKind::ServiceDetail { details } => {
                // Serializing plain data into a string cannot fail
                let payload = serde_json::to_string(details).unwrap_or_default();
                format!("{}{}|{}|{}", SERVICE_DETAILS_TAG, payload, author, ts)
            }
        }
    }

    /// Decode the delimited string form.
    ///
    /// Fields are split from the right so free text may itself contain `|`.
    pub fn decode(raw: &str) -> Result<Self, CommentDecodeError> {
        let mut fields = raw.rsplitn(3, '|');
        let ts_field = fields.next();
        let middle = fields.next();
        let first = fields.next();
        let (first, middle, ts_field) = match (first, middle, ts_field) {
            (Some(first), Some(middle), Some(ts)) => (first, middle, ts),
            _ => return Err(CommentDecodeError::MissingFields),
        };

        let timestamp = NaiveDateTime::parse_from_str(ts_field.trim(), TIMESTAMP_FORMAT)
            .map_err(|_| CommentDecodeError::InvalidTimestamp(ts_field.to_string()))?;

        if let Some(status) = middle.strip_prefix(MOVED_PREFIX) {
            let status = status
                .trim()
                .parse::<ServiceStatus>()
                .map_err(|_| CommentDecodeError::InvalidStatus(status.to_string()))?;
            return Ok(Self {
                author: first.to_string(),
                timestamp,
                body: CommentKind::StatusChange { status },
            });
        }

        if let Some(payload) = first.strip_prefix(SERVICE_DETAILS_TAG) {
            return match serde_json::from_str::<ServiceDetails>(payload) {
                Ok(details) => Ok(Self {
                    author: middle.to_string(),
                    timestamp,
                    body: CommentKind::ServiceDetail { details },
                }),
                Err(e) => Err(CommentDecodeError::MalformedServiceDetails {
                    stripped: payload.to_string(),
                    author: middle.to_string(),
                    timestamp,
                    reason: e.to_string(),
                }),
            };
        }

        Ok(Self {
            author: middle.to_string(),
            timestamp,
            body: CommentKind::FreeText {
                text: first.to_string(),
            },
        })
    }

    /// Decode, falling back to free text on any error.
    ///
    /// A malformed service-details payload keeps its author and timestamp and
    /// shows the payload with the tag stripped; anything else becomes the raw
    /// string attributed to an unknown author at `fallback`.
    pub fn decode_lossy(raw: &str, fallback: DateTime<Utc>) -> Self {
        match Self::decode(raw) {
            Ok(entry) => entry,
            Err(CommentDecodeError::MalformedServiceDetails {
                stripped,
                author,
                timestamp,
                reason,
            }) => {
                tracing::debug!("Showing malformed service details as text: {}", reason);
                Self {
                    author,
                    timestamp,
                    body: CommentKind::FreeText { text: stripped },
                }
            }
            Err(_) => Self::free_text(raw, UNKNOWN_AUTHOR, fallback),
        }
    }
}

/// Element of the persisted `comments` array
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredComment {
    Entry(CommentEntry),
    Legacy(String),
}

impl StoredComment {
    pub fn into_entry(self, fallback: DateTime<Utc>) -> CommentEntry {
        match self {
            StoredComment::Entry(entry) => entry,
            StoredComment::Legacy(raw) => CommentEntry::decode_lossy(&raw, fallback),
        }
    }
}
