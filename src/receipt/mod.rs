//! Receipt composition
//!
//! `draft` keeps the editable line-item list and its totals; `layout` turns a
//! finished list into drawing instructions for an 80mm thermal page.

pub mod draft;
pub mod layout;

pub use draft::{ReceiptDraft, ReceiptTotals};
pub use layout::{compose_document, DrawOp, ReceiptHeader, ReceiptLayout};
