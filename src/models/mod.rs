//! Data models for Cycle Track

pub mod comment;
pub mod customer;
pub mod dashboard;
pub mod enums;
pub mod mechanic;
pub mod product;
pub mod receipt;
pub mod settings;
pub mod ticket;
pub mod user;

// Re-export commonly used types
pub use comment::{CommentEntry, CommentKind, ServiceDetails};
pub use customer::Customer;
pub use enums::{ServiceStatus, ServiceType};
pub use mechanic::Mechanic;
pub use product::Product;
pub use receipt::{Receipt, ReceiptItem};
pub use settings::{ShopIdentity, ShopSettings};
pub use ticket::{ServiceTicket, StatusChange, TicketFieldPatch};
