//! Cycle Track Server
//!
//! Back end for a bicycle service shop: ticket intake, the workshop status
//! workflow with its comment log, printable receipts and a dashboard,
//! served as a REST JSON API.

use std::sync::Arc;

pub mod api;
pub mod board;
pub mod config;
pub mod error;
pub mod models;
pub mod receipt;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
