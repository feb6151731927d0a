//! Business logic services

pub mod catalog;
pub mod dashboard;
pub mod receipts;
pub mod settings;
pub mod workshop;

use std::sync::Arc;

use crate::{
    config::ShopConfig,
    repository::{Repository, TicketStore},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub workshop: workshop::WorkshopService,
    pub receipts: receipts::ReceiptService,
    pub dashboard: dashboard::DashboardService,
    pub catalog: catalog::CatalogService,
    pub settings: settings::SettingsService,
    pub repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, shop: ShopConfig) -> Self {
        let tickets: Arc<dyn TicketStore> = Arc::new(repository.tickets.clone());
        Self::with_ticket_store(repository, tickets, shop)
    }

    /// Same as `new`, with ticket persistence supplied by the caller
    pub fn with_ticket_store(repository: Repository, tickets: Arc<dyn TicketStore>, shop: ShopConfig) -> Self {
        let settings = settings::SettingsService::new(repository.clone(), shop.clone());
        Self {
            workshop: workshop::WorkshopService::new(tickets.clone()),
            receipts: receipts::ReceiptService::new(tickets.clone(), settings.clone(), shop),
            dashboard: dashboard::DashboardService::new(tickets),
            catalog: catalog::CatalogService::new(repository.clone()),
            settings,
            repository,
        }
    }
}
