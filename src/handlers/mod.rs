pub mod audit;
pub mod builty;
pub mod common;
pub mod health;
pub mod orders;
pub mod phonebook;
pub mod reference;

use crate::{
    config::AppConfig,
    db::DbPool,
    events::EventSender,
    services::{
        audit::AuditService,
        builty::BuiltyService,
        orders::{OrderService, OrderSettings},
        party_directory::{DbPartyDirectory, PartyDirectory},
        phonebook::PhoneBookService,
        reference::ReferenceService,
    },
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub orders: Arc<OrderService>,
    pub builty: Arc<BuiltyService>,
    pub phonebook: Arc<PhoneBookService>,
    pub reference: Arc<ReferenceService>,
    pub audit: Arc<AuditService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>, config: &AppConfig) -> Self {
        let directory: Arc<dyn PartyDirectory> = Arc::new(DbPartyDirectory::new(db_pool.clone()));

        Self {
            orders: Arc::new(OrderService::new(
                db_pool.clone(),
                event_sender.clone(),
                OrderSettings::from(config),
            )),
            builty: Arc::new(BuiltyService::new(
                db_pool.clone(),
                event_sender,
                config.search_result_limit,
            )),
            phonebook: Arc::new(PhoneBookService::new(
                db_pool.clone(),
                directory,
                config.search_result_limit,
            )),
            reference: Arc::new(ReferenceService::new(
                db_pool.clone(),
                config.lookup_result_limit,
            )),
            audit: Arc::new(AuditService::new(db_pool, config.search_result_limit)),
        }
    }
}
