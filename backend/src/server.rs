//! Application wiring shared by the binary and the integration tests.

use std::sync::Arc;

use actix_web::web;

use crate::api::{health, work_orders};
use crate::domain::ports::{DomainEventSink, RecordStore};
use crate::domain::work_orders::WorkOrderService;

/// Services shared across handlers.
pub struct AppContext {
    /// Work order workflow service and repository.
    pub work_orders: WorkOrderService,
}

impl AppContext {
    /// Wire the services over the given store and event sink.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, events: Arc<dyn DomainEventSink>) -> Self {
        Self {
            work_orders: WorkOrderService::new(store, events),
        }
    }
}

/// Register every route on the given service config.
///
/// Shared between `main` and the HTTP integration tests so both exercise the
/// same routing table.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(work_orders::list)
        .service(work_orders::get)
        .service(work_orders::create)
        .service(work_orders::update)
        .service(work_orders::remove)
        .service(work_orders::workflow)
        .service(health::ready)
        .service(health::live);
}
