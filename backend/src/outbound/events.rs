//! Event sink recording domain events through `tracing`.

use async_trait::async_trait;
use tracing::info;

use crate::domain::events::DomainEvent;
use crate::domain::ports::{DomainEventSink, EventSinkError};

/// Default sink: one structured log line per domain event.
///
/// Infallible by construction, which keeps the "emission never fails a
/// transition" contract trivially true in the default wiring.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

#[async_trait]
impl DomainEventSink for TracingEventSink {
    async fn record(&self, event: DomainEvent) -> Result<(), EventSinkError> {
        info!(
            event_type = %event.event_type,
            entity_id = %event.entity_id,
            payload = %event.payload,
            occurred_at = %event.occurred_at,
            "domain event",
        );
        Ok(())
    }
}
