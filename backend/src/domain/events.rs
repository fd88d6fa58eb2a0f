//! Domain events emitted by workflow transitions.
//!
//! Events are a side channel: services record them through the
//! [`DomainEventSink`] port after a transition commits, and a sink failure is
//! logged but never rolls back or fails the transition that produced it.
//!
//! [`DomainEventSink`]: crate::domain::ports::DomainEventSink

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Record of a completed workflow transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainEvent {
    /// Dotted event type, e.g. `work_order.started`.
    pub event_type: String,
    /// Identifier of the entity the transition applied to.
    pub entity_id: String,
    /// Structured payload describing the transition.
    pub payload: Value,
    /// When the event was produced.
    pub occurred_at: DateTime<Utc>,
}

impl DomainEvent {
    /// Build an event stamped with the current time.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::events::DomainEvent;
    /// use serde_json::json;
    ///
    /// let event = DomainEvent::new("work_order.started", "wo-1", json!({ "by": "ada" }));
    /// assert_eq!(event.event_type, "work_order.started");
    /// ```
    pub fn new(event_type: impl Into<String>, entity_id: impl Into<String>, payload: Value) -> Self {
        Self {
            event_type: event_type.into(),
            entity_id: entity_id.into(),
            payload,
            occurred_at: Utc::now(),
        }
    }
}
