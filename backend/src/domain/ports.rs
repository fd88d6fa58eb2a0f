//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (the remote record store and the event sink). Each trait exposes strongly
//! typed errors so adapters map their failures into predictable variants
//! instead of returning `anyhow::Result`.

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use pagination::SortSpec;

use crate::domain::events::DomainEvent;

/// Errors surfaced by record store adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Store connectivity failures (network, DNS, refused connections).
    #[error("record store connection failed: {message}")]
    Connection {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("record store query failed: {message}")]
    Query {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// Records could not be encoded or decoded at the store boundary.
    #[error("record store serialisation failed: {message}")]
    Serialization {
        /// Adapter-supplied failure description.
        message: String,
    },
}

impl StoreError {
    /// Helper for connection-oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Helper for serialisation problems.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

/// Equality filter on a single record field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    /// Field the filter applies to.
    pub field: String,
    /// Value records must equal to match.
    pub value: Value,
}

impl FieldFilter {
    /// Build an equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Zero-based row window of a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    /// Index of the first row to return.
    pub offset: u64,
    /// Maximum number of rows to return.
    pub count: u32,
}

/// Declarative description of a collection scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectQuery {
    /// Optional equality filter (used for tenant scoping).
    pub filter: Option<FieldFilter>,
    /// Optional ordering.
    pub sort: Option<SortSpec>,
    /// Optional row window; absent means all matching rows.
    pub range: Option<RowRange>,
}

/// One window of matching records plus the exact total match count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectPage {
    /// Matching records within the requested window, in store order.
    pub records: Vec<Value>,
    /// Total matching records across the whole collection.
    pub total: u64,
}

/// Persistence port over a remote, tenant-scoped record store.
///
/// Records cross this seam as JSON objects; the store owns the `id`,
/// `created_at`, and `updated_at` fields (assigned on insert, `updated_at`
/// maintained on patch).
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Point lookup by identifier. `Ok(None)` means the id is unknown.
    async fn fetch(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// Scan a collection with optional filter, ordering, and row window.
    async fn select(&self, collection: &str, query: &SelectQuery)
    -> Result<SelectPage, StoreError>;

    /// Insert a record, returning it with server-assigned fields populated.
    async fn insert(&self, collection: &str, record: &Value) -> Result<Value, StoreError>;

    /// Apply a partial update. Only the supplied fields change. `Ok(None)`
    /// means the id is unknown; no record is created.
    async fn patch(
        &self,
        collection: &str,
        id: &str,
        changes: &Map<String, Value>,
    ) -> Result<Option<Value>, StoreError>;

    /// Hard-delete a record, reporting whether one existed.
    async fn remove(&self, collection: &str, id: &str) -> Result<bool, StoreError>;
}

/// Errors surfaced when recording a domain event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventSinkError {
    /// The sink backend rejected or failed to persist the event.
    #[error("event sink rejected the event: {message}")]
    Rejected {
        /// Sink-supplied failure description.
        message: String,
    },
}

impl EventSinkError {
    /// Helper for sink write failures.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}

/// Side-channel port recording workflow transitions.
///
/// Emission is best-effort by contract: callers log failures and carry on,
/// so implementations must never be required for correctness.
#[async_trait]
pub trait DomainEventSink: Send + Sync {
    /// Record one event.
    async fn record(&self, event: DomainEvent) -> Result<(), EventSinkError>;
}

#[cfg(test)]
mod tests {
    #![expect(
        clippy::expect_used,
        reason = "test code uses expect for clear failure messages"
    )]

    use std::collections::HashMap;
    use std::sync::Mutex;

    use actix_rt::System;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[derive(Default)]
    struct ScratchStore {
        rows: Mutex<HashMap<String, Value>>,
    }

    #[async_trait]
    impl RecordStore for ScratchStore {
        async fn fetch(&self, _collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
            let rows = self.rows.lock().expect("rows poisoned");
            Ok(rows.get(id).cloned())
        }

        async fn select(
            &self,
            _collection: &str,
            _query: &SelectQuery,
        ) -> Result<SelectPage, StoreError> {
            let rows = self.rows.lock().expect("rows poisoned");
            Ok(SelectPage {
                records: rows.values().cloned().collect(),
                total: rows.len() as u64,
            })
        }

        async fn insert(&self, _collection: &str, record: &Value) -> Result<Value, StoreError> {
            let mut rows = self.rows.lock().expect("rows poisoned");
            let id = format!("row-{}", rows.len() + 1);
            let mut stored = record.clone();
            if let Some(fields) = stored.as_object_mut() {
                fields.insert("id".to_owned(), Value::String(id.clone()));
            }
            rows.insert(id, stored.clone());
            Ok(stored)
        }

        async fn patch(
            &self,
            _collection: &str,
            id: &str,
            changes: &Map<String, Value>,
        ) -> Result<Option<Value>, StoreError> {
            let mut rows = self.rows.lock().expect("rows poisoned");
            let Some(row) = rows.get_mut(id) else {
                return Ok(None);
            };
            if let Some(fields) = row.as_object_mut() {
                for (key, value) in changes {
                    fields.insert(key.clone(), value.clone());
                }
            }
            Ok(Some(row.clone()))
        }

        async fn remove(&self, _collection: &str, id: &str) -> Result<bool, StoreError> {
            let mut rows = self.rows.lock().expect("rows poisoned");
            Ok(rows.remove(id).is_some())
        }
    }

    #[rstest]
    fn store_round_trip_through_the_port() {
        let store = ScratchStore::default();

        System::new().block_on(async move {
            let created = store
                .insert("things", &json!({ "name": "pump" }))
                .await
                .expect("insert succeeds");
            let id = created["id"].as_str().expect("id assigned").to_owned();

            let fetched = store.fetch("things", &id).await.expect("fetch succeeds");
            assert_eq!(fetched, Some(created));

            let mut changes = Map::new();
            changes.insert("name".to_owned(), Value::String("valve".to_owned()));
            let patched = store
                .patch("things", &id, &changes)
                .await
                .expect("patch succeeds")
                .expect("row exists");
            assert_eq!(patched["name"], "valve");

            assert!(store.remove("things", &id).await.expect("remove succeeds"));
            assert!(!store.remove("things", &id).await.expect("remove succeeds"));
        });
    }

    #[rstest]
    fn patch_on_unknown_id_returns_none() {
        let store = ScratchStore::default();

        System::new().block_on(async move {
            let outcome = store
                .patch("things", "missing", &Map::new())
                .await
                .expect("patch succeeds");
            assert_eq!(outcome, None);
        });
    }

    #[rstest]
    #[case(StoreError::connection("refused"), "record store connection failed: refused")]
    #[case(StoreError::query("bad filter"), "record store query failed: bad filter")]
    #[case(
        StoreError::serialization("not an object"),
        "record store serialisation failed: not an object"
    )]
    fn store_errors_render_their_category(#[case] error: StoreError, #[case] rendered: &str) {
        assert_eq!(error.to_string(), rendered);
    }

    #[rstest]
    fn field_filter_accepts_any_json_scalar() {
        let filter = FieldFilter::eq("tenant_id", "acme");
        assert_eq!(filter.value, Value::String("acme".to_owned()));
    }
}
