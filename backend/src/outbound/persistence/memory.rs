//! In-memory record store.
//!
//! Backs tests and local development. Mirrors the remote store's contract:
//! it owns `id`, `created_at`, and `updated_at`, assigning them on insert
//! and maintaining `updated_at` on patch.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::ports::{RecordStore, SelectPage, SelectQuery, StoreError};

use pagination::SortOrder;

type Collections = HashMap<String, BTreeMap<String, Value>>;

/// Mutex-guarded per-collection map of JSON records.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    collections: Mutex<Collections>,
}

impl InMemoryRecordStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Collections>, StoreError> {
        self.collections
            .lock()
            .map_err(|_| StoreError::query("record store mutex poisoned"))
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn fetch(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let collections = self.lock()?;
        Ok(collections
            .get(collection)
            .and_then(|rows| rows.get(id))
            .cloned())
    }

    async fn select(
        &self,
        collection: &str,
        query: &SelectQuery,
    ) -> Result<SelectPage, StoreError> {
        let collections = self.lock()?;
        let mut records: Vec<Value> = collections
            .get(collection)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default();

        if let Some(filter) = &query.filter {
            records.retain(|record| field_of(record, &filter.field) == &filter.value);
        }

        if let Some(sort) = &query.sort {
            records.sort_by(|a, b| {
                let ordering = compare_values(field_of(a, &sort.field), field_of(b, &sort.field));
                match sort.order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            });
        }

        let total = records.len() as u64;
        let records = match query.range {
            Some(range) => records
                .into_iter()
                .skip(usize::try_from(range.offset).unwrap_or(usize::MAX))
                .take(range.count as usize)
                .collect(),
            None => records,
        };

        Ok(SelectPage { records, total })
    }

    async fn insert(&self, collection: &str, record: &Value) -> Result<Value, StoreError> {
        let Some(fields) = record.as_object() else {
            return Err(StoreError::serialization("record must be a JSON object"));
        };

        let now = Utc::now().to_rfc3339();
        let id = Uuid::new_v4().to_string();
        let mut stored = fields.clone();
        stored.insert("id".to_owned(), Value::String(id.clone()));
        stored.insert("created_at".to_owned(), Value::String(now.clone()));
        stored.insert("updated_at".to_owned(), Value::String(now));
        let stored = Value::Object(stored);

        let mut collections = self.lock()?;
        collections
            .entry(collection.to_owned())
            .or_default()
            .insert(id, stored.clone());
        Ok(stored)
    }

    async fn patch(
        &self,
        collection: &str,
        id: &str,
        changes: &Map<String, Value>,
    ) -> Result<Option<Value>, StoreError> {
        let mut collections = self.lock()?;
        let Some(row) = collections
            .get_mut(collection)
            .and_then(|rows| rows.get_mut(id))
        else {
            return Ok(None);
        };
        let Some(fields) = row.as_object_mut() else {
            return Err(StoreError::serialization("stored record is not an object"));
        };

        for (field, value) in changes {
            fields.insert(field.clone(), value.clone());
        }
        fields.insert(
            "updated_at".to_owned(),
            Value::String(Utc::now().to_rfc3339()),
        );
        Ok(Some(row.clone()))
    }

    async fn remove(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let mut collections = self.lock()?;
        Ok(collections
            .get_mut(collection)
            .and_then(|rows| rows.remove(id))
            .is_some())
    }
}

/// Missing fields sort like JSON null.
fn field_of<'a>(record: &'a Value, field: &str) -> &'a Value {
    record.get(field).unwrap_or(&Value::Null)
}

/// Total order over JSON scalars: null < bool < number < string, containers
/// last; values of the same kind compare naturally.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

const fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

#[cfg(test)]
mod tests;
