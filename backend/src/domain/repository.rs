//! Generic, tenant-aware repository over one named collection.
//!
//! [`Repository`] gives every entity type uniform CRUD access with a single
//! failure contract: all store faults become [`AppError`] values, never
//! panics or adapter-specific types. Unlike the paginated reads of some
//! client-side data layers, `find_all`/`find_by_tenant` surface store faults
//! instead of degrading to an empty page — "no matches" and "store down" are
//! different answers and callers get to tell them apart.

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::{Map, Value};

use pagination::{Page, PageRequest};

use crate::domain::ApiResult;
use crate::domain::entity::{Entity, RESERVED_FIELDS};
use crate::domain::error::AppError;
use crate::domain::ports::{FieldFilter, RecordStore, RowRange, SelectQuery, StoreError};

/// Partial update: only the fields it carries change.
///
/// The store-owned fields (`id`, `created_at`, `updated_at`) are silently
/// dropped, so a patch assembled from untrusted input cannot rewrite them.
///
/// # Examples
/// ```
/// use backend::domain::repository::Patch;
///
/// let patch = Patch::new().set("title", "Fix pump").set("id", "evil");
/// assert_eq!(patch.as_map().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    changes: Map<String, Value>,
}

impl Patch {
    /// An empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one field, ignoring store-owned field names.
    #[must_use]
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        let field = field.into();
        if !RESERVED_FIELDS.contains(&field.as_str()) {
            self.changes.insert(field, value.into());
        }
        self
    }

    /// Build a patch from a free-form JSON object, stripping store-owned
    /// fields.
    #[must_use]
    pub fn from_object(object: Map<String, Value>) -> Self {
        let changes = object
            .into_iter()
            .filter(|(field, _)| !RESERVED_FIELDS.contains(&field.as_str()))
            .collect();
        Self { changes }
    }

    /// Whether the patch carries no changes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Borrow the underlying change set.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.changes
    }
}

/// Uniform CRUD access to the collection holding `E` records.
#[derive(Clone)]
pub struct Repository<E: Entity> {
    store: Arc<dyn RecordStore>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Repository<E> {
    /// Create a repository over the given store.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    fn decode(record: Value) -> ApiResult<E> {
        serde_json::from_value(record)
            .map_err(|err| AppError::api(format!("malformed {} record: {err}", E::COLLECTION)))
    }

    fn map_store_error(error: StoreError) -> AppError {
        match error {
            StoreError::Connection { message } => {
                AppError::unavailable(format!("record store unavailable: {message}"))
            }
            StoreError::Query { message } => {
                AppError::api(format!("record store query failed: {message}"))
            }
            StoreError::Serialization { message } => {
                AppError::api(format!("record store serialisation failed: {message}"))
            }
        }
    }

    fn not_found(id: &str) -> AppError {
        AppError::not_found(format!("no record {id} in {}", E::COLLECTION))
    }

    /// Point lookup returning `None` for unknown ids.
    ///
    /// Workflow callers need the non-erroring form to turn "not found" into a
    /// domain rejection rather than a repository fault.
    pub async fn find_optional(&self, id: &str) -> ApiResult<Option<E>> {
        let record = self
            .store
            .fetch(E::COLLECTION, id)
            .await
            .map_err(Self::map_store_error)?;
        record.map(Self::decode).transpose()
    }

    /// Point lookup; unknown ids are a [`NotFound`] fault.
    ///
    /// [`NotFound`]: crate::domain::error::ErrorCode::NotFound
    pub async fn find_by_id(&self, id: &str) -> ApiResult<E> {
        self.find_optional(id)
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    /// Paginated scan of the whole collection.
    pub async fn find_all(&self, request: &PageRequest) -> ApiResult<Page<E>> {
        self.select_page(None, request).await
    }

    /// Paginated scan restricted to one tenant.
    pub async fn find_by_tenant(
        &self,
        tenant_id: &str,
        request: &PageRequest,
    ) -> ApiResult<Page<E>> {
        if tenant_id.trim().is_empty() {
            return Err(AppError::invalid_request("tenant id must not be empty"));
        }
        let filter = FieldFilter::eq(E::TENANT_FIELD, tenant_id);
        self.select_page(Some(filter), request).await
    }

    async fn select_page(
        &self,
        filter: Option<FieldFilter>,
        request: &PageRequest,
    ) -> ApiResult<Page<E>> {
        let query = SelectQuery {
            filter,
            sort: request.sort().cloned(),
            range: Some(RowRange {
                offset: request.offset(),
                count: request.limit(),
            }),
        };
        let selected = self
            .store
            .select(E::COLLECTION, &query)
            .await
            .map_err(Self::map_store_error)?;

        let mut items = Vec::with_capacity(selected.records.len());
        for record in selected.records {
            items.push(Self::decode(record)?);
        }
        Ok(Page::new(
            items,
            request.page(),
            request.limit(),
            selected.total,
        ))
    }

    /// Insert a draft; the store assigns id and timestamps.
    pub async fn create(&self, draft: &E::Draft) -> ApiResult<E> {
        let record = serde_json::to_value(draft)
            .map_err(|err| AppError::api(format!("unserialisable {} draft: {err}", E::COLLECTION)))?;
        let stored = self
            .store
            .insert(E::COLLECTION, &record)
            .await
            .map_err(Self::map_store_error)?;
        Self::decode(stored)
    }

    /// Apply a partial update; only supplied fields change.
    pub async fn update(&self, id: &str, patch: &Patch) -> ApiResult<E> {
        if patch.is_empty() {
            return Err(AppError::invalid_request(
                "update requires at least one field",
            ));
        }
        let stored = self
            .store
            .patch(E::COLLECTION, id, patch.as_map())
            .await
            .map_err(Self::map_store_error)?;
        match stored {
            Some(record) => Self::decode(record),
            None => Err(Self::not_found(id)),
        }
    }

    /// Hard-delete a record. Deletion is independent of workflow state.
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        let removed = self
            .store
            .remove(E::COLLECTION, id)
            .await
            .map_err(Self::map_store_error)?;
        if removed {
            Ok(())
        } else {
            Err(Self::not_found(id))
        }
    }
}
