//! Structural contract shared by every persisted record.
//!
//! Collections are generic over their record type rather than a nominal base
//! class: any type carrying an opaque `id` and the server-assigned
//! `created_at`/`updated_at` pair can flow through [`Repository`].
//!
//! [`Repository`]: crate::domain::repository::Repository

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Minimal shape a record must expose to be stored in a named collection.
///
/// The `Draft` associated type is the creation payload: it structurally omits
/// `id`, `created_at`, and `updated_at`, which the store assigns. This makes
/// "caller must not supply server-assigned fields" a compile-time property
/// instead of a runtime check.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Creation payload without the server-assigned fields.
    type Draft: Serialize + Send + Sync;

    /// Logical collection (table) the records live in.
    const COLLECTION: &'static str;

    /// Record field used for tenant-scoped equality filters.
    const TENANT_FIELD: &'static str = "tenant_id";

    /// Opaque unique identifier.
    fn id(&self) -> &str;

    /// Server-assigned creation timestamp.
    fn created_at(&self) -> DateTime<Utc>;

    /// Server-maintained last-modification timestamp.
    fn updated_at(&self) -> DateTime<Utc>;
}

/// Record fields the store owns; patches must never write these.
pub const RESERVED_FIELDS: [&str; 3] = ["id", "created_at", "updated_at"];
