//! Work order aggregate: model, business rules, and workflow service.
//!
//! Work orders move `open → in_progress → completed`, with cancellation
//! reachable from any non-terminal state and assignment as a side transition
//! that leaves the primary state untouched. The service in this module is
//! the only writer that changes workflow state; direct repository updates
//! remain possible (and validation rule three defends readers against the
//! inconsistent records they can produce).

mod service;
mod validation;
mod workflow;

pub use self::service::WorkOrderService;
pub use self::validation::validate_work_order;
pub use self::workflow::{FollowUpAction, FollowUpKind, WorkflowAction, WorkflowOutcome};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::entity::Entity;

/// Primary workflow state of a work order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderStatus {
    /// Created and waiting to be started.
    Open,
    /// Work has started.
    InProgress,
    /// Work finished; terminal.
    Completed,
    /// Abandoned; terminal.
    Cancelled,
}

impl WorkOrderStatus {
    /// Lowercase wire token for the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether no further transitions are legal from this state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl std::fmt::Display for WorkOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency of a work order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Routine work.
    Low,
    /// Default priority.
    #[default]
    Medium,
    /// Needs attention soon.
    High,
    /// Drop-everything work; expected to carry a due date.
    Urgent,
}

/// A maintenance work order.
///
/// ## Invariants
/// - `id`, `created_at`, and `updated_at` are store-assigned and never
///   written by clients.
/// - `assignees` mirrors `assigned_to` for compatibility with consumers that
///   expect a list-valued field; the workflow service keeps both in step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WorkOrder {
    /// Opaque unique identifier.
    pub id: String,
    /// Short human-readable summary; required by rule one.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Primary workflow state.
    pub status: WorkOrderStatus,
    /// Urgency.
    #[serde(default)]
    pub priority: Priority,
    /// Single-valued assignee.
    #[serde(default)]
    pub assigned_to: Option<String>,
    /// Redundant list-valued mirror of `assigned_to`.
    #[serde(default)]
    pub assignees: Vec<String>,
    /// Owning tenant, when the record is tenant-scoped.
    #[serde(default)]
    pub tenant_id: Option<String>,
    /// When the work is due.
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    /// Stamped by the `start` transition.
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    /// Stamped by the `complete` transition.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Caller-supplied reason recorded by the `cancel` transition.
    #[serde(default)]
    pub cancellation_reason: Option<String>,
    /// Store-assigned creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Store-maintained last-modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl WorkOrder {
    /// Whether anyone is assigned, through either the single-valued field or
    /// the list mirror.
    #[must_use]
    pub fn has_assignee(&self) -> bool {
        self.assigned_to
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty())
            || self.assignees.iter().any(|name| !name.trim().is_empty())
    }
}

impl Entity for WorkOrder {
    type Draft = WorkOrderDraft;

    const COLLECTION: &'static str = "work_orders";

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Creation payload for a work order; the store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WorkOrderDraft {
    /// Short human-readable summary.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Initial workflow state; new work orders start `open`.
    #[serde(default = "WorkOrderDraft::default_status")]
    pub status: WorkOrderStatus,
    /// Urgency.
    #[serde(default)]
    pub priority: Priority,
    /// Single-valued assignee.
    #[serde(default)]
    pub assigned_to: Option<String>,
    /// Redundant list-valued mirror of `assigned_to`.
    #[serde(default)]
    pub assignees: Vec<String>,
    /// Owning tenant, when the record is tenant-scoped.
    #[serde(default)]
    pub tenant_id: Option<String>,
    /// When the work is due.
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

impl WorkOrderDraft {
    /// Draft with a title and defaults everywhere else.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: Self::default_status(),
            priority: Priority::default(),
            assigned_to: None,
            assignees: Vec::new(),
            tenant_id: None,
            due_date: None,
        }
    }

    const fn default_status() -> WorkOrderStatus {
        WorkOrderStatus::Open
    }
}
