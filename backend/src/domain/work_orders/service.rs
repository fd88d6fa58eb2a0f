//! Work order workflow service.
//!
//! Enforces the transition guards and business rules before any write, then
//! persists through the repository and emits a domain event. Validation of
//! the hypothetical post-transition record happens before commit; a failed
//! rule aborts the whole transition with no partial write.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::{Value, json};
use tracing::warn;

use crate::domain::ApiResult;
use crate::domain::events::DomainEvent;
use crate::domain::ports::{DomainEventSink, RecordStore};
use crate::domain::repository::{Patch, Repository};

use super::validation::validate_work_order;
use super::workflow::{FollowUpAction, WorkflowAction, WorkflowOutcome};
use super::{WorkOrder, WorkOrderStatus};

/// Days between completing a work order and its suggested inspection.
const INSPECTION_LEAD_DAYS: i64 = 7;

/// Workflow layer over the work-order repository.
#[derive(Clone)]
pub struct WorkOrderService {
    repository: Repository<WorkOrder>,
    events: Arc<dyn DomainEventSink>,
}

impl WorkOrderService {
    /// Build a service over the given store and event sink.
    pub fn new(store: Arc<dyn RecordStore>, events: Arc<dyn DomainEventSink>) -> Self {
        Self {
            repository: Repository::new(store),
            events,
        }
    }

    /// CRUD access to the underlying collection.
    ///
    /// Deletion is a repository concern independent of workflow state; it is
    /// deliberately not a workflow action.
    #[must_use]
    pub const fn repository(&self) -> &Repository<WorkOrder> {
        &self.repository
    }

    /// Execute one workflow action against the identified work order.
    ///
    /// Domain refusals (unknown id, illegal transition, rule violations)
    /// come back as [`WorkflowOutcome::Rejected`]; only repository faults
    /// surface as errors.
    pub async fn execute(&self, id: &str, action: WorkflowAction) -> ApiResult<WorkflowOutcome> {
        let Some(order) = self.repository.find_optional(id).await? else {
            return Ok(WorkflowOutcome::rejected(["Work order not found"]));
        };

        match action {
            WorkflowAction::Start => self.start(order).await,
            WorkflowAction::Complete => self.complete(order).await,
            WorkflowAction::Cancel { reason } => self.cancel(order, reason).await,
            WorkflowAction::Assign { assignee } => self.assign(order, &assignee).await,
        }
    }

    async fn start(&self, order: WorkOrder) -> ApiResult<WorkflowOutcome> {
        if order.status != WorkOrderStatus::Open {
            return Ok(WorkflowOutcome::rejected([format!(
                "cannot start a work order in the {} state",
                order.status
            )]));
        }

        let now = Utc::now();
        let mut next = order.clone();
        next.status = WorkOrderStatus::InProgress;
        next.started_at = Some(now);
        // The assignment rule defends records written directly into
        // in_progress; starting itself may move an unassigned order forward,
        // see DESIGN.md.
        let mut report = validate_work_order(&next);
        report.errors.retain(|finding| finding.code != "unassigned");
        if !report.is_valid() {
            return Ok(WorkflowOutcome::rejected(report.error_messages()));
        }

        let patch = Patch::new()
            .set("status", WorkOrderStatus::InProgress.as_str())
            .set("started_at", now.to_rfc3339());
        let updated = self.repository.update(&order.id, &patch).await?;

        self.emit(
            "work_order.started",
            &updated.id,
            json!({ "started_at": now.to_rfc3339() }),
        )
        .await;

        Ok(WorkflowOutcome::applied(
            Some(WorkOrderStatus::InProgress),
            vec![FollowUpAction::notify_assignees()],
        ))
    }

    async fn complete(&self, order: WorkOrder) -> ApiResult<WorkflowOutcome> {
        if order.status != WorkOrderStatus::InProgress {
            return Ok(WorkflowOutcome::rejected([format!(
                "cannot complete a work order in the {} state",
                order.status
            )]));
        }

        let now = Utc::now();
        let mut next = order.clone();
        next.status = WorkOrderStatus::Completed;
        next.completed_at = Some(now);
        // The assignee rule binds the in_progress state, so completion
        // without an assignee passes; see DESIGN.md.
        let report = validate_work_order(&next);
        if !report.is_valid() {
            return Ok(WorkflowOutcome::rejected(report.error_messages()));
        }

        let patch = Patch::new()
            .set("status", WorkOrderStatus::Completed.as_str())
            .set("completed_at", now.to_rfc3339());
        let updated = self.repository.update(&order.id, &patch).await?;

        self.emit(
            "work_order.completed",
            &updated.id,
            json!({ "completed_at": now.to_rfc3339() }),
        )
        .await;

        Ok(WorkflowOutcome::applied(
            Some(WorkOrderStatus::Completed),
            vec![
                FollowUpAction::notify_assignees(),
                FollowUpAction::inspection(now + Duration::days(INSPECTION_LEAD_DAYS)),
            ],
        ))
    }

    async fn cancel(&self, order: WorkOrder, reason: Option<String>) -> ApiResult<WorkflowOutcome> {
        if order.status.is_terminal() {
            return Ok(WorkflowOutcome::rejected([format!(
                "cannot cancel a work order in the {} state",
                order.status
            )]));
        }

        let mut patch = Patch::new().set("status", WorkOrderStatus::Cancelled.as_str());
        if let Some(reason) = reason.as_deref() {
            patch = patch.set("cancellation_reason", reason);
        }
        let updated = self.repository.update(&order.id, &patch).await?;

        self.emit(
            "work_order.cancelled",
            &updated.id,
            json!({
                "previous_status": order.status.as_str(),
                "reason": reason,
            }),
        )
        .await;

        Ok(WorkflowOutcome::applied(
            Some(WorkOrderStatus::Cancelled),
            Vec::new(),
        ))
    }

    async fn assign(&self, order: WorkOrder, assignee: &str) -> ApiResult<WorkflowOutcome> {
        let assignee = assignee.trim();
        if assignee.is_empty() {
            return Ok(WorkflowOutcome::rejected(["assignee must not be empty"]));
        }

        let patch = Patch::new()
            .set("assigned_to", assignee)
            .set("assignees", json!([assignee]));
        let updated = self.repository.update(&order.id, &patch).await?;

        self.emit(
            "work_order.assigned",
            &updated.id,
            json!({ "assignee": assignee }),
        )
        .await;

        Ok(WorkflowOutcome::applied(
            None,
            vec![FollowUpAction::notify_assignees()],
        ))
    }

    /// Record a domain event. Emission is fire-and-forget: a sink failure is
    /// logged and never affects the transition that produced the event.
    async fn emit(&self, event_type: &str, entity_id: &str, payload: Value) {
        let event = DomainEvent::new(event_type, entity_id, payload);
        if let Err(error) = self.events.record(event).await {
            warn!(%error, event_type, "domain event emission failed");
        }
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod service_tests;
