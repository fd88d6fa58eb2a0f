//! Business rules for work orders.
//!
//! Rules run independently and accumulate into one report; none of them
//! short-circuits the others.

use crate::domain::validation::ValidationReport;

use super::{Priority, WorkOrder, WorkOrderStatus};

/// Run every work-order rule against the given record.
///
/// Rules:
/// 1. a work order must carry a non-blank title (error);
/// 2. urgent work without a due date is flagged but allowed (warning);
/// 3. a completed work order must record a completion timestamp (error) —
///    this defends against inconsistent direct writes that bypass the
///    workflow service;
/// 4. an in-progress work order needs at least one assignee (error).
#[must_use]
pub fn validate_work_order(order: &WorkOrder) -> ValidationReport {
    let mut report = ValidationReport::new();

    if order.title.trim().is_empty() {
        report.error("title", "required", "title is required");
    }

    if order.priority == Priority::Urgent && order.due_date.is_none() {
        report.warn(
            "due_date",
            "missing_due_date",
            "urgent work orders should carry a due date",
        );
    }

    if order.status == WorkOrderStatus::Completed && order.completed_at.is_none() {
        report.error(
            "completed_at",
            "missing_timestamp",
            "completed work orders must record a completion timestamp",
        );
    }

    if order.status == WorkOrderStatus::InProgress && !order.has_assignee() {
        report.error(
            "assignees",
            "unassigned",
            "in-progress work orders need at least one assignee",
        );
    }

    report
}
