//! Workflow vocabulary: actions, outcomes, follow-ups.
//!
//! Actions form a closed enum with their payloads attached, so an
//! unrecognised action name or a missing parameter is unrepresentable
//! rather than a runtime failure mode.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::WorkOrderStatus;

/// One named workflow transition, with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowAction {
    /// `open → in_progress`; stamps `started_at`.
    Start,
    /// `in_progress → completed`; stamps `completed_at`.
    Complete,
    /// Any non-terminal state → `cancelled`, with an optional reason.
    Cancel {
        /// Caller-supplied cancellation reason, recorded on the record and
        /// in the domain event.
        reason: Option<String>,
    },
    /// Side transition setting the assignee; primary state is unchanged.
    Assign {
        /// Who the work order is assigned to; must not be blank.
        assignee: String,
    },
}

impl WorkflowAction {
    /// Wire name of the action.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Complete => "complete",
            Self::Cancel { .. } => "cancel",
            Self::Assign { .. } => "assign",
        }
    }
}

/// Category of a follow-up action suggested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpKind {
    /// Tell the assignees something changed.
    Notification,
    /// Schedule a post-completion inspection.
    Inspection,
}

/// Suggested follow-up returned alongside a successful transition.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FollowUpAction {
    /// Category tag.
    pub kind: FollowUpKind,
    /// Human-readable description.
    pub description: String,
    /// Whether the follow-up is mandatory.
    pub required: bool,
    /// Deadline for the follow-up, when one applies.
    pub due_at: Option<DateTime<Utc>>,
}

impl FollowUpAction {
    /// Mandatory "notify the assignees" follow-up.
    #[must_use]
    pub fn notify_assignees() -> Self {
        Self {
            kind: FollowUpKind::Notification,
            description: "Notify assignees".to_owned(),
            required: true,
            due_at: None,
        }
    }

    /// Optional post-completion inspection with a deadline.
    #[must_use]
    pub fn inspection(due_at: DateTime<Utc>) -> Self {
        Self {
            kind: FollowUpKind::Inspection,
            description: "Schedule a follow-up inspection".to_owned(),
            required: false,
            due_at: Some(due_at),
        }
    }
}

/// Result of attempting a workflow transition.
///
/// Domain rejections live here, as data; repository faults travel separately
/// as [`AppError`] so the two channels never mix.
///
/// [`AppError`]: crate::domain::error::AppError
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowOutcome {
    /// The transition committed.
    Applied {
        /// New primary state, when the transition changed it.
        next_state: Option<WorkOrderStatus>,
        /// Suggested follow-up actions.
        follow_ups: Vec<FollowUpAction>,
    },
    /// The transition was refused; nothing was persisted.
    Rejected {
        /// Human-readable reasons, in the order they were found.
        errors: Vec<String>,
    },
}

impl WorkflowOutcome {
    /// Successful outcome.
    #[must_use]
    pub const fn applied(
        next_state: Option<WorkOrderStatus>,
        follow_ups: Vec<FollowUpAction>,
    ) -> Self {
        Self::Applied {
            next_state,
            follow_ups,
        }
    }

    /// Refused outcome with at least one reason.
    pub fn rejected<I, S>(errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Rejected {
            errors: errors.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the transition committed.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    /// New primary state, when the transition changed it.
    #[must_use]
    pub fn next_state(&self) -> Option<WorkOrderStatus> {
        match self {
            Self::Applied { next_state, .. } => *next_state,
            Self::Rejected { .. } => None,
        }
    }

    /// Rejection reasons; empty for applied outcomes.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        match self {
            Self::Applied { .. } => &[],
            Self::Rejected { errors } => errors.as_slice(),
        }
    }
}
