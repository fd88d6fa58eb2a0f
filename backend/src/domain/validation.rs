//! Accumulated business-rule validation.
//!
//! Rules never short-circuit: a report collects every finding so a caller
//! sees all problems at once. Severity is encoded structurally — findings in
//! `errors` block the operation, findings in `warnings` never do.

use serde::Serialize;
use utoipa::ToSchema;

/// One validation finding: which field, a machine code, a human message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Finding {
    /// Field the finding applies to.
    pub field: &'static str,
    /// Machine-readable rule code.
    pub code: &'static str,
    /// Human-readable description.
    pub message: String,
}

impl Finding {
    /// Build a finding.
    pub fn new(field: &'static str, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            code,
            message: message.into(),
        }
    }
}

/// Outcome of running every rule against an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidationReport {
    /// Blocking findings; any entry makes the report invalid.
    pub errors: Vec<Finding>,
    /// Advisory findings; never block.
    pub warnings: Vec<Finding>,
}

impl ValidationReport {
    /// A report with no findings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a blocking finding.
    pub fn error(&mut self, field: &'static str, code: &'static str, message: impl Into<String>) {
        self.errors.push(Finding::new(field, code, message));
    }

    /// Record an advisory finding.
    pub fn warn(&mut self, field: &'static str, code: &'static str, message: impl Into<String>) {
        self.warnings.push(Finding::new(field, code, message));
    }

    /// Whether the entity passed every blocking rule.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages of the blocking findings, in rule order.
    #[must_use]
    pub fn error_messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .map(|finding| finding.message.clone())
            .collect()
    }
}
