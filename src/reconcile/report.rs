//! Outcome of a sync run.

use std::fmt;

use monsync_types::MonitorId;
use serde::Serialize;

use crate::plan::SkippedGroup;

/// The kind of change made to one monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Create,
    Update,
    Delete,
}

impl ActionKind {
    /// Present participle, for log lines.
    pub fn progressive(&self) -> &'static str {
        match self {
            ActionKind::Create => "creating",
            ActionKind::Update => "updating",
            ActionKind::Delete => "deleting",
        }
    }
}

/// Result of one planned change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    pub kind: ActionKind,
    pub name: String,
    /// Identifier of the monitor, when known (always known after a successful create).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<MonitorId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Everything a run did, or would do in a dry run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    pub dry_run: bool,
    pub outcomes: Vec<ActionOutcome>,
    /// Live monitors absent from the table that were left alone because
    /// they are not owned by this tool.
    pub retained: Vec<String>,
    pub skipped: Vec<SkippedGroup>,
}

impl SyncReport {
    fn count(&self, kind: ActionKind) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.kind == kind && o.succeeded())
            .count()
    }

    pub fn created(&self) -> usize {
        self.count(ActionKind::Create)
    }

    pub fn updated(&self) -> usize {
        self.count(ActionKind::Update)
    }

    pub fn deleted(&self) -> usize {
        self.count(ActionKind::Delete)
    }

    /// Outcomes whose API call failed.
    pub fn failures(&self) -> impl Iterator<Item = &ActionOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    /// Names touched by `kind`, in execution order.
    pub fn names(&self, kind: ActionKind) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.kind == kind)
            .map(|o| o.name.as_str())
            .collect()
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dry_run {
            write!(f, "dry run: ")?;
        }
        write!(
            f,
            "{} created, {} updated, {} deleted, {} failed, {} retained, {} skipped",
            self.created(),
            self.updated(),
            self.deleted(),
            self.failures().count(),
            self.retained.len(),
            self.skipped.len()
        )
    }
}
