//! Three-way reconciliation between the desired set and the live listing.
//!
//! Monitors are matched by name. The plan partitions them into:
//!
//! - **creates**: desired, not live
//! - **updates**: desired and live; always sent, even when nothing changed
//! - **deletes**: live, not desired, and tagged `automatically_created:true`
//! - **retained**: live, not desired, and not owned; never touched
//!
//! Execution runs creates, then updates, then deletes, one call at a time.
//! A failed call is logged and recorded; it never stops the run and is never
//! retried. The live listing is a snapshot taken before planning and is not
//! refreshed between phases.

mod report;

pub use report::{ActionKind, ActionOutcome, SyncReport};

use std::collections::BTreeMap;

use monsync_adapters::MonitoringApi;
use monsync_types::{DesiredMonitor, LiveMonitor, MonitorId, MonitorRequest};
use tracing::{error, info, warn};

use crate::plan::DesiredSet;

/// The changes needed to make the live monitors match the desired set.
#[derive(Debug, Clone, Default)]
pub struct SyncPlan {
    pub creates: Vec<DesiredMonitor>,
    pub updates: Vec<(MonitorId, DesiredMonitor)>,
    pub deletes: Vec<LiveMonitor>,
    pub retained: Vec<LiveMonitor>,
}

impl SyncPlan {
    /// Diff the desired set against a live listing.
    ///
    /// When several live monitors share a name, the one listed last is the
    /// one matched; the others are not considered.
    pub fn compute(desired: &DesiredSet, live: &[LiveMonitor]) -> Self {
        let live_by_name: BTreeMap<&str, &LiveMonitor> =
            live.iter().map(|m| (m.name.as_str(), m)).collect();

        let mut plan = Self::default();

        for monitor in desired.monitors() {
            match live_by_name.get(monitor.name.as_str()) {
                Some(existing) => plan.updates.push((existing.id, monitor.clone())),
                None => plan.creates.push(monitor.clone()),
            }
        }

        for (name, existing) in live_by_name {
            if desired.contains(name) {
                continue;
            }
            if existing.is_owned() {
                plan.deletes.push(existing.clone());
            } else {
                plan.retained.push(existing.clone());
            }
        }

        plan
    }

    pub fn is_empty(&self) -> bool {
        self.creates.is_empty() && self.updates.is_empty() && self.deletes.is_empty()
    }

    /// Apply the plan through `api`, isolating every failure to its own monitor.
    pub async fn execute(&self, api: &dyn MonitoringApi, message: &str) -> SyncReport {
        let mut outcomes = Vec::with_capacity(
            self.creates.len() + self.updates.len() + self.deletes.len(),
        );

        for monitor in &self.creates {
            info!(default = monitor.is_default(), "Creating monitor: {}", monitor.name);
            let request = MonitorRequest::new(monitor, message);
            let outcome = match api.create_monitor(&request).await {
                Ok(id) => success(ActionKind::Create, &monitor.name, Some(id)),
                Err(e) => failure(ActionKind::Create, &monitor.name, None, e),
            };
            outcomes.push(outcome);
        }

        for (id, monitor) in &self.updates {
            info!(default = monitor.is_default(), "Updating monitor: {}", monitor.name);
            let request = MonitorRequest::new(monitor, message);
            let outcome = match api.update_monitor(*id, &request).await {
                Ok(()) => success(ActionKind::Update, &monitor.name, Some(*id)),
                Err(e) => failure(ActionKind::Update, &monitor.name, Some(*id), e),
            };
            outcomes.push(outcome);
        }

        for monitor in &self.deletes {
            info!("Deleting monitor: {}", monitor.name);
            let outcome = match api.delete_monitor(monitor.id).await {
                Ok(()) => success(ActionKind::Delete, &monitor.name, Some(monitor.id)),
                Err(e) => failure(ActionKind::Delete, &monitor.name, Some(monitor.id), e),
            };
            outcomes.push(outcome);
        }

        self.log_retained();

        SyncReport {
            dry_run: false,
            outcomes,
            retained: self.retained_names(),
            skipped: Vec::new(),
        }
    }

    /// Log the plan without calling the service.
    pub fn preview(&self) -> SyncReport {
        let mut outcomes = Vec::new();

        for monitor in &self.creates {
            info!("Would create monitor: {}", monitor.name);
            outcomes.push(success(ActionKind::Create, &monitor.name, None));
        }
        for (id, monitor) in &self.updates {
            info!(%id, "Would update monitor: {}", monitor.name);
            outcomes.push(success(ActionKind::Update, &monitor.name, Some(*id)));
        }
        for monitor in &self.deletes {
            info!(id = %monitor.id, "Would delete monitor: {}", monitor.name);
            outcomes.push(success(ActionKind::Delete, &monitor.name, Some(monitor.id)));
        }

        self.log_retained();

        SyncReport {
            dry_run: true,
            outcomes,
            retained: self.retained_names(),
            skipped: Vec::new(),
        }
    }

    fn log_retained(&self) {
        for monitor in &self.retained {
            warn!(id = %monitor.id, "Keeping unmanaged monitor: {}", monitor.name);
        }
    }

    fn retained_names(&self) -> Vec<String> {
        self.retained.iter().map(|m| m.name.clone()).collect()
    }
}

fn success(kind: ActionKind, name: &str, id: Option<MonitorId>) -> ActionOutcome {
    ActionOutcome {
        kind,
        name: name.to_string(),
        id,
        error: None,
    }
}

fn failure(
    kind: ActionKind,
    name: &str,
    id: Option<MonitorId>,
    err: monsync_adapters::AdapterError,
) -> ActionOutcome {
    error!("Error {} monitor {}: {}", kind.progressive(), name, err);
    ActionOutcome {
        kind,
        name: name.to_string(),
        id,
        error: Some(err.to_string()),
    }
}
