//! Desired monitor set assembly.
//!
//! This module turns validated threshold rows into the set of monitors that
//! should exist on the service.
//!
//! ## Submodules
//!
//! - [`keys`]: grouping of rows into explicit and default monitor identities
//! - [`thresholds`]: unit scaling, warning collapse and fixed default levels
//! - [`query`]: per-family query templates, host scopes and monitor names
//!
//! ## Data Flow
//!
//! ```text
//! Vec<Row>
//!    │
//!    ▼
//! MonitorGroups::from_rows()
//!    │
//!    ├──▶ explicit groups ──▶ compile_explicit() ─┐
//!    │                                            ├──▶ DesiredSet (name → DesiredMonitor)
//!    └──▶ default groups ───▶ compile_default() ──┘
//! ```

pub mod keys;
pub mod query;
pub mod thresholds;

use std::collections::btree_map::{BTreeMap, Entry};

use monsync_types::{DesiredMonitor, Row, UnsupportedFamily};
use serde::Serialize;

use crate::error::{Result, SyncError};
pub use keys::{DefaultKey, ExplicitKey, MonitorGroups};

/// A group whose family is not supported; no monitor was built for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedGroup {
    pub family: String,
    pub display_name: String,
    pub default_monitor: bool,
}

/// Every monitor the threshold table asks for, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct DesiredSet {
    monitors: BTreeMap<String, DesiredMonitor>,
    skipped: Vec<SkippedGroup>,
}

impl DesiredSet {
    /// Build the desired set from validated rows.
    ///
    /// Groups of an unsupported family are skipped with a warning. Two groups
    /// producing the same monitor name with different definitions fail the
    /// whole build.
    pub fn from_rows(rows: &[Row]) -> Result<Self> {
        let groups = MonitorGroups::from_rows(rows);
        if groups.is_empty() {
            tracing::warn!("Threshold table has no rows, every owned monitor will be deleted");
        }
        let mut set = Self::default();

        for (key, hosts) in &groups.explicit {
            match query::compile_explicit(key, hosts) {
                Ok(monitor) => set.insert(monitor)?,
                Err(err) => set.skip(&key.family, &key.display_name, false, err),
            }
        }

        for (key, hosts) in &groups.defaults {
            match query::compile_default(key, hosts) {
                Ok(monitor) => set.insert(monitor)?,
                Err(err) => set.skip(&key.family, &key.display_name, true, err),
            }
        }

        tracing::debug!(
            monitors = set.monitors.len(),
            skipped = set.skipped.len(),
            "Built desired monitor set"
        );
        Ok(set)
    }

    /// Add a monitor. Identical duplicates are merged.
    pub fn insert(&mut self, monitor: DesiredMonitor) -> Result<()> {
        match self.monitors.entry(monitor.name.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(monitor);
                Ok(())
            }
            Entry::Occupied(existing) if existing.get() == &monitor => Ok(()),
            Entry::Occupied(existing) => Err(SyncError::NameCollision {
                name: existing.key().clone(),
            }),
        }
    }

    fn skip(
        &mut self,
        family: &str,
        display_name: &str,
        default_monitor: bool,
        err: UnsupportedFamily,
    ) {
        tracing::warn!(display_name, default_monitor, "{}", err);
        self.skipped.push(SkippedGroup {
            family: family.to_string(),
            display_name: display_name.to_string(),
            default_monitor,
        });
    }

    pub fn get(&self, name: &str) -> Option<&DesiredMonitor> {
        self.monitors.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.monitors.contains_key(name)
    }

    /// Monitors in name order.
    pub fn monitors(&self) -> impl Iterator<Item = &DesiredMonitor> {
        self.monitors.values()
    }

    /// Groups that were skipped because of an unsupported family.
    pub fn skipped(&self) -> &[SkippedGroup] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}
