//! Grouping of threshold rows into monitor identities.
//!
//! Every row lands in two groups:
//!
//! - an **explicit** group keyed by family, display name and threshold pair,
//!   whose host list keeps every row's host in table order (repeats included,
//!   since two rows may name different instances on the same host);
//! - a **default** group keyed by family and display name, whose host set is
//!   deduplicated and later excluded from the fallback monitor.

use std::collections::{BTreeMap, BTreeSet};

use monsync_types::Row;

/// Identity of an explicit-threshold monitor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExplicitKey {
    pub family: String,
    pub display_name: String,
    pub critical: i64,
    pub warning: i64,
}

/// Identity of a family-default (fallback) monitor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DefaultKey {
    pub family: String,
    pub display_name: String,
}

/// Both groupings of a threshold table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorGroups {
    pub explicit: BTreeMap<ExplicitKey, Vec<String>>,
    pub defaults: BTreeMap<DefaultKey, BTreeSet<String>>,
}

impl MonitorGroups {
    /// Fold every row into its explicit and default group.
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a Row>) -> Self {
        rows.into_iter().fold(Self::default(), |mut groups, row| {
            groups.add(row);
            groups
        })
    }

    /// Add a single row to both groupings.
    pub fn add(&mut self, row: &Row) {
        let explicit = ExplicitKey {
            family: row.family.clone(),
            display_name: row.display_name.clone(),
            critical: row.critical,
            warning: row.warning,
        };
        self.explicit
            .entry(explicit)
            .or_default()
            .push(row.host_name.clone());

        let default = DefaultKey {
            family: row.family.clone(),
            display_name: row.display_name.clone(),
        };
        self.defaults
            .entry(default)
            .or_default()
            .insert(row.host_name.clone());
    }

    pub fn is_empty(&self) -> bool {
        self.explicit.is_empty()
    }
}
