//! Desired and live monitor definitions.

use std::fmt;

use crate::Family;

/// Ownership marker. Only monitors carrying this tag may be deleted by a sync.
pub const AUTOMATICALLY_CREATED: &str = "automatically_created:true";

/// Category tag carried by every generated monitor.
pub const CATEGORY_HOST: &str = "category:host";

/// The four tags every generated monitor carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorTags {
    family: Family,
    default_monitor: bool,
}

impl MonitorTags {
    pub fn new(family: Family, default_monitor: bool) -> Self {
        Self {
            family,
            default_monitor,
        }
    }

    /// Render the tags in the order they are sent to the service.
    pub fn into_vec(self) -> Vec<String> {
        vec![
            format!("pluginset_name:{}", self.family),
            AUTOMATICALLY_CREATED.to_string(),
            CATEGORY_HOST.to_string(),
            format!("default_monitor:{}", self.default_monitor),
        ]
    }
}

/// Alert thresholds in the service's native unit.
///
/// `warning` is absent when it would equal `critical`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Thresholds {
    pub critical: f64,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub warning: Option<f64>,
}

impl Thresholds {
    /// Thresholds with only a critical level.
    pub fn critical_only(critical: f64) -> Self {
        Self {
            critical,
            warning: None,
        }
    }

    /// Thresholds with both levels set, as given.
    pub fn pair(critical: f64, warning: f64) -> Self {
        Self {
            critical,
            warning: Some(warning),
        }
    }
}

/// A monitor this system wants to exist, keyed by its name.
#[derive(Debug, Clone, PartialEq)]
pub struct DesiredMonitor {
    pub name: String,
    pub query: String,
    pub tags: Vec<String>,
    pub thresholds: Thresholds,
}

impl DesiredMonitor {
    /// Whether this is a family-default (fallback) monitor.
    pub fn is_default(&self) -> bool {
        self.tags.iter().any(|t| t == "default_monitor:true")
    }
}

/// Identifier assigned to a monitor by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MonitorId(pub i64);

impl fmt::Display for MonitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A monitor as currently configured on the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LiveMonitor {
    pub id: MonitorId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: Vec<String>,
}

impl LiveMonitor {
    /// Whether this monitor was created by a sync and may be deleted by one.
    pub fn is_owned(&self) -> bool {
        self.tags.iter().any(|t| t == AUTOMATICALLY_CREATED)
    }
}

/// Kind of monitor created on the service. Only metric alerts are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MonitorType {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "metric alert"))]
    MetricAlert,
}

/// Options block of a monitor request.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonitorOptions {
    pub thresholds: Thresholds,
}

/// Full payload for a create or update call.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonitorRequest {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub monitor_type: MonitorType,
    pub query: String,
    pub message: String,
    pub tags: Vec<String>,
    pub options: MonitorOptions,
}

impl MonitorRequest {
    /// Build the payload for a desired monitor with the shared alert message.
    pub fn new(monitor: &DesiredMonitor, message: &str) -> Self {
        Self {
            name: monitor.name.clone(),
            monitor_type: MonitorType::MetricAlert,
            query: monitor.query.clone(),
            message: message.to_string(),
            tags: monitor.tags.clone(),
            options: MonitorOptions {
                thresholds: monitor.thresholds,
            },
        }
    }
}
