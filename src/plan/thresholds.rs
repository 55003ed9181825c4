//! Threshold policy.
//!
//! Table thresholds are whole numbers. Disk usage is compared by the service
//! against an in-use fraction, so its levels are divided by 100. A warning
//! equal to critical is dropped.

use monsync_types::{Family, Thresholds};

/// Mount point whose default disk levels are stricter than other mounts.
pub const ROOT_MOUNT: &str = "/";

/// Thresholds for an explicit (table-driven) monitor.
pub fn resolve(family: Family, critical: i64, warning: i64) -> Thresholds {
    let critical = scale(family, critical);
    let warning = scale(family, warning);

    if critical == warning {
        Thresholds::critical_only(critical)
    } else {
        Thresholds::pair(critical, warning)
    }
}

/// Fixed `(critical, warning)` levels of a family's fallback monitor, in table units.
pub fn default_levels(family: Family, display_name: &str) -> (i64, i64) {
    match family {
        Family::Cpu => (90, 70),
        Family::Memory => (95, 85),
        Family::IoWait => (60, 20),
        Family::DiskUsage if display_name == ROOT_MOUNT => (80, 70),
        Family::DiskUsage => (95, 85),
    }
}

/// Thresholds for a family's fallback monitor.
pub fn resolve_default(family: Family, display_name: &str) -> Thresholds {
    let (critical, warning) = default_levels(family, display_name);
    resolve(family, critical, warning)
}

fn scale(family: Family, value: i64) -> f64 {
    if family.is_fractional() {
        value as f64 / 100.0
    } else {
        value as f64
    }
}
