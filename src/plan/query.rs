//! Query compilation.
//!
//! Each supported family has one query template over a 5-minute rolling
//! average, evaluated per host. Explicit monitors are scoped to the hosts of
//! their group; fallback monitors exclude every host that has an explicit
//! monitor for the same family and display name. Hosts tagged as cluster
//! nodes are always excluded.

use std::collections::BTreeSet;

use monsync_types::{DesiredMonitor, Family, MonitorTags, Thresholds, UnsupportedFamily};

use super::keys::{DefaultKey, ExplicitKey};
use super::thresholds;

/// Prefix shared by every generated monitor name.
pub const NAME_PREFIX: &str = "[Infra][Host]";

/// Scope term excluding cluster nodes in a positive (`AND`) filter.
const CLUSTER_NODE: &str = "kube_node:*";

/// Which hosts a query covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostScope<'a> {
    /// Hosts whose name matches any of these.
    Only(&'a [String]),
    /// Every host except these.
    Excluding(&'a BTreeSet<String>),
}

impl HostScope<'_> {
    /// Render the `{...}` scope of a metric, optionally pinned to a device.
    pub fn render(&self, device: Option<&str>) -> String {
        match self {
            HostScope::Only(hosts) => {
                let any = hosts
                    .iter()
                    .map(|h| format!("name:{}", h))
                    .collect::<Vec<_>>()
                    .join(" OR ");
                let mut scope = format!("NOT {} AND ({})", CLUSTER_NODE, any);
                if let Some(device) = device {
                    scope.push_str(&format!(" AND device:{}", device));
                }
                scope
            }
            HostScope::Excluding(hosts) => {
                let mut terms = vec![format!("!{}", CLUSTER_NODE)];
                terms.extend(hosts.iter().map(|h| format!("!name:{}", h)));
                if let Some(device) = device {
                    terms.push(format!("device:{}", device));
                }
                terms.join(",")
            }
        }
    }
}

/// The query shape of each family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryTemplate<'a> {
    /// `100 - idle`.
    CpuBusy,
    /// Usable over total memory, as a percentage.
    MemoryRatio,
    /// Direct I/O wait average.
    IoWait,
    /// In-use fraction of one device.
    DiskInUse { device: &'a str },
}

impl<'a> QueryTemplate<'a> {
    pub fn for_family(family: Family, display_name: &'a str) -> Self {
        match family {
            Family::Cpu => QueryTemplate::CpuBusy,
            Family::Memory => QueryTemplate::MemoryRatio,
            Family::IoWait => QueryTemplate::IoWait,
            Family::DiskUsage => QueryTemplate::DiskInUse {
                device: display_name,
            },
        }
    }

    /// Render the full alert query against `critical`.
    pub fn render(&self, scope: &HostScope<'_>, critical: f64) -> String {
        let critical = format_level(critical);
        match self {
            QueryTemplate::CpuBusy => format!(
                "avg(last_5m):100 - avg:system.cpu.idle{{{}}} by {{host}} > {}",
                scope.render(None),
                critical
            ),
            QueryTemplate::MemoryRatio => {
                let scope = scope.render(None);
                format!(
                    "avg(last_5m):avg:system.mem.usable{{{scope}}} by {{host}} / avg:system.mem.total{{{scope}}} by {{host}} * 100 > {critical}"
                )
            }
            QueryTemplate::IoWait => format!(
                "avg(last_5m):avg:system.cpu.iowait{{{}}} by {{host}} > {}",
                scope.render(None),
                critical
            ),
            QueryTemplate::DiskInUse { device } => format!(
                "avg(last_5m):system.disk.in_use{{{}}} by {{host}} > {}",
                scope.render(Some(*device)),
                critical
            ),
        }
    }
}

/// Name tier: explicit levels, or the family default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Explicit { critical: i64, warning: i64 },
    Default,
}

/// Deterministic monitor name. This string is the monitor's identity on the
/// service; changing it turns every existing monitor into a delete + create.
pub fn monitor_name(family: Family, display_name: &str, tier: Tier) -> String {
    let title = match family {
        Family::Cpu => "CPU 사용률 이상 알람",
        Family::Memory => "Memory 사용률 이상 알람",
        Family::IoWait => "IO Wait 이상 알람",
        Family::DiskUsage => "Disk 사용률 이상 알람",
    };

    let mut name = format!("{} {}", NAME_PREFIX, title);
    if family == Family::DiskUsage {
        name.push_str(&format!(" ({})", display_name));
    }
    match tier {
        Tier::Explicit { critical, warning } => {
            name.push_str(&format!(" - {}, {}", critical, warning))
        }
        Tier::Default => name.push_str(" - Default"),
    }
    name
}

/// Compile the monitor for an explicit group.
pub fn compile_explicit(
    key: &ExplicitKey,
    hosts: &[String],
) -> Result<DesiredMonitor, UnsupportedFamily> {
    let family: Family = key.family.parse()?;
    let thresholds = thresholds::resolve(family, key.critical, key.warning);
    let tier = Tier::Explicit {
        critical: key.critical,
        warning: key.warning,
    };

    Ok(build(
        family,
        &key.display_name,
        tier,
        &HostScope::Only(hosts),
        thresholds,
    ))
}

/// Compile the fallback monitor for a default group.
pub fn compile_default(
    key: &DefaultKey,
    covered_hosts: &BTreeSet<String>,
) -> Result<DesiredMonitor, UnsupportedFamily> {
    let family: Family = key.family.parse()?;
    let thresholds = thresholds::resolve_default(family, &key.display_name);

    Ok(build(
        family,
        &key.display_name,
        Tier::Default,
        &HostScope::Excluding(covered_hosts),
        thresholds,
    ))
}

fn build(
    family: Family,
    display_name: &str,
    tier: Tier,
    scope: &HostScope<'_>,
    thresholds: Thresholds,
) -> DesiredMonitor {
    let query = QueryTemplate::for_family(family, display_name).render(scope, thresholds.critical);

    DesiredMonitor {
        name: monitor_name(family, display_name, tier),
        query,
        tags: MonitorTags::new(family, tier == Tier::Default).into_vec(),
        thresholds,
    }
}

/// Render a level the way the service's query language expects: integers
/// without a fractional part, fractions in shortest form.
///
/// A whole disk level renders as `1`, not `1.0`. The service treats both the
/// same; keep this form so existing queries are not rewritten.
fn format_level(value: f64) -> String {
    format!("{}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hosts(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn explicit(family: &str, display: &str, critical: i64, warning: i64) -> ExplicitKey {
        ExplicitKey {
            family: family.to_string(),
            display_name: display.to_string(),
            critical,
            warning,
        }
    }

    fn default_key(family: &str, display: &str) -> DefaultKey {
        DefaultKey {
            family: family.to_string(),
            display_name: display.to_string(),
        }
    }

    #[test]
    fn test_only_scope() {
        let list = hosts(&["h1", "h2"]);
        assert_eq!(
            HostScope::Only(&list).render(None),
            "NOT kube_node:* AND (name:h1 OR name:h2)"
        );
        assert_eq!(
            HostScope::Only(&list).render(Some("/data")),
            "NOT kube_node:* AND (name:h1 OR name:h2) AND device:/data"
        );
    }

    #[test]
    fn test_excluding_scope() {
        let set: BTreeSet<String> = hosts(&["h2", "h1"]).into_iter().collect();
        assert_eq!(
            HostScope::Excluding(&set).render(None),
            "!kube_node:*,!name:h1,!name:h2"
        );
        assert_eq!(
            HostScope::Excluding(&set).render(Some("/")),
            "!kube_node:*,!name:h1,!name:h2,device:/"
        );
    }

    #[test]
    fn test_explicit_cpu_monitor() {
        let monitor =
            compile_explicit(&explicit("cpu", "CPU", 85, 70), &hosts(&["h1", "h2"])).unwrap();

        assert_eq!(monitor.name, "[Infra][Host] CPU 사용률 이상 알람 - 85, 70");
        assert_eq!(
            monitor.query,
            "avg(last_5m):100 - avg:system.cpu.idle{NOT kube_node:* AND (name:h1 OR name:h2)} by {host} > 85"
        );
        assert_eq!(monitor.thresholds, Thresholds::pair(85.0, 70.0));
        assert!(!monitor.is_default());
        assert!(monitor.tags.contains(&"pluginset_name:cpu".to_string()));
    }

    #[test]
    fn test_explicit_memory_monitor_uses_ratio() {
        let monitor =
            compile_explicit(&explicit("memory", "Mem", 90, 90), &hosts(&["db"])).unwrap();

        assert_eq!(monitor.name, "[Infra][Host] Memory 사용률 이상 알람 - 90, 90");
        assert_eq!(
            monitor.query,
            "avg(last_5m):avg:system.mem.usable{NOT kube_node:* AND (name:db)} by {host} / avg:system.mem.total{NOT kube_node:* AND (name:db)} by {host} * 100 > 90"
        );
        assert_eq!(monitor.thresholds, Thresholds::critical_only(90.0));
    }

    #[test]
    fn test_explicit_iowait_monitor() {
        let monitor = compile_explicit(&explicit("iowait", "IO", 50, 30), &hosts(&["a"])).unwrap();
        assert_eq!(monitor.name, "[Infra][Host] IO Wait 이상 알람 - 50, 30");
        assert_eq!(
            monitor.query,
            "avg(last_5m):avg:system.cpu.iowait{NOT kube_node:* AND (name:a)} by {host} > 50"
        );
    }

    #[test]
    fn test_explicit_disk_monitor_embeds_mount_and_fraction() {
        let monitor =
            compile_explicit(&explicit("Disk usage", "/data", 85, 70), &hosts(&["a"])).unwrap();

        assert_eq!(
            monitor.name,
            "[Infra][Host] Disk 사용률 이상 알람 (/data) - 85, 70"
        );
        assert_eq!(
            monitor.query,
            "avg(last_5m):system.disk.in_use{NOT kube_node:* AND (name:a) AND device:/data} by {host} > 0.85"
        );
        assert_eq!(monitor.thresholds, Thresholds::pair(0.85, 0.7));
    }

    #[test]
    fn test_default_cpu_monitor() {
        let covered: BTreeSet<String> = hosts(&["h1", "h2"]).into_iter().collect();
        let monitor = compile_default(&default_key("cpu", "CPU"), &covered).unwrap();

        assert_eq!(monitor.name, "[Infra][Host] CPU 사용률 이상 알람 - Default");
        assert_eq!(
            monitor.query,
            "avg(last_5m):100 - avg:system.cpu.idle{!kube_node:*,!name:h1,!name:h2} by {host} > 90"
        );
        assert_eq!(monitor.thresholds, Thresholds::pair(90.0, 70.0));
        assert!(monitor.is_default());
    }

    #[test]
    fn test_default_disk_monitor_for_root() {
        let covered: BTreeSet<String> = hosts(&["a"]).into_iter().collect();
        let monitor = compile_default(&default_key("Disk usage", "/"), &covered).unwrap();

        assert_eq!(monitor.name, "[Infra][Host] Disk 사용률 이상 알람 (/) - Default");
        assert_eq!(
            monitor.query,
            "avg(last_5m):system.disk.in_use{!kube_node:*,!name:a,device:/} by {host} > 0.8"
        );
        assert_eq!(monitor.thresholds, Thresholds::pair(0.8, 0.7));
    }

    #[test]
    fn test_unsupported_family() {
        let err = compile_explicit(&explicit("gpu", "GPU", 90, 80), &hosts(&["a"])).unwrap_err();
        assert_eq!(err, UnsupportedFamily("gpu".to_string()));

        let covered = BTreeSet::new();
        assert!(compile_default(&default_key("gpu", "GPU"), &covered).is_err());
    }

    #[test]
    fn test_format_level() {
        assert_eq!(format_level(85.0), "85");
        assert_eq!(format_level(0.95), "0.95");
        assert_eq!(format_level(0.07), "0.07");
        assert_eq!(format_level(1.0), "1");
    }
}
