//! End-to-end runs: CSV table through planning into the in-memory backend.

use std::io::Write;

use monsync::adapters::memory::{ApiCall, InMemoryApi};
use monsync::types::{LiveMonitor, MonitorId, AUTOMATICALLY_CREATED};
use monsync::{sync, CsvSource, SyncError, SyncMode};
use tempfile::NamedTempFile;

const HEADER: &str =
    "Account_Name,pluginset_name,display_name,critical,warning,Instances_InstanceId,host_name";

const CPU_EXPLICIT: &str = "[Infra][Host] CPU 사용률 이상 알람 - 85, 70";
const CPU_DEFAULT: &str = "[Infra][Host] CPU 사용률 이상 알람 - Default";

fn table(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
    file
}

fn cpu_table() -> NamedTempFile {
    table(&[
        "acme,cpu,CPU,85,70,i-1,h1",
        "acme,cpu,CPU,85,70,i-2,h2",
    ])
}

async fn apply(file: &NamedTempFile, api: &InMemoryApi) -> monsync::SyncReport {
    let mut source = CsvSource::new(file.path());
    sync(&mut source, api, SyncMode::Apply).await.unwrap()
}

#[tokio::test]
async fn test_cpu_scenario() {
    let file = cpu_table();
    let api = InMemoryApi::new();

    let report = apply(&file, &api).await;
    assert_eq!(report.created(), 2);
    assert!(!report.has_failures());

    let explicit = api.request(CPU_EXPLICIT).unwrap();
    assert_eq!(
        explicit.query,
        "avg(last_5m):100 - avg:system.cpu.idle{NOT kube_node:* AND (name:h1 OR name:h2)} by {host} > 85"
    );
    assert_eq!(explicit.options.thresholds.critical, 85.0);
    assert_eq!(explicit.options.thresholds.warning, Some(70.0));

    let fallback = api.request(CPU_DEFAULT).unwrap();
    assert_eq!(
        fallback.query,
        "avg(last_5m):100 - avg:system.cpu.idle{!kube_node:*,!name:h1,!name:h2} by {host} > 90"
    );
    assert_eq!(fallback.options.thresholds.critical, 90.0);
    assert_eq!(fallback.options.thresholds.warning, Some(70.0));
    assert!(fallback.tags.contains(&"default_monitor:true".to_string()));
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let file = cpu_table();
    let api = InMemoryApi::new();

    apply(&file, &api).await;
    let live_after_first = api.monitors();
    api.clear_calls();

    let report = apply(&file, &api).await;
    assert_eq!(report.created(), 0);
    assert_eq!(report.updated(), 2);
    assert_eq!(report.deleted(), 0);
    assert_eq!(api.monitors(), live_after_first);
}

#[tokio::test]
async fn test_unowned_monitor_survives() {
    let file = cpu_table();
    let api = InMemoryApi::with_monitors([
        LiveMonitor {
            id: MonitorId(10),
            name: "Legacy Check".to_string(),
            tags: vec!["team:infra".to_string()],
        },
        LiveMonitor {
            id: MonitorId(11),
            name: "[Infra][Host] CPU 사용률 이상 알람 - 95, 90".to_string(),
            tags: vec![AUTOMATICALLY_CREATED.to_string()],
        },
    ]);

    let report = apply(&file, &api).await;
    assert_eq!(report.deleted(), 1);
    assert_eq!(report.retained, vec!["Legacy Check".to_string()]);

    let names: Vec<String> = api.monitors().into_iter().map(|m| m.name).collect();
    assert!(names.contains(&"Legacy Check".to_string()));
    assert!(!names.iter().any(|n| n.ends_with("95, 90")));
    assert!(!api.calls().contains(&ApiCall::Delete { id: MonitorId(10) }));
}

#[tokio::test]
async fn test_unsupported_family_is_skipped() {
    let file = table(&[
        "acme,gpu,GPU,80,60,i-1,h1",
        "acme,memory,Memory,90,80,i-1,h1",
    ]);
    let api = InMemoryApi::new();

    let report = apply(&file, &api).await;
    assert_eq!(report.created(), 2);
    assert_eq!(report.skipped.len(), 2);
    assert!(report.skipped.iter().all(|s| s.family == "gpu"));
    assert!(api
        .request("[Infra][Host] Memory 사용률 이상 알람 - 90, 80")
        .is_some());
}

#[tokio::test]
async fn test_disk_levels_are_fractions() {
    let file = table(&[
        "acme,Disk usage,/data,90,80,i-1,h1",
        "acme,Disk usage,/,85,85,i-2,h2",
    ]);
    let api = InMemoryApi::new();

    let report = apply(&file, &api).await;
    assert_eq!(report.created(), 4);

    let data = api
        .request("[Infra][Host] Disk 사용률 이상 알람 (/data) - 90, 80")
        .unwrap();
    assert_eq!(data.options.thresholds.critical, 0.9);
    assert_eq!(data.options.thresholds.warning, Some(0.8));
    assert_eq!(
        data.query,
        "avg(last_5m):system.disk.in_use{NOT kube_node:* AND (name:h1) AND device:/data} by {host} > 0.9"
    );

    let root = api
        .request("[Infra][Host] Disk 사용률 이상 알람 (/) - 85, 85")
        .unwrap();
    assert_eq!(root.options.thresholds.critical, 0.85);
    assert_eq!(root.options.thresholds.warning, None);

    let root_default = api
        .request("[Infra][Host] Disk 사용률 이상 알람 (/) - Default")
        .unwrap();
    assert_eq!(root_default.options.thresholds.critical, 0.8);
    assert_eq!(root_default.options.thresholds.warning, Some(0.7));

    let data_default = api
        .request("[Infra][Host] Disk 사용률 이상 알람 (/data) - Default")
        .unwrap();
    assert_eq!(data_default.options.thresholds.critical, 0.95);
    assert_eq!(data_default.options.thresholds.warning, Some(0.85));
}

#[tokio::test]
async fn test_default_excludes_every_explicit_host() {
    let file = table(&[
        "acme,iowait,IO,50,30,i-1,h3",
        "acme,iowait,IO,40,20,i-2,h1",
        "acme,iowait,IO,40,20,i-3,h1",
    ]);
    let api = InMemoryApi::new();

    apply(&file, &api).await;

    let fallback = api
        .request("[Infra][Host] IO Wait 이상 알람 - Default")
        .unwrap();
    assert_eq!(
        fallback.query,
        "avg(last_5m):avg:system.cpu.iowait{!kube_node:*,!name:h1,!name:h3} by {host} > 60"
    );
}

#[tokio::test]
async fn test_failed_create_does_not_stop_run() {
    let file = cpu_table();
    let api = InMemoryApi::new();
    api.fail_on(CPU_EXPLICIT);

    let report = apply(&file, &api).await;
    assert_eq!(report.created(), 1);
    assert_eq!(report.failures().count(), 1);
    assert!(api.request(CPU_DEFAULT).is_some());
}

#[tokio::test]
async fn test_failed_update_does_not_stop_run() {
    let file = cpu_table();
    let api = InMemoryApi::with_monitors([
        LiveMonitor {
            id: MonitorId(1),
            name: CPU_EXPLICIT.to_string(),
            tags: vec![AUTOMATICALLY_CREATED.to_string()],
        },
        LiveMonitor {
            id: MonitorId(2),
            name: "[Infra][Host] CPU 사용률 이상 알람 - 95, 90".to_string(),
            tags: vec![AUTOMATICALLY_CREATED.to_string()],
        },
    ]);
    api.fail_on(CPU_EXPLICIT);

    let report = apply(&file, &api).await;
    assert_eq!(report.created(), 1);
    assert_eq!(report.updated(), 0);
    assert_eq!(report.deleted(), 1);
    let failed: Vec<&str> = report.failures().map(|o| o.name.as_str()).collect();
    assert_eq!(failed, vec![CPU_EXPLICIT]);
    assert!(api.request(CPU_DEFAULT).is_some());
}

#[tokio::test]
async fn test_listing_failure_aborts() {
    let file = cpu_table();
    let api = InMemoryApi::new();
    api.fail_listing();

    let mut source = CsvSource::new(file.path());
    let err = sync(&mut source, &api, SyncMode::Apply).await.unwrap_err();
    assert!(matches!(err, SyncError::Listing { .. }));
    assert!(api.monitors().is_empty());
}

#[tokio::test]
async fn test_bad_input_makes_no_calls() {
    let file = table(&[
        "acme,cpu,CPU,85,70,i-1,h1",
        "acme,cpu,CPU,high,70,i-2,h2",
    ]);
    let api = InMemoryApi::new();

    let mut source = CsvSource::new(file.path());
    let err = sync(&mut source, &api, SyncMode::Apply).await.unwrap_err();
    assert!(matches!(err, SyncError::MalformedRow { line: 3, .. }));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_missing_table() {
    let api = InMemoryApi::new();
    let mut source = CsvSource::new("/nonexistent/threshold.csv");

    let err = sync(&mut source, &api, SyncMode::Apply).await.unwrap_err();
    assert!(err.is_input_error());
    assert!(api.calls().is_empty());
}
