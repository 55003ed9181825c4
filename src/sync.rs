//! One full sync pass: read, plan, apply.

use monsync_adapters::memory::InMemoryApi;
use monsync_adapters::MonitoringApi;
use tracing::{info, warn};

use crate::config::Settings;
use crate::error::{Result, SyncError};
use crate::message::ALERT_MESSAGE;
use crate::plan::DesiredSet;
use crate::reconcile::{SyncPlan, SyncReport};
use crate::source::{CsvSource, RowSource};

/// Whether planned changes are sent to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    #[default]
    Apply,
    DryRun,
}

/// Reconcile the monitors behind `api` with the rows of `source`.
///
/// The table is read and compiled before the service is contacted, so an
/// input error never leads to a partial sync. A listing failure is fatal;
/// individual create/update/delete failures are recorded in the report.
pub async fn sync(
    source: &mut dyn RowSource,
    api: &dyn MonitoringApi,
    mode: SyncMode,
) -> Result<SyncReport> {
    info!(source = source.description(), ?mode, "Starting monitor sync");

    let rows = source.read_rows()?;
    let desired = DesiredSet::from_rows(&rows)?;
    info!(
        rows = rows.len(),
        monitors = desired.len(),
        skipped = desired.skipped().len(),
        "Compiled threshold table"
    );

    let live = api
        .list_monitors()
        .await
        .map_err(|source| SyncError::Listing { source })?;
    info!(live = live.len(), "Fetched live monitors");

    let plan = SyncPlan::compute(&desired, &live);
    if plan.is_empty() {
        info!("Nothing to change");
    }
    let mut report = match mode {
        SyncMode::Apply => plan.execute(api, ALERT_MESSAGE).await,
        SyncMode::DryRun => plan.preview(),
    };
    report.skipped = desired.skipped().to_vec();

    info!("Sync finished: {}", report);
    Ok(report)
}

/// Run a sync as configured by `settings`.
///
/// A dry run without credentials plans against an empty monitor list.
pub async fn run(settings: &Settings, mode: SyncMode) -> Result<SyncReport> {
    let mut source = CsvSource::new(&settings.input);

    if mode == SyncMode::DryRun && !settings.datadog.has_credentials() {
        warn!("No Datadog credentials configured, planning against an empty monitor list");
        let api = InMemoryApi::new();
        return sync(&mut source, &api, mode).await;
    }

    let client = settings.datadog.connect()?;
    sync(&mut source, &client, mode).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use monsync_adapters::memory::ApiCall;
    use monsync_types::Row;

    fn rows() -> Vec<Row> {
        vec![Row {
            account: "acme".to_string(),
            family: "iowait".to_string(),
            display_name: "IO".to_string(),
            critical: 50,
            warning: 30,
            instance_id: "i-1".to_string(),
            host_name: "h1".to_string(),
        }]
    }

    #[tokio::test]
    async fn test_sync_applies_plan() {
        let api = InMemoryApi::new();
        let mut source = MemorySource::new(rows());

        let report = sync(&mut source, &api, SyncMode::Apply).await.unwrap();
        assert_eq!(report.created(), 2);
        assert_eq!(api.monitors().len(), 2);
    }

    #[tokio::test]
    async fn test_dry_run_only_lists() {
        let api = InMemoryApi::new();
        let mut source = MemorySource::new(rows());

        let report = sync(&mut source, &api, SyncMode::DryRun).await.unwrap();
        assert!(report.dry_run);
        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(api.calls(), vec![ApiCall::List]);
    }

    #[tokio::test]
    async fn test_listing_failure_is_fatal() {
        let api = InMemoryApi::new();
        api.fail_listing();
        let mut source = MemorySource::new(rows());

        let err = sync(&mut source, &api, SyncMode::Apply).await.unwrap_err();
        assert!(matches!(err, SyncError::Listing { .. }));
        assert!(api.monitors().is_empty());
    }
}
