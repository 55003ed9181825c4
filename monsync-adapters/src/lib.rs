//! # monsync-adapters
//!
//! Backends implementing the [`MonitoringApi`] capability consumed by the
//! monsync reconciliation engine.
//!
//! ## Supported Backends
//!
//! - **Datadog** (`datadog` feature, on by default) - lists, creates, updates
//!   and deletes monitors through the v1 monitors HTTP API
//! - **In-memory** ([`memory::InMemoryApi`]) - keeps monitors in process;
//!   used for dry runs and tests
//!
//! ## Quick Start (Datadog)
//!
//! ```rust,no_run
//! use monsync_adapters::datadog::DatadogClient;
//! use monsync_adapters::MonitoringApi;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DatadogClient::builder()
//!         .api_key("api-key")
//!         .app_key("app-key")
//!         .build()?;
//!
//!     let monitors = client.list_monitors().await?;
//!     println!("{} monitors configured", monitors.len());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod memory;

#[cfg(feature = "datadog")]
pub mod datadog;

use async_trait::async_trait;

pub use error::AdapterError;

// Re-export types for convenience
pub use monsync_types::{LiveMonitor, MonitorId, MonitorRequest};

/// List/create/update/delete surface of a remote monitoring service.
///
/// Every call is independent: a failure is returned to the caller and never
/// retried by the adapter.
#[async_trait]
pub trait MonitoringApi: Send + Sync {
    /// Fetch every monitor currently configured.
    async fn list_monitors(&self) -> Result<Vec<LiveMonitor>, AdapterError>;

    /// Create a monitor and return the identifier assigned by the service.
    async fn create_monitor(&self, request: &MonitorRequest) -> Result<MonitorId, AdapterError>;

    /// Replace the definition of an existing monitor.
    async fn update_monitor(
        &self,
        id: MonitorId,
        request: &MonitorRequest,
    ) -> Result<(), AdapterError>;

    /// Delete a monitor.
    async fn delete_monitor(&self, id: MonitorId) -> Result<(), AdapterError>;
}
