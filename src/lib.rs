//! # monsync
//!
//! Keeps the alerting rules of a monitoring service in step with a threshold
//! table. Each run is a stateless, single pass: the table is the desired
//! state, the service's current monitors are the only other state.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────────┐   ┌──────────────┐   ┌──────────────┐
//! │  source  │──▶│     plan      │──▶│  reconcile   │──▶│ MonitoringApi│
//! │ (rows)   │   │ (DesiredSet)  │   │  (SyncPlan)  │   │  (adapters)  │
//! └──────────┘   └───────────────┘   └──────┬───────┘   └──────┬───────┘
//!                                           ▲   live listing   │
//!                                           └──────────────────┘
//! ```
//!
//! - **[`source`]**: [`RowSource`] trait with CSV and in-memory implementations
//! - **[`plan`]**: groups rows, applies the threshold policy and compiles one
//!   query per monitor into a [`DesiredSet`]
//! - **[`reconcile`]**: diffs the desired set against the live listing and
//!   applies creates, updates and deletes with per-monitor failure isolation
//! - **[`config`]**: layered [`Settings`] (defaults, TOML file, environment)
//!
//! ## Ownership
//!
//! Only monitors tagged `automatically_created:true` are ever deleted.
//! Monitors authored by hand survive every sync.
//!
//! ## Usage
//!
//! ```
//! use monsync::{sync, MemorySource, SyncMode};
//! use monsync::adapters::memory::InMemoryApi;
//! use monsync::types::Row;
//!
//! # tokio_test::block_on(async {
//! let rows = vec![Row {
//!     account: "acme".into(),
//!     family: "cpu".into(),
//!     display_name: "CPU".into(),
//!     critical: 85,
//!     warning: 70,
//!     instance_id: "i-0abc".into(),
//!     host_name: "web-1".into(),
//! }];
//!
//! let api = InMemoryApi::new();
//! let report = sync(&mut MemorySource::new(rows), &api, SyncMode::Apply)
//!     .await
//!     .unwrap();
//!
//! // one explicit monitor plus the cpu fallback
//! assert_eq!(report.created(), 2);
//! # });
//! ```

pub mod config;
pub mod error;
pub mod message;
pub mod plan;
pub mod reconcile;
pub mod source;
pub mod sync;

pub use monsync_adapters as adapters;
pub use monsync_types as types;

// Re-export main types for convenience
pub use crate::config::Settings;
pub use error::{Result, SyncError};
pub use plan::{DesiredSet, SkippedGroup};
pub use reconcile::{ActionKind, ActionOutcome, SyncPlan, SyncReport};
pub use source::{CsvSource, MemorySource, RowSource};
pub use sync::{run, sync, SyncMode};
