//! # monsync-types
//!
//! Core types shared by the monsync reconciliation engine and the adapters
//! that talk to a remote monitoring service.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: the model works without any serialization framework
//! - **Optional serialization**: enable `serde` to get the wire shape used by adapters
//! - **Closed family set**: metric families are an enum, not free-form strings
//!
//! ## Example
//!
//! ```rust
//! use monsync_types::{DesiredMonitor, Family, Thresholds, MonitorTags};
//!
//! let thresholds = Thresholds::pair(85.0, 70.0);
//! let monitor = DesiredMonitor {
//!     name: "cpu - 85, 70".to_string(),
//!     query: "avg(last_5m):avg:system.cpu.user{*} > 85".to_string(),
//!     tags: MonitorTags::new(Family::Cpu, false).into_vec(),
//!     thresholds,
//! };
//!
//! assert_eq!(monitor.tags.len(), 4);
//! assert!(monitor.tags.iter().any(|t| t == "automatically_created:true"));
//! ```

mod family;
mod monitor;
mod row;

pub use family::*;
pub use monitor::*;
pub use row::*;
