//! In-memory monitoring backend.
//!
//! Keeps monitors in process and records every call made against it. Used by
//! dry runs without credentials and by tests, where individual monitors can
//! be made to fail.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;

use monsync_types::{LiveMonitor, MonitorId, MonitorRequest};

use crate::{AdapterError, MonitoringApi};

/// A call received by [`InMemoryApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    List,
    Create { name: String },
    Update { id: MonitorId, name: String },
    Delete { id: MonitorId },
}

#[derive(Debug, Default)]
struct State {
    monitors: BTreeMap<MonitorId, StoredMonitor>,
    next_id: i64,
    failing: HashSet<String>,
    fail_listing: bool,
    calls: Vec<ApiCall>,
}

#[derive(Debug, Clone)]
struct StoredMonitor {
    live: LiveMonitor,
    request: Option<MonitorRequest>,
}

/// Monitoring backend that lives entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryApi {
    state: Mutex<State>,
}

impl InMemoryApi {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend pre-populated with existing monitors.
    pub fn with_monitors(monitors: impl IntoIterator<Item = LiveMonitor>) -> Self {
        let mut state = State::default();
        for live in monitors {
            state.next_id = state.next_id.max(live.id.0);
            state.monitors.insert(
                live.id,
                StoredMonitor {
                    live,
                    request: None,
                },
            );
        }
        Self {
            state: Mutex::new(state),
        }
    }

    /// Make every mutating call touching the named monitor fail.
    pub fn fail_on(&self, name: impl Into<String>) {
        self.state.lock().failing.insert(name.into());
    }

    /// Make `list_monitors` fail.
    pub fn fail_listing(&self) {
        self.state.lock().fail_listing = true;
    }

    /// Current monitors, ordered by id.
    pub fn monitors(&self) -> Vec<LiveMonitor> {
        self.state
            .lock()
            .monitors
            .values()
            .map(|m| m.live.clone())
            .collect()
    }

    /// The last payload stored for a monitor, if it was created or updated here.
    pub fn request(&self, name: &str) -> Option<MonitorRequest> {
        self.state
            .lock()
            .monitors
            .values()
            .find(|m| m.live.name == name)
            .and_then(|m| m.request.clone())
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().calls.clone()
    }

    /// Forget recorded calls, keeping monitors.
    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }
}

impl State {
    fn check(&self, name: &str) -> Result<(), AdapterError> {
        if self.failing.contains(name) {
            return Err(AdapterError::Rejected(format!("{} is configured to fail", name)));
        }
        Ok(())
    }
}

#[async_trait]
impl MonitoringApi for InMemoryApi {
    async fn list_monitors(&self) -> Result<Vec<LiveMonitor>, AdapterError> {
        let mut state = self.state.lock();
        state.calls.push(ApiCall::List);
        if state.fail_listing {
            return Err(AdapterError::Connection("listing disabled".to_string()));
        }
        Ok(state.monitors.values().map(|m| m.live.clone()).collect())
    }

    async fn create_monitor(&self, request: &MonitorRequest) -> Result<MonitorId, AdapterError> {
        let mut state = self.state.lock();
        state.calls.push(ApiCall::Create {
            name: request.name.clone(),
        });
        state.check(&request.name)?;

        state.next_id += 1;
        let id = MonitorId(state.next_id);
        state.monitors.insert(
            id,
            StoredMonitor {
                live: LiveMonitor {
                    id,
                    name: request.name.clone(),
                    tags: request.tags.clone(),
                },
                request: Some(request.clone()),
            },
        );
        Ok(id)
    }

    async fn update_monitor(
        &self,
        id: MonitorId,
        request: &MonitorRequest,
    ) -> Result<(), AdapterError> {
        let mut state = self.state.lock();
        state.calls.push(ApiCall::Update {
            id,
            name: request.name.clone(),
        });
        state.check(&request.name)?;

        let stored = state
            .monitors
            .get_mut(&id)
            .ok_or_else(|| AdapterError::NotFound(format!("monitor {}", id)))?;
        stored.live.name = request.name.clone();
        stored.live.tags = request.tags.clone();
        stored.request = Some(request.clone());
        Ok(())
    }

    async fn delete_monitor(&self, id: MonitorId) -> Result<(), AdapterError> {
        let mut state = self.state.lock();
        state.calls.push(ApiCall::Delete { id });

        let name = state
            .monitors
            .get(&id)
            .map(|m| m.live.name.clone())
            .ok_or_else(|| AdapterError::NotFound(format!("monitor {}", id)))?;
        state.check(&name)?;

        state.monitors.remove(&id);
        Ok(())
    }
}
