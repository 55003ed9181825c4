//! Datadog adapter using the v1 monitors HTTP API.
//!
//! ## Endpoints
//!
//! - `GET /api/v1/monitor` - list every monitor
//! - `POST /api/v1/monitor` - create a monitor
//! - `PUT /api/v1/monitor/{id}` - replace a monitor's definition
//! - `DELETE /api/v1/monitor/{id}` - delete a monitor
//!
//! Requests carry the `DD-API-KEY` and `DD-APPLICATION-KEY` headers.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use monsync_adapters::datadog::DatadogClient;
//!
//! let client = DatadogClient::builder()
//!     .endpoint("https://api.datadoghq.eu")
//!     .api_key("api-key")
//!     .app_key("app-key")
//!     .timeout(Duration::from_secs(30))
//!     .build()
//!     .expect("valid settings");
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

use monsync_types::{LiveMonitor, MonitorId, MonitorRequest};

use crate::{AdapterError, MonitoringApi};

const API_KEY_HEADER: &str = "DD-API-KEY";
const APP_KEY_HEADER: &str = "DD-APPLICATION-KEY";

/// Default API site.
pub const DEFAULT_ENDPOINT: &str = "https://api.datadoghq.com";

/// Datadog monitors client.
#[derive(Debug, Clone)]
pub struct DatadogClient {
    client: Client,
    endpoint: String,
    api_key: String,
    app_key: String,
}

impl DatadogClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> DatadogClientBuilder {
        DatadogClientBuilder::default()
    }

    /// The API base URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn monitors_url(&self) -> String {
        format!("{}/api/v1/monitor", self.endpoint)
    }

    fn monitor_url(&self, id: MonitorId) -> String {
        format!("{}/api/v1/monitor/{}", self.endpoint, id)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header(API_KEY_HEADER, &self.api_key)
            .header(APP_KEY_HEADER, &self.app_key)
    }
}

#[async_trait]
impl MonitoringApi for DatadogClient {
    async fn list_monitors(&self) -> Result<Vec<LiveMonitor>, AdapterError> {
        let response = self
            .authorized(self.client.get(self.monitors_url()))
            .send()
            .await?;
        let response = check_status(response, "list monitors").await?;

        let monitors: Vec<LiveMonitor> = response
            .json()
            .await
            .map_err(|e| AdapterError::Parse(e.to_string()))?;

        tracing::debug!(count = monitors.len(), "Listed monitors");
        Ok(monitors)
    }

    async fn create_monitor(&self, request: &MonitorRequest) -> Result<MonitorId, AdapterError> {
        let response = self
            .authorized(self.client.post(self.monitors_url()))
            .json(request)
            .send()
            .await?;
        let response = check_status(response, &request.name).await?;

        let created: CreatedMonitor = response
            .json()
            .await
            .map_err(|e| AdapterError::Parse(e.to_string()))?;

        Ok(created.id)
    }

    async fn update_monitor(
        &self,
        id: MonitorId,
        request: &MonitorRequest,
    ) -> Result<(), AdapterError> {
        let response = self
            .authorized(self.client.put(self.monitor_url(id)))
            .json(request)
            .send()
            .await?;
        check_status(response, &request.name).await?;
        Ok(())
    }

    async fn delete_monitor(&self, id: MonitorId) -> Result<(), AdapterError> {
        let response = self
            .authorized(self.client.delete(self.monitor_url(id)))
            .send()
            .await?;
        check_status(response, &format!("monitor {id}")).await?;
        Ok(())
    }
}

/// Map non-success statuses onto [`AdapterError`].
async fn check_status(response: Response, subject: &str) -> Result<Response, AdapterError> {
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(AdapterError::Auth(format!("{} ({})", subject, status)));
    }

    if status == StatusCode::NOT_FOUND {
        return Err(AdapterError::NotFound(subject.to_string()));
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AdapterError::Api {
            status: status.as_u16(),
            body,
        });
    }

    Ok(response)
}

/// Builder for DatadogClient.
#[derive(Debug, Default)]
pub struct DatadogClientBuilder {
    endpoint: Option<String>,
    api_key: Option<String>,
    app_key: Option<String>,
    timeout: Option<Duration>,
    accept_invalid_certs: bool,
}

impl DatadogClientBuilder {
    /// Set the API base URL (default: "https://api.datadoghq.com").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the application key.
    pub fn app_key(mut self, key: impl Into<String>) -> Self {
        self.app_key = Some(key.into());
        self
    }

    /// Set the request timeout (default: 30 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Skip TLS certificate verification. Only for environments with
    /// intercepting proxies; off by default.
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<DatadogClient, AdapterError> {
        let api_key = non_empty(self.api_key, "api_key")?;
        let app_key = non_empty(self.app_key, "app_key")?;
        let timeout = self.timeout.unwrap_or(Duration::from_secs(30));

        if self.accept_invalid_certs {
            tracing::warn!("TLS certificate verification is disabled");
        }

        let client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .build()
            .map_err(|e| AdapterError::Config(e.to_string()))?;

        let endpoint = self
            .endpoint
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(DatadogClient {
            client,
            endpoint,
            api_key,
            app_key,
        })
    }
}

fn non_empty(value: Option<String>, field: &str) -> Result<String, AdapterError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AdapterError::Config(format!("{} is required", field)))
}

/// Response body of a create call; only the id is used.
#[derive(Debug, Deserialize)]
struct CreatedMonitor {
    id: MonitorId,
}
