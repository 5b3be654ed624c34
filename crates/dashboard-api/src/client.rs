//! HTTP client for the bot backend.
//!
//! Every endpoint the dashboard uses is a method on [`MonitorApi`]. The
//! coordinator and feeds in `dashboard-runtime` are generic over the trait so
//! tests can substitute an in-memory backend.

use std::future::Future;
use std::time::Duration;

use dashboard_core::models::{
    Account, AccountsResponse, CommandAck, LogsResponse, MonitoringConfig, MonitoringStats,
};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{ApiError, ApiResult};

/// Per-request timeout applied by [`HttpApiClient::new`].
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

// ── MonitorApi ────────────────────────────────────────────────────────────────

/// Operations exposed by the remote monitoring backend.
pub trait MonitorApi: Send + Sync + 'static {
    /// `POST /monitor/start` with the full configuration.
    fn start_monitoring(
        &self,
        config: &MonitoringConfig,
    ) -> impl Future<Output = ApiResult<CommandAck>> + Send;

    /// `POST /monitor/stop`.
    fn stop_monitoring(&self) -> impl Future<Output = ApiResult<CommandAck>> + Send;

    /// `GET /monitor/status`.
    fn get_status(&self) -> impl Future<Output = ApiResult<MonitoringStats>> + Send;

    /// `GET /logs?limit=N`.
    fn get_logs(&self, limit: usize) -> impl Future<Output = ApiResult<Vec<String>>> + Send;

    /// `POST /logs/clear`.
    fn clear_logs(&self) -> impl Future<Output = ApiResult<()>> + Send;

    /// `GET /logs/analysis`, returning the raw CSV bytes.
    fn download_analysis_log(&self) -> impl Future<Output = ApiResult<Vec<u8>>> + Send;

    /// `GET /accounts`.
    fn get_accounts(&self) -> impl Future<Output = ApiResult<AccountsResponse>> + Send;

    /// `POST /accounts`.
    fn add_account(&self, account: &Account) -> impl Future<Output = ApiResult<()>> + Send;

    /// `DELETE /accounts/:username`.
    fn remove_account(&self, username: &str) -> impl Future<Output = ApiResult<()>> + Send;
}

// ── HttpApiClient ─────────────────────────────────────────────────────────────

/// [`MonitorApi`] over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    http: Client,
    base: Url,
}

impl HttpApiClient {
    /// Build a client for `base_url` with the default timeout and user agent.
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("bot-dashboard/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|source| ApiError::Request {
                path: base_url.to_string(),
                source,
            })?;
        Self::with_http_client(base_url, http)
    }

    /// Build a client around a preconfigured `reqwest::Client`.
    pub fn with_http_client(base_url: &str, http: Client) -> ApiResult<Self> {
        let base = Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "URL cannot carry a path".to_string(),
            });
        }
        tracing::debug!(base = %base, "api client created");
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(&self, path: &str, request: RequestBuilder) -> ApiResult<Response> {
        tracing::debug!(path, "sending backend request");
        let response = request
            .send()
            .await
            .map_err(|source| request_error(path, source))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(path, %status, "backend returned error status");
            return Err(ApiError::Status {
                status,
                path: path.to_string(),
            });
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> ApiResult<T> {
        self.send(path, request)
            .await?
            .json::<T>()
            .await
            .map_err(|source| request_error(path, source))
    }
}

impl MonitorApi for HttpApiClient {
    async fn start_monitoring(&self, config: &MonitoringConfig) -> ApiResult<CommandAck> {
        let request = self.http.post(self.url(&["monitor", "start"])).json(config);
        self.send_json("/monitor/start", request).await
    }

    async fn stop_monitoring(&self) -> ApiResult<CommandAck> {
        let request = self.http.post(self.url(&["monitor", "stop"]));
        self.send_json("/monitor/stop", request).await
    }

    async fn get_status(&self) -> ApiResult<MonitoringStats> {
        let request = self.http.get(self.url(&["monitor", "status"]));
        self.send_json("/monitor/status", request).await
    }

    async fn get_logs(&self, limit: usize) -> ApiResult<Vec<String>> {
        let request = self
            .http
            .get(self.url(&["logs"]))
            .query(&[("limit", limit)]);
        let body: LogsResponse = self.send_json("/logs", request).await?;
        Ok(body.logs)
    }

    async fn clear_logs(&self) -> ApiResult<()> {
        let request = self.http.post(self.url(&["logs", "clear"]));
        self.send("/logs/clear", request).await?;
        Ok(())
    }

    async fn download_analysis_log(&self) -> ApiResult<Vec<u8>> {
        let path = "/logs/analysis";
        let request = self.http.get(self.url(&["logs", "analysis"]));
        let bytes = self
            .send(path, request)
            .await?
            .bytes()
            .await
            .map_err(|source| request_error(path, source))?;
        Ok(bytes.to_vec())
    }

    async fn get_accounts(&self) -> ApiResult<AccountsResponse> {
        let request = self.http.get(self.url(&["accounts"]));
        self.send_json("/accounts", request).await
    }

    async fn add_account(&self, account: &Account) -> ApiResult<()> {
        let request = self.http.post(self.url(&["accounts"])).json(account);
        self.send("/accounts", request).await?;
        Ok(())
    }

    async fn remove_account(&self, username: &str) -> ApiResult<()> {
        let path = format!("/accounts/{username}");
        let request = self.http.delete(self.url(&["accounts", username]));
        self.send(&path, request).await?;
        Ok(())
    }
}

/// Connection-level failures become [`ApiError::Unavailable`]; everything
/// else keeps the underlying `reqwest` error.
fn request_error(path: &str, source: reqwest::Error) -> ApiError {
    if source.is_connect() || source.is_timeout() {
        ApiError::Unavailable(format!("{path}: {source}"))
    } else {
        ApiError::Request {
            path: path.to_string(),
            source,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
