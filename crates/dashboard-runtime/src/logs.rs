//! Live log feed and AI analysis export.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use dashboard_api::MonitorApi;
use dashboard_core::logs::{parse_analysis_csv, CsvLogEntry, ANALYSIS_LOG_FILENAME, DEFAULT_LOG_LIMIT};
use dashboard_core::DashboardError;

use crate::error::SessionError;
use crate::poller::{spawn_periodic, PollHandle};

/// Default period of [`LogsFeed::start_auto_refresh`].
pub const DEFAULT_LOG_REFRESH: Duration = Duration::from_secs(60);

/// Cached log views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogsState {
    /// Most recent live lines, newest last as served by the backend.
    pub lines: Vec<String>,
    /// Rows of the last loaded analysis export.
    pub analysis: Vec<CsvLogEntry>,
    /// Line limit used by refreshes.
    pub limit: usize,
    pub loading: bool,
    pub refreshing: bool,
}

impl Default for LogsState {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            analysis: Vec::new(),
            limit: DEFAULT_LOG_LIMIT,
            loading: false,
            refreshing: false,
        }
    }
}

fn lock(state: &Mutex<LogsState>) -> MutexGuard<'_, LogsState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fetch live lines and cache them. An empty response keeps the old cache.
async fn fetch_into<A: MonitorApi>(
    api: &A,
    state: &Mutex<LogsState>,
    limit: usize,
) -> Result<usize, SessionError> {
    let lines = api.get_logs(limit).await?;
    let count = lines.len();
    if !lines.is_empty() {
        lock(state).lines = lines;
    }
    tracing::debug!(count, limit, "fetched live logs");
    Ok(count)
}

/// Client-side cache of the backend's logs.
pub struct LogsFeed<A: MonitorApi> {
    api: Arc<A>,
    state: Arc<Mutex<LogsState>>,
}

impl<A: MonitorApi> Clone for LogsFeed<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            state: Arc::clone(&self.state),
        }
    }
}

impl<A: MonitorApi> LogsFeed<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(LogsState::default())),
        }
    }

    pub fn snapshot(&self) -> LogsState {
        lock(&self.state).clone()
    }

    pub fn lines(&self) -> Vec<String> {
        lock(&self.state).lines.clone()
    }

    /// Fetch up to `limit` live lines and remember the limit for refreshes.
    /// Returns the number of lines the backend sent.
    pub async fn fetch_live(&self, limit: usize) -> Result<usize, SessionError> {
        {
            let mut state = lock(&self.state);
            state.limit = limit;
            state.loading = true;
        }
        let result = fetch_into(self.api.as_ref(), &self.state, limit).await;
        lock(&self.state).loading = false;
        result
    }

    /// Re-fetch with the current limit, driving the `refreshing` flag.
    pub async fn refresh(&self) -> Result<usize, SessionError> {
        let limit = {
            let mut state = lock(&self.state);
            state.refreshing = true;
            state.limit
        };
        let result = fetch_into(self.api.as_ref(), &self.state, limit).await;
        lock(&self.state).refreshing = false;
        result
    }

    /// Clear the backend's log buffer and the local cache, then re-fetch.
    /// Only the clear itself can fail; a failed re-fetch is logged.
    pub async fn clear(&self) -> Result<(), SessionError> {
        self.api.clear_logs().await?;
        let limit = {
            let mut state = lock(&self.state);
            state.lines.clear();
            state.limit
        };
        tracing::info!("live logs cleared");
        if let Err(err) = fetch_into(self.api.as_ref(), &self.state, limit).await {
            tracing::warn!(error = %err, "reload after clear failed");
        }
        Ok(())
    }

    /// Save the analysis export into `dir` and return the written path.
    pub async fn download_analysis(&self, dir: &Path) -> Result<PathBuf, SessionError> {
        let bytes = self.api.download_analysis_log().await?;
        let path = dir.join(ANALYSIS_LOG_FILENAME);
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|source| DashboardError::FileWrite {
                path: path.clone(),
                source,
            })?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "analysis log saved");
        Ok(path)
    }

    /// Download the analysis export and cache its parsed rows.
    pub async fn load_analysis(&self) -> Result<Vec<CsvLogEntry>, SessionError> {
        let bytes = self.api.download_analysis_log().await?;
        let text = String::from_utf8_lossy(&bytes);
        let entries = parse_analysis_csv(&text)?;
        lock(&self.state).analysis = entries.clone();
        Ok(entries)
    }

    /// Refresh live lines every `period` in the background.
    pub fn start_auto_refresh(&self, period: Duration) -> PollHandle {
        let feed = self.clone();
        spawn_periodic(period, move || {
            let feed = feed.clone();
            async move {
                let limit = lock(&feed.state).limit;
                if let Err(err) = fetch_into(feed.api.as_ref(), &feed.state, limit).await {
                    tracing::warn!(error = %err, "log auto-refresh failed");
                }
            }
        })
    }
}
