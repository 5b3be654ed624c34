//! Monitoring session coordinator.
//!
//! [`MonitoringSession`] is the dashboard's single view of the remote bot. It
//! keeps the last status snapshot, the editable configuration draft and the
//! start/stop cooldown, and owns three kinds of background task:
//!
//! * the status poller started by [`initialize`](MonitoringSession::initialize),
//! * the one-shot settle re-fetch scheduled after a start/stop,
//! * the one-second cooldown ticker.
//!
//! All state sits behind one mutex that is never held across an `.await`.
//! Stats writes are wholesale and last-write-wins; `stats_version` counts them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use dashboard_api::{ApiResult, MonitorApi};
use dashboard_core::models::{
    CommandAck, MonitorStatus, MonitoringConfig, MonitoringConfigPatch, MonitoringStats,
};
use tokio::time;

use crate::cooldown::Cooldown;
use crate::error::SessionError;
use crate::poller::{spawn_periodic, PollHandle};

/// Default period of the background status poll.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default delay before re-fetching status after a start/stop.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);

// ── MonitorCommand ────────────────────────────────────────────────────────────

/// The two lifecycle commands the dashboard can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorCommand {
    Start,
    Stop,
}

impl MonitorCommand {
    pub fn verb(&self) -> &'static str {
        match self {
            MonitorCommand::Start => "start",
            MonitorCommand::Stop => "stop",
        }
    }

    pub fn gerund(&self) -> &'static str {
        match self {
            MonitorCommand::Start => "starting",
            MonitorCommand::Stop => "stopping",
        }
    }

    /// Status to show after the backend acknowledged this command with `ack`,
    /// or `None` when the acknowledgment is not recognised.
    pub fn transition_for(&self, ack: &str) -> Option<MonitorStatus> {
        match (self, ack) {
            (MonitorCommand::Start, "started" | "command_sent" | "monitoring_started") => {
                Some(MonitorStatus::Starting)
            }
            (MonitorCommand::Stop, "stopped" | "command_sent" | "monitoring_stopped") => {
                Some(MonitorStatus::Stopping)
            }
            (MonitorCommand::Stop, "not_running") => Some(MonitorStatus::Idle),
            _ => None,
        }
    }
}

// ── SessionOptions ────────────────────────────────────────────────────────────

/// Timing knobs for a [`MonitoringSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub poll_interval: Duration,
    pub settle_delay: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

impl SessionOptions {
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

// ── SessionState ──────────────────────────────────────────────────────────────

/// Everything the dashboard renders about the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Last known snapshot; `None` until the first fetch completes.
    pub stats: Option<MonitoringStats>,
    /// Incremented on every write to `stats`.
    pub stats_version: u64,
    /// Draft submitted by the next start.
    pub config: MonitoringConfig,
    pub loading: bool,
    pub refreshing: bool,
    pub config_loading: bool,
    pub cooldown: Cooldown,
    pub initialized: bool,
}

impl SessionState {
    fn set_stats(&mut self, stats: MonitoringStats) {
        self.stats = Some(stats);
        self.stats_version += 1;
    }

    /// Snapshot shown right after a command was acknowledged: the new status
    /// with the draft's subreddit and mode, counters carried over.
    fn transitional_stats(&self, status: MonitorStatus, config: &MonitoringConfig) -> MonitoringStats {
        let mut next = MonitoringStats::with_status(status, config);
        if let Some(prev) = &self.stats {
            next.posts_checked = prev.posts_checked;
            next.comments_checked = prev.comments_checked;
            next.ai_replies = prev.ai_replies;
            next.errors = prev.errors;
            next.rate_limited = prev.rate_limited;
        }
        next
    }
}

#[derive(Debug, Clone, Copy)]
enum BusyFlag {
    Loading,
    Refreshing,
}

impl BusyFlag {
    fn set(self, state: &mut SessionState, value: bool) {
        match self {
            BusyFlag::Loading => state.loading = value,
            BusyFlag::Refreshing => state.refreshing = value,
        }
    }
}

#[derive(Debug, Default)]
struct SessionTasks {
    poller: Option<PollHandle>,
    settle: Option<PollHandle>,
    cooldown: Option<PollHandle>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── MonitoringSession ─────────────────────────────────────────────────────────

/// Coordinator for one dashboard's view of the remote bot.
///
/// Background tasks are aborted by [`shutdown`](Self::shutdown) or when the
/// session is dropped.
pub struct MonitoringSession<A: MonitorApi> {
    api: Arc<A>,
    state: Arc<Mutex<SessionState>>,
    tasks: Mutex<SessionTasks>,
    options: SessionOptions,
    init_started: AtomicBool,
}

impl<A: MonitorApi> MonitoringSession<A> {
    pub fn new(api: Arc<A>, options: SessionOptions) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(SessionState::default())),
            tasks: Mutex::new(SessionTasks::default()),
            options,
            init_started: AtomicBool::new(false),
        }
    }

    /// Replace the default configuration draft.
    pub fn with_config(self, config: MonitoringConfig) -> Self {
        lock(&self.state).config = config;
        self
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    pub fn options(&self) -> SessionOptions {
        self.options
    }

    /// Cloned view of the whole state.
    pub fn snapshot(&self) -> SessionState {
        lock(&self.state).clone()
    }

    pub fn stats(&self) -> Option<MonitoringStats> {
        lock(&self.state).stats.clone()
    }

    pub fn config(&self) -> MonitoringConfig {
        lock(&self.state).config.clone()
    }

    pub fn cooldown(&self) -> Cooldown {
        lock(&self.state).cooldown
    }

    /// Load the first snapshot and start the status poller.
    ///
    /// Runs once per session; later calls return immediately. A failed
    /// fetch leaves an idle snapshot with zeroed counters.
    pub async fn initialize(&self) {
        if self.init_started.swap(true, Ordering::SeqCst) {
            return;
        }

        let config = {
            let mut state = lock(&self.state);
            if state.initialized {
                return;
            }
            state.loading = true;
            state.config.clone()
        };

        let result = self.api.get_status().await;

        {
            let mut state = lock(&self.state);
            match result {
                Ok(stats) => state.set_stats(stats),
                Err(err) => {
                    tracing::warn!(error = %err, "initial status fetch failed, assuming idle");
                    state.set_stats(MonitoringStats::idle(&config));
                }
            }
            state.initialized = true;
            state.loading = false;
        }

        tracing::info!(
            poll_secs = self.options.poll_interval.as_secs_f64(),
            "monitoring session initialized"
        );
        self.start_poller();
    }

    /// Fetch status once, driving the `loading` flag.
    pub async fn fetch_stats(&self) -> Result<MonitoringStats, SessionError> {
        self.fetch_with_flag(BusyFlag::Loading).await
    }

    /// Fetch status once, driving the `refreshing` flag.
    pub async fn refresh_stats(&self) -> Result<MonitoringStats, SessionError> {
        self.fetch_with_flag(BusyFlag::Refreshing).await
    }

    /// Submit the draft to `POST /monitor/start`.
    pub async fn start_monitoring(&self) -> Result<CommandAck, SessionError> {
        let config = self.begin_command(MonitorCommand::Start)?;
        let result = self.api.start_monitoring(&config).await;
        self.finish_command(MonitorCommand::Start, &config, result)
    }

    /// Send `POST /monitor/stop`.
    pub async fn stop_monitoring(&self) -> Result<CommandAck, SessionError> {
        let config = self.begin_command(MonitorCommand::Stop)?;
        let result = self.api.stop_monitoring().await;
        self.finish_command(MonitorCommand::Stop, &config, result)
    }

    /// Merge `patch` into the draft and return the result. Local only.
    pub fn update_config(&self, patch: MonitoringConfigPatch) -> MonitoringConfig {
        let mut state = lock(&self.state);
        state.config.merge(patch);
        tracing::debug!(config = ?state.config, "config draft updated");
        state.config.clone()
    }

    /// Abort the poller, any pending re-fetch and the cooldown ticker.
    pub fn shutdown(&self) {
        let mut tasks = lock(&self.tasks);
        for handle in [
            tasks.poller.take(),
            tasks.settle.take(),
            tasks.cooldown.take(),
        ]
        .into_iter()
        .flatten()
        {
            handle.abort();
        }
        tracing::debug!("monitoring session background tasks stopped");
    }

    // ── internals ─────────────────────────────────────────────────────────────

    async fn fetch_with_flag(&self, flag: BusyFlag) -> Result<MonitoringStats, SessionError> {
        flag.set(&mut lock(&self.state), true);
        let result = self.api.get_status().await;

        let mut state = lock(&self.state);
        flag.set(&mut state, false);
        let stats = result?;
        state.set_stats(stats.clone());
        Ok(stats)
    }

    fn begin_command(&self, command: MonitorCommand) -> Result<MonitoringConfig, SessionError> {
        let mut state = lock(&self.state);
        if state.cooldown.active {
            return Err(SessionError::CooldownActive {
                command,
                remaining: state.cooldown.remaining,
            });
        }
        if state.config_loading {
            return Err(SessionError::Busy);
        }
        state.config_loading = true;
        Ok(state.config.clone())
    }

    fn finish_command(
        &self,
        command: MonitorCommand,
        config: &MonitoringConfig,
        result: ApiResult<CommandAck>,
    ) -> Result<CommandAck, SessionError> {
        let mut state = lock(&self.state);
        state.config_loading = false;

        let ack = match result {
            Ok(ack) => ack,
            Err(err) => {
                tracing::warn!(command = command.verb(), error = %err, "monitor command failed");
                return Err(err.into());
            }
        };
        let Some(status) = command.transition_for(&ack.status) else {
            tracing::warn!(
                command = command.verb(),
                status = %ack.status,
                "unexpected acknowledgment"
            );
            return Err(SessionError::UnexpectedResponse {
                command,
                status: ack.status,
            });
        };

        let next = state.transitional_stats(status, config);
        state.set_stats(next);
        state.cooldown.arm();
        tracing::info!(command = command.verb(), ack = %ack.status, "monitor command acknowledged");
        drop(state);

        self.schedule_settle_fetch();
        self.spawn_cooldown_ticker();
        Ok(ack)
    }

    fn start_poller(&self) {
        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);
        let handle = spawn_periodic(self.options.poll_interval, move || {
            let api = Arc::clone(&api);
            let state = Arc::clone(&state);
            async move {
                match api.get_status().await {
                    Ok(stats) => {
                        tracing::debug!(status = %stats.status, "status poll");
                        lock(&state).set_stats(stats);
                    }
                    Err(err) => tracing::warn!(error = %err, "status poll failed"),
                }
            }
        });
        lock(&self.tasks).poller = Some(handle);
    }

    fn schedule_settle_fetch(&self) {
        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);
        let delay = self.options.settle_delay;
        let handle = tokio::spawn(async move {
            time::sleep(delay).await;
            match api.get_status().await {
                Ok(stats) => lock(&state).set_stats(stats),
                Err(err) => tracing::warn!(error = %err, "post-command status fetch failed"),
            }
        });
        lock(&self.tasks).settle = Some(PollHandle::new(handle));
    }

    fn spawn_cooldown_ticker(&self) {
        let state = Arc::clone(&self.state);
        let handle = tokio::spawn(async move {
            let second = Duration::from_secs(1);
            let mut interval = time::interval_at(time::Instant::now() + second, second);
            loop {
                interval.tick().await;
                if !lock(&state).cooldown.tick() {
                    tracing::debug!("cooldown cleared");
                    break;
                }
            }
        });
        // Replacing the handle aborts any earlier ticker.
        lock(&self.tasks).cooldown = Some(PollHandle::new(handle));
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
