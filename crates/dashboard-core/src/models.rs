use serde::{Deserialize, Serialize};
use std::fmt;

/// Subreddit watched when the operator has not picked one.
pub const DEFAULT_SUBREDDIT: &str = "AskReddit";

/// Topic filter sent with the default configuration.
pub const DEFAULT_TOPIC_FILTER: &str =
    "Achilles tendon injuries, rupture, recovery, medical advice, pain, surgery";

/// Check interval (minutes) used when none is given or the input is unusable.
pub const DEFAULT_CHECK_INTERVAL: u32 = 2;

/// Inclusive bounds for `check_interval`, in minutes.
pub const MIN_CHECK_INTERVAL: u32 = 1;
pub const MAX_CHECK_INTERVAL: u32 = 60;

// ── MonitoringConfig ──────────────────────────────────────────────────────────

/// Configuration submitted to `POST /monitor/start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Subreddit name without the `r/` prefix.
    pub subreddit: String,
    /// Free-text description of the topics the bot should react to.
    pub topic_filter: String,
    /// Minutes between backend checks, in `1..=60`.
    pub check_interval: u32,
    /// Simulate replies instead of posting them.
    pub test_mode: bool,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            subreddit: DEFAULT_SUBREDDIT.to_string(),
            topic_filter: DEFAULT_TOPIC_FILTER.to_string(),
            check_interval: DEFAULT_CHECK_INTERVAL,
            test_mode: true,
        }
    }
}

/// Partial update for a [`MonitoringConfig`]; `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitoringConfigPatch {
    pub subreddit: Option<String>,
    pub topic_filter: Option<String>,
    pub check_interval: Option<u32>,
    pub test_mode: Option<bool>,
}

impl MonitoringConfig {
    /// Shallow-merge `patch` into this config.
    pub fn merge(&mut self, patch: MonitoringConfigPatch) {
        if let Some(subreddit) = patch.subreddit {
            self.subreddit = normalize_subreddit(&subreddit);
        }
        if let Some(topic_filter) = patch.topic_filter {
            self.topic_filter = topic_filter;
        }
        if let Some(interval) = patch.check_interval {
            self.check_interval = clamp_check_interval(interval);
        }
        if let Some(test_mode) = patch.test_mode {
            self.test_mode = test_mode;
        }
    }
}

/// Strip surrounding whitespace and any leading `r/` or `/r/` prefix.
pub fn normalize_subreddit(raw: &str) -> String {
    let trimmed = raw.trim();
    let stripped = trimmed
        .strip_prefix("/r/")
        .or_else(|| trimmed.strip_prefix("r/"))
        .unwrap_or(trimmed);
    stripped.trim().to_string()
}

/// Clamp an interval into the accepted `1..=60` minute range.
pub fn clamp_check_interval(minutes: u32) -> u32 {
    minutes.clamp(MIN_CHECK_INTERVAL, MAX_CHECK_INTERVAL)
}

/// Parse operator input for the check interval.
///
/// Unparsable or zero input falls back to [`DEFAULT_CHECK_INTERVAL`]; parsed
/// values above the range are clamped.
pub fn parse_check_interval(raw: &str) -> u32 {
    match raw.trim().parse::<u32>() {
        Ok(0) | Err(_) => DEFAULT_CHECK_INTERVAL,
        Ok(v) => clamp_check_interval(v),
    }
}

// ── ConfigPreset ──────────────────────────────────────────────────────────────

/// Canned drafts offered on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    MedicalAdvice,
    GeneralHelp,
}

impl ConfigPreset {
    pub const ALL: [ConfigPreset; 2] = [ConfigPreset::MedicalAdvice, ConfigPreset::GeneralHelp];

    pub fn name(&self) -> &'static str {
        match self {
            ConfigPreset::MedicalAdvice => "Medical Advice",
            ConfigPreset::GeneralHelp => "General Help",
        }
    }

    pub fn config(&self) -> MonitoringConfig {
        match self {
            ConfigPreset::MedicalAdvice => MonitoringConfig::default(),
            ConfigPreset::GeneralHelp => MonitoringConfig {
                topic_filter: "general advice, help, questions, support".to_string(),
                check_interval: 5,
                ..MonitoringConfig::default()
            },
        }
    }

    /// Patch that replaces every field of the draft with this preset.
    pub fn patch(&self) -> MonitoringConfigPatch {
        let config = self.config();
        MonitoringConfigPatch {
            subreddit: Some(config.subreddit),
            topic_filter: Some(config.topic_filter),
            check_interval: Some(config.check_interval),
            test_mode: Some(config.test_mode),
        }
    }

    /// The preset after this one, wrapping around.
    pub fn next(&self) -> Self {
        match self {
            ConfigPreset::MedicalAdvice => ConfigPreset::GeneralHelp,
            ConfigPreset::GeneralHelp => ConfigPreset::MedicalAdvice,
        }
    }
}

// ── MonitorStatus ─────────────────────────────────────────────────────────────

/// Lifecycle status of the remote bot as reported by `/monitor/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MonitorStatus {
    Idle,
    Starting,
    Active,
    Stopping,
    Error,
    Inactive,
    /// Any status string this client does not know about.
    Unknown(String),
}

impl MonitorStatus {
    /// Wire spelling of the status.
    pub fn as_str(&self) -> &str {
        match self {
            MonitorStatus::Idle => "idle",
            MonitorStatus::Starting => "starting",
            MonitorStatus::Active => "active",
            MonitorStatus::Stopping => "stopping",
            MonitorStatus::Error => "error",
            MonitorStatus::Inactive => "inactive",
            MonitorStatus::Unknown(s) => s,
        }
    }

    /// Label shown on the dashboard. Inactive and unknown states read as idle.
    pub fn display_label(&self) -> &'static str {
        match self {
            MonitorStatus::Active => "Active",
            MonitorStatus::Starting => "Starting...",
            MonitorStatus::Stopping => "Stopping...",
            MonitorStatus::Error => "Error",
            MonitorStatus::Idle | MonitorStatus::Inactive | MonitorStatus::Unknown(_) => "Idle",
        }
    }

    /// `true` while the backend is running or transitioning.
    pub fn is_running(&self) -> bool {
        matches!(
            self,
            MonitorStatus::Active | MonitorStatus::Starting | MonitorStatus::Stopping
        )
    }
}

impl From<String> for MonitorStatus {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "idle" => MonitorStatus::Idle,
            "starting" => MonitorStatus::Starting,
            "active" => MonitorStatus::Active,
            "stopping" => MonitorStatus::Stopping,
            "error" => MonitorStatus::Error,
            "inactive" => MonitorStatus::Inactive,
            _ => MonitorStatus::Unknown(s),
        }
    }
}

impl From<MonitorStatus> for String {
    fn from(status: MonitorStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for MonitorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── MonitoringStats ───────────────────────────────────────────────────────────

/// Snapshot returned by `GET /monitor/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoringStats {
    pub status: MonitorStatus,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub test_mode: bool,
    #[serde(default)]
    pub posts_checked: u64,
    #[serde(default)]
    pub comments_checked: u64,
    #[serde(default)]
    pub ai_replies: u64,
    #[serde(default)]
    pub errors: u64,
    #[serde(default)]
    pub rate_limited: u64,
}

impl MonitoringStats {
    /// Idle snapshot with zeroed counters, used when the backend is unreachable.
    pub fn idle(config: &MonitoringConfig) -> Self {
        Self::with_status(MonitorStatus::Idle, config)
    }

    /// Zero-counter snapshot carrying `status` and the draft's subreddit/mode.
    pub fn with_status(status: MonitorStatus, config: &MonitoringConfig) -> Self {
        Self {
            status,
            subreddit: config.subreddit.clone(),
            test_mode: config.test_mode,
            posts_checked: 0,
            comments_checked: 0,
            ai_replies: 0,
            errors: 0,
            rate_limited: 0,
        }
    }
}

// ── Accounts ──────────────────────────────────────────────────────────────────

/// Reddit/AI credential record managed through `/accounts`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub api_key: String,
}

/// An [`Account`] paired with the backend's authentication verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountWithStatus {
    pub account: Account,
    /// `true` when the backend authenticated the credentials.
    pub status: bool,
}

/// Body of `GET /accounts`: two index-aligned arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountsResponse {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub status: Vec<bool>,
}

impl AccountsResponse {
    /// Zip accounts with their statuses. Missing statuses count as `false`.
    pub fn merge(self) -> Vec<AccountWithStatus> {
        let statuses = self.status;
        self.accounts
            .into_iter()
            .enumerate()
            .map(|(idx, account)| AccountWithStatus {
                account,
                status: statuses.get(idx).copied().unwrap_or(false),
            })
            .collect()
    }
}

/// Show the first 8 characters of a secret followed by `...`.
pub fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        return "Not set".to_string();
    }
    let prefix: String = secret.chars().take(8).collect();
    format!("{prefix}...")
}

// ── Command acknowledgments ───────────────────────────────────────────────────

/// Body returned by `/monitor/start` and `/monitor/stop`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandAck {
    pub status: String,
}

/// Body of `GET /logs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogsResponse {
    #[serde(default)]
    pub logs: Vec<String>,
}
