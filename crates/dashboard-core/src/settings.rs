use clap::{CommandFactory, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models::MonitoringConfigPatch;

/// Backend base URL baked in at build time, with a hosted fallback.
pub const DEFAULT_API_URL: &str = match option_env!("BOT_DASHBOARD_API_URL") {
    Some(url) => url,
    None => "https://guysolan.pythonanywhere.com",
};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Terminal dashboard for the Reddit monitoring bot
#[derive(Parser, Debug, Clone)]
#[command(
    name = "bot-dashboard",
    about = "Terminal dashboard for the Reddit monitoring bot",
    version
)]
pub struct Settings {
    /// Backend base URL (defaults to the build-time URL)
    #[arg(long, env = "BOT_DASHBOARD_API_URL")]
    pub api_url: Option<String>,

    /// Initial dashboard tab
    #[arg(long, default_value = "dashboard", value_parser = ["dashboard", "logs", "accounts"])]
    pub view: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Status poll interval in seconds (1-60)
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u32).range(1..=60))]
    pub poll_interval: u32,

    /// Subreddit to monitor, without the r/ prefix
    #[arg(long)]
    pub subreddit: Option<String>,

    /// Topics the bot should react to
    #[arg(long)]
    pub topic_filter: Option<String>,

    /// Minutes between backend checks (1-60)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=60))]
    pub check_interval: Option<u32>,

    /// Post real replies instead of running in test mode
    #[arg(long)]
    pub live: bool,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,

    /// Run a single command instead of opening the dashboard
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// One-shot operations against the backend.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the current monitoring status
    Status,
    /// Start monitoring with the configured subreddit and filter
    Start,
    /// Stop monitoring
    Stop,
    /// Print recent live log lines
    Logs {
        /// Number of lines to fetch
        #[arg(long, default_value = "100")]
        limit: usize,
    },
    /// Clear the live log
    ClearLogs,
    /// Download the AI analysis log as CSV
    DownloadAnalysis {
        /// Directory to save ai_analysis_log.csv into
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Manage bot accounts
    Accounts {
        #[command(subcommand)]
        action: AccountsCommand,
    },
}

/// Account management operations.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum AccountsCommand {
    /// List accounts and their authentication status
    List,
    /// Add an account
    Add {
        #[arg(long)]
        client_id: String,
        #[arg(long)]
        client_secret: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        api_key: Option<String>,
    },
    /// Remove an account by username
    Remove { username: String },
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.bot-dashboard/last_used.json`.
///
/// Only display preferences are kept; the monitoring config draft is never
/// written to disk.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll_interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".bot-dashboard").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(error = %e, path = %path.display(), "ignoring unreadable last-used params");
            Self::default()
        })
    }

    /// Atomically write params to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation – accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                tracing::warn!(error = %e, "failed to clear last-used params");
            }
            return Self::resolve_overrides(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins over persisted values.
        if !is_arg_explicitly_set(&matches, "view") {
            if let Some(v) = last.view {
                settings.view = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "poll_interval") {
            if let Some(v) = last.poll_interval {
                settings.poll_interval = v;
            }
        }
        if settings.api_url.is_none() {
            settings.api_url = last.api_url;
        }

        settings = Self::resolve_overrides(settings);

        let params = LastUsedParams::from(&settings);
        if let Err(e) = params.save_to(config_path) {
            tracing::warn!(error = %e, "failed to persist last-used params");
        }

        settings
    }

    /// Apply the `--debug` flag.
    fn resolve_overrides(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Backend base URL after CLI, environment and persisted overrides.
    pub fn api_base_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    /// Config edits requested on the command line.
    pub fn config_patch(&self) -> MonitoringConfigPatch {
        MonitoringConfigPatch {
            subreddit: self.subreddit.clone(),
            topic_filter: self.topic_filter.clone(),
            check_interval: self.check_interval,
            test_mode: self.live.then_some(false),
        }
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            theme: Some(s.theme.clone()),
            view: Some(s.view.clone()),
            poll_interval: Some(s.poll_interval),
            api_url: s.api_url.clone(),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
