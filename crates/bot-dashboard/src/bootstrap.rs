use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log file used by the TUI when `--log-file` is not given.
pub const DEFAULT_LOG_FILENAME: &str = "bot-dashboard.log";

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Root of the dashboard's local state, `~/.bot-dashboard/`.
pub fn app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".bot-dashboard")
}

/// Ensure `~/.bot-dashboard/` and its `logs/` and `cache/` subdirectories
/// exist. Returns the root.
pub fn ensure_directories() -> anyhow::Result<PathBuf> {
    let dir = app_dir();
    ensure_directories_in(&dir)?;
    Ok(dir)
}

/// Create `dir`, `dir/logs` and `dir/cache` (including missing parents).
pub fn ensure_directories_in(dir: &Path) -> anyhow::Result<()> {
    for path in [dir.to_path_buf(), dir.join("logs"), dir.join("cache")] {
        std::fs::create_dir_all(&path)
            .with_context(|| format!("creating {}", path.display()))?;
    }
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Where tracing output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    Stderr,
    File(PathBuf),
}

/// Pick the sink: an explicit `--log-file` wins; the TUI owns the terminal so
/// it logs to `<app_dir>/logs/`; one-shot commands log to stderr.
pub fn log_sink(log_file: Option<&PathBuf>, tui: bool, app_dir: &Path) -> LogSink {
    match log_file {
        Some(path) => LogSink::File(path.clone()),
        None if tui => LogSink::File(app_dir.join("logs").join(DEFAULT_LOG_FILENAME)),
        None => LogSink::Stderr,
    }
}

/// Map Python-style level names to `EnvFilter` directives. Anything else is
/// passed through untouched.
pub fn normalise_level(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" | "WARN" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_string(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Falls back to `"info"` if the level string is not a valid filter.
pub fn setup_logging(log_level: &str, sink: &LogSink) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(normalise_level(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let (stderr_layer, file_layer) = match sink {
        LogSink::Stderr => (
            Some(fmt::layer().with_target(false).with_writer(std::io::stderr)),
            None,
        ),
        LogSink::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            (
                None,
                Some(
                    fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                ),
            )
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
