mod bootstrap;
mod commands;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use dashboard_api::HttpApiClient;
use dashboard_core::settings::Settings;
use dashboard_runtime::accounts::AccountsRoster;
use dashboard_runtime::logs::LogsFeed;
use dashboard_runtime::session::{MonitoringSession, SessionOptions};
use dashboard_ui::app::{App, Backend, Tab};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    let app_dir = bootstrap::ensure_directories()?;
    let sink = bootstrap::log_sink(
        settings.log_file.as_ref(),
        settings.command.is_none(),
        &app_dir,
    );
    bootstrap::setup_logging(&settings.log_level, &sink)?;

    tracing::info!("Bot Dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Backend: {}, View: {}, Theme: {}",
        settings.api_base_url(),
        settings.view,
        settings.theme
    );

    let api = Arc::new(HttpApiClient::new(settings.api_base_url())?);
    let options = SessionOptions::default()
        .with_poll_interval(Duration::from_secs(u64::from(settings.poll_interval)));
    let session = Arc::new(MonitoringSession::new(Arc::clone(&api), options));
    session.update_config(settings.config_patch());

    let backend = Backend {
        session,
        logs: LogsFeed::new(Arc::clone(&api)),
        accounts: Arc::new(AccountsRoster::new(api)),
        download_dir: std::env::current_dir()?,
    };

    if let Some(command) = settings.command.clone() {
        return commands::run(command, &backend).await;
    }

    let app = App::new(
        &settings.theme,
        Tab::from_view(&settings.view),
        settings.api_base_url(),
        backend.clone(),
    );

    // The loop exits on 'q' / Ctrl+C inside the TUI. We also listen for
    // Ctrl+C at the OS level for signals delivered outside raw mode.
    tokio::select! {
        result = app.run() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received; shutting down");
        }
    }
    backend.session.shutdown();

    Ok(())
}
