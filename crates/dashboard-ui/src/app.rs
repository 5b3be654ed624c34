//! Application state and TUI event loop for the bot dashboard.
//!
//! [`App`] owns the theme, the active tab and the transient notifications.
//! Key presses map to [`Action`]s which run on the tokio runtime against the
//! shared session, logs feed and accounts roster; their outcomes come back
//! over a channel drained once per frame. Editing, forms, confirmations and
//! popups are [`InputMode`]s that capture the keyboard until they close.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    text::{Line, Span, Text},
    widgets::Paragraph,
    Frame, Terminal,
};
use tokio::sync::mpsc;

use dashboard_api::MonitorApi;
use dashboard_core::logs::DEFAULT_LOG_LIMIT;
use dashboard_core::models::{
    normalize_subreddit, Account, ConfigPreset, MonitorStatus, MonitoringConfigPatch,
    MAX_CHECK_INTERVAL, MIN_CHECK_INTERVAL,
};
use dashboard_runtime::accounts::AccountsRoster;
use dashboard_runtime::logs::{LogsFeed, DEFAULT_LOG_REFRESH};
use dashboard_runtime::poller::PollHandle;
use dashboard_runtime::session::MonitoringSession;

use crate::components::header::Header;
use crate::forms::{AccountForm, ConfigEdit, ConfigField};
use crate::logs_view::{LogsCursor, LogsMode};
use crate::themes::Theme;
use crate::{accounts_view, dashboard_view, logs_view};

/// How long a notification stays on screen.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// Rows moved by PageUp / PageDown on the logs tab.
const LOG_PAGE: usize = 10;

// ── Tab ───────────────────────────────────────────────────────────────────────

/// Top-level page of the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Logs,
    Accounts,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Dashboard, Tab::Logs, Tab::Accounts];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Logs => "Logs",
            Tab::Accounts => "Accounts",
        }
    }

    /// Parse the `--view` value. Unknown names open the dashboard.
    pub fn from_view(view: &str) -> Self {
        match view.trim().to_lowercase().as_str() {
            "logs" => Tab::Logs,
            "accounts" => Tab::Accounts,
            _ => Tab::Dashboard,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Tab::Dashboard => Tab::Logs,
            Tab::Logs => Tab::Accounts,
            Tab::Accounts => Tab::Dashboard,
        }
    }
}

// ── Notifications ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// Transient message shown under the active tab.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub created_at: Instant,
}

impl Notification {
    pub fn new(message: impl Into<String>, level: NotificationLevel) -> Self {
        Self {
            message: message.into(),
            level,
            created_at: Instant::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Info)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Error)
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= NOTIFICATION_TTL
    }
}

// ── Actions ───────────────────────────────────────────────────────────────────

/// Backend work triggered from the keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Initialize,
    Start,
    Stop,
    RefreshStats,
    RefreshLogs,
    LoadAnalysis,
    ClearLogs,
    DownloadAnalysis,
    RefreshAccounts,
    AddAccount(Account),
    RemoveAccount(String),
}

impl Action {
    /// Short name for tracing; never includes credentials.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Initialize => "initialize",
            Action::Start => "start",
            Action::Stop => "stop",
            Action::RefreshStats => "refresh_stats",
            Action::RefreshLogs => "refresh_logs",
            Action::LoadAnalysis => "load_analysis",
            Action::ClearLogs => "clear_logs",
            Action::DownloadAnalysis => "download_analysis",
            Action::RefreshAccounts => "refresh_accounts",
            Action::AddAccount(_) => "add_account",
            Action::RemoveAccount(_) => "remove_account",
        }
    }
}

/// Shared handles every action runs against.
pub struct Backend<A: MonitorApi> {
    pub session: Arc<MonitoringSession<A>>,
    pub logs: LogsFeed<A>,
    pub accounts: Arc<AccountsRoster<A>>,
    /// Where `d` saves the analysis export.
    pub download_dir: PathBuf,
}

impl<A: MonitorApi> Clone for Backend<A> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            logs: self.logs.clone(),
            accounts: Arc::clone(&self.accounts),
            download_dir: self.download_dir.clone(),
        }
    }
}

/// Run `action` to completion and describe the outcome for the user.
///
/// Successful background refreshes stay silent; failures of explicit
/// actions always produce an error notification.
pub async fn perform<A: MonitorApi>(backend: &Backend<A>, action: Action) -> Option<Notification> {
    match action {
        Action::Initialize => {
            backend.session.initialize().await;
            match backend.logs.fetch_live(DEFAULT_LOG_LIMIT).await {
                Ok(_) => None,
                Err(err) => Some(Notification::error(format!("Failed to fetch logs: {err}"))),
            }
        }
        Action::Start => match backend.session.start_monitoring().await {
            Ok(_) => Some(Notification::success("Monitoring started")),
            Err(err) => Some(Notification::error(err.to_string())),
        },
        Action::Stop => match backend.session.stop_monitoring().await {
            Ok(_) => Some(Notification::success("Monitoring stopped")),
            Err(err) => Some(Notification::error(err.to_string())),
        },
        Action::RefreshStats => match backend.session.refresh_stats().await {
            Ok(_) => None,
            Err(err) => Some(Notification::error(format!("Failed to refresh status: {err}"))),
        },
        Action::RefreshLogs => match backend.logs.refresh().await {
            Ok(_) => None,
            Err(err) => Some(Notification::error(format!("Failed to fetch logs: {err}"))),
        },
        Action::LoadAnalysis => match backend.logs.load_analysis().await {
            Ok(entries) => Some(Notification::info(format!(
                "Loaded {} analysis entries",
                entries.len()
            ))),
            Err(err) => Some(Notification::error(format!(
                "Failed to load analysis log: {err}"
            ))),
        },
        Action::ClearLogs => match backend.logs.clear().await {
            Ok(()) => Some(Notification::success("Logs cleared successfully")),
            Err(err) => Some(Notification::error(format!("Failed to clear logs: {err}"))),
        },
        Action::DownloadAnalysis => {
            match backend.logs.download_analysis(&backend.download_dir).await {
                Ok(path) => Some(Notification::success(format!(
                    "Analysis log downloaded to {}",
                    path.display()
                ))),
                Err(err) => Some(Notification::error(format!(
                    "Failed to download analysis log: {err}"
                ))),
            }
        }
        Action::RefreshAccounts => match backend.accounts.refresh().await {
            Ok(_) => None,
            Err(err) => Some(Notification::error(format!("Failed to fetch accounts: {err}"))),
        },
        Action::AddAccount(account) => match backend.accounts.add(account).await {
            Ok(_) => Some(Notification::success("Account added successfully")),
            Err(err) => Some(Notification::error(format!("Failed to add account: {err}"))),
        },
        Action::RemoveAccount(username) => match backend.accounts.remove(&username).await {
            Ok(_) => Some(Notification::success("Account removed successfully")),
            Err(err) => Some(Notification::error(format!("Failed to remove account: {err}"))),
        },
    }
}

// ── Input modes ───────────────────────────────────────────────────────────────

/// What the keyboard is currently driving. Anything but `Normal` captures
/// every key except `Ctrl+C`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing into one field of the config draft.
    EditConfig(ConfigEdit),
    AddAccount(AccountForm),
    /// Waiting for `y` before deleting the named account.
    ConfirmRemove(String),
    /// Detail popup for the selected analysis row.
    LogDetail,
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Top-level TUI application.
pub struct App<A: MonitorApi> {
    pub theme: Theme,
    pub tab: Tab,
    pub logs_mode: LogsMode,
    pub should_quit: bool,
    pub notifications: Vec<Notification>,
    /// Preset applied by the next `p`.
    pub next_preset: ConfigPreset,
    pub mode: InputMode,
    pub logs_cursor: LogsCursor,
    pub account_selected: usize,
    api_url: String,
    backend: Backend<A>,
    /// Live log auto-refresh, held only while the live logs are on screen.
    log_refresh: Option<PollHandle>,
    tx: mpsc::UnboundedSender<Notification>,
    rx: mpsc::UnboundedReceiver<Notification>,
}

impl<A: MonitorApi> App<A> {
    pub fn new(theme_name: &str, tab: Tab, api_url: impl Into<String>, backend: Backend<A>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            theme: Theme::from_name(theme_name),
            tab,
            logs_mode: LogsMode::Live,
            should_quit: false,
            notifications: Vec::new(),
            next_preset: ConfigPreset::GeneralHelp,
            mode: InputMode::Normal,
            logs_cursor: LogsCursor::default(),
            account_selected: 0,
            api_url: api_url.into(),
            backend,
            log_refresh: None,
            tx,
            rx,
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the TUI until `q`, `Q` or `Ctrl+C`.
    ///
    /// Uses `crossterm::event::poll` (synchronous, 250 ms timeout) so the
    /// terminal loop stays on the current thread while actions run on the
    /// runtime and report back via `try_recv`.
    pub async fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        self.dispatch(Action::Initialize);
        if let Some(action) = self.tab_entry_action() {
            self.dispatch(action);
        }
        self.sync_auto_refresh();

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            terminal.draw(|frame| self.render(frame))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        if let Some(action) = self.handle_key(key) {
                            self.dispatch(action);
                        }
                        self.sync_auto_refresh();
                    }
                }
            }

            self.drain_notifications();
            self.prune_notifications(Instant::now());

            if self.should_quit {
                break Ok(());
            }
        };

        self.log_refresh = None;
        self.backend.session.shutdown();

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    /// Start the live log auto-refresh while the live logs are showing and
    /// stop it everywhere else. Must run inside the tokio runtime.
    pub fn sync_auto_refresh(&mut self) {
        let wanted = self.tab == Tab::Logs && self.logs_mode == LogsMode::Live;
        match (wanted, self.log_refresh.is_some()) {
            (true, false) => {
                tracing::debug!("live log auto-refresh started");
                self.log_refresh = Some(self.backend.logs.start_auto_refresh(DEFAULT_LOG_REFRESH));
            }
            (false, true) => {
                tracing::debug!("live log auto-refresh stopped");
                self.log_refresh = None;
            }
            _ => {}
        }
    }

    pub fn auto_refresh_active(&self) -> bool {
        self.log_refresh.is_some()
    }

    /// Run `action` on the runtime; its notification arrives on the channel.
    pub fn dispatch(&self, action: Action) {
        tracing::debug!(action = action.name(), "dispatching action");
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            if let Some(notification) = perform(&backend, action).await {
                let _ = tx.send(notification);
            }
        });
    }

    // ── Keyboard ──────────────────────────────────────────────────────────────

    /// Apply `key` to local state and return the backend action it triggers.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }
        if self.mode != InputMode::Normal {
            return self.handle_modal_key(key.code);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                return None;
            }
            KeyCode::Char('1') => return self.switch_tab(Tab::Dashboard),
            KeyCode::Char('2') => return self.switch_tab(Tab::Logs),
            KeyCode::Char('3') => return self.switch_tab(Tab::Accounts),
            KeyCode::Tab => return self.switch_tab(self.tab.next()),
            _ => {}
        }

        match self.tab {
            Tab::Dashboard => self.handle_dashboard_key(key.code),
            Tab::Logs => self.handle_logs_key(key.code),
            Tab::Accounts => self.handle_accounts_key(key.code),
        }
    }

    fn switch_tab(&mut self, tab: Tab) -> Option<Action> {
        if self.tab == tab {
            return None;
        }
        self.tab = tab;
        self.tab_entry_action()
    }

    /// Fetch performed when a tab is opened.
    fn tab_entry_action(&self) -> Option<Action> {
        match self.tab {
            Tab::Dashboard => None,
            Tab::Logs => match self.logs_mode {
                LogsMode::Live => Some(Action::RefreshLogs),
                LogsMode::Analysis => Some(Action::LoadAnalysis),
            },
            Tab::Accounts => Some(Action::RefreshAccounts),
        }
    }

    fn handle_modal_key(&mut self, code: KeyCode) -> Option<Action> {
        match std::mem::take(&mut self.mode) {
            InputMode::Normal => None,
            InputMode::EditConfig(mut edit) => {
                match code {
                    KeyCode::Esc => {}
                    KeyCode::Enter => {
                        if !self.commit_edit(&edit) {
                            self.mode = InputMode::EditConfig(edit);
                        }
                    }
                    KeyCode::Tab => {
                        if self.commit_edit(&edit) {
                            let config = self.backend.session.config();
                            self.mode =
                                InputMode::EditConfig(ConfigEdit::new(edit.field.next(), &config));
                        } else {
                            self.mode = InputMode::EditConfig(edit);
                        }
                    }
                    KeyCode::Backspace => {
                        edit.pop();
                        self.mode = InputMode::EditConfig(edit);
                    }
                    KeyCode::Char(c) => {
                        edit.push(c);
                        self.mode = InputMode::EditConfig(edit);
                    }
                    _ => self.mode = InputMode::EditConfig(edit),
                }
                None
            }
            InputMode::AddAccount(mut form) => match code {
                KeyCode::Esc => None,
                KeyCode::Enter => match form.advance() {
                    Some(account) if account.username.trim().is_empty() => {
                        self.notify(Notification::error("Username must not be empty"));
                        self.mode = InputMode::AddAccount(form);
                        None
                    }
                    Some(account) => Some(Action::AddAccount(account)),
                    None => {
                        self.mode = InputMode::AddAccount(form);
                        None
                    }
                },
                KeyCode::Up | KeyCode::BackTab => {
                    form.back();
                    self.mode = InputMode::AddAccount(form);
                    None
                }
                KeyCode::Backspace => {
                    form.pop();
                    self.mode = InputMode::AddAccount(form);
                    None
                }
                KeyCode::Char(c) => {
                    form.push(c);
                    self.mode = InputMode::AddAccount(form);
                    None
                }
                _ => {
                    self.mode = InputMode::AddAccount(form);
                    None
                }
            },
            InputMode::ConfirmRemove(username) => match code {
                KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::RemoveAccount(username)),
                _ => None,
            },
            InputMode::LogDetail => None,
        }
    }

    /// Write `edit` into the draft. A blank subreddit is refused.
    fn commit_edit(&mut self, edit: &ConfigEdit) -> bool {
        if edit.field == ConfigField::Subreddit && normalize_subreddit(&edit.buffer).is_empty() {
            self.notify(Notification::error("Subreddit must not be empty"));
            return false;
        }
        self.backend.session.update_config(edit.patch());
        self.notify(Notification::info(format!("{} updated", edit.field.label())));
        true
    }

    fn handle_dashboard_key(&mut self, code: KeyCode) -> Option<Action> {
        let session = &self.backend.session;
        match code {
            KeyCode::Char('s') => {
                if session.stats().is_some_and(|s| s.status == MonitorStatus::Stopping) {
                    self.notify(Notification::info("Monitoring is stopping, try again shortly"));
                    return None;
                }
                Some(Action::Start)
            }
            KeyCode::Char('x') => {
                if session.stats().is_some_and(|s| s.status == MonitorStatus::Starting) {
                    self.notify(Notification::info("Monitoring is starting, try again shortly"));
                    return None;
                }
                Some(Action::Stop)
            }
            KeyCode::Char('r') => Some(Action::RefreshStats),
            KeyCode::Char('e') => {
                let config = session.config();
                self.mode = InputMode::EditConfig(ConfigEdit::new(ConfigField::Subreddit, &config));
                None
            }
            KeyCode::Char('t') => {
                let test_mode = !session.config().test_mode;
                session.update_config(MonitoringConfigPatch {
                    test_mode: Some(test_mode),
                    ..Default::default()
                });
                None
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let interval = session.config().check_interval;
                session.update_config(MonitoringConfigPatch {
                    check_interval: Some((interval + 1).min(MAX_CHECK_INTERVAL)),
                    ..Default::default()
                });
                None
            }
            KeyCode::Char('-') => {
                let interval = session.config().check_interval;
                session.update_config(MonitoringConfigPatch {
                    check_interval: Some(interval.saturating_sub(1).max(MIN_CHECK_INTERVAL)),
                    ..Default::default()
                });
                None
            }
            KeyCode::Char('p') => {
                let preset = self.next_preset;
                session.update_config(preset.patch());
                self.next_preset = preset.next();
                self.notify(Notification::info(format!("Preset applied: {}", preset.name())));
                None
            }
            _ => None,
        }
    }

    fn handle_logs_key(&mut self, code: KeyCode) -> Option<Action> {
        match code {
            KeyCode::Char('r') => match self.logs_mode {
                LogsMode::Live => Some(Action::RefreshLogs),
                LogsMode::Analysis => Some(Action::LoadAnalysis),
            },
            KeyCode::Char('c') => {
                self.logs_cursor.live_scroll = 0;
                Some(Action::ClearLogs)
            }
            KeyCode::Char('d') => Some(Action::DownloadAnalysis),
            KeyCode::Char('a') => {
                self.logs_mode = self.logs_mode.toggle();
                self.logs_cursor = LogsCursor::default();
                self.tab_entry_action()
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_logs_cursor(-1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_logs_cursor(1);
                None
            }
            KeyCode::PageUp => {
                self.move_logs_cursor(-(LOG_PAGE as isize));
                None
            }
            KeyCode::PageDown => {
                self.move_logs_cursor(LOG_PAGE as isize);
                None
            }
            KeyCode::Enter if self.logs_mode == LogsMode::Analysis => {
                let state = self.backend.logs.snapshot();
                if logs_view::selected_entry(&state, self.logs_cursor.selected).is_some() {
                    self.mode = InputMode::LogDetail;
                }
                None
            }
            _ => None,
        }
    }

    /// Move by `delta` rows: negative goes up (older lines in live mode,
    /// newer rows in analysis mode).
    fn move_logs_cursor(&mut self, delta: isize) {
        let state = self.backend.logs.snapshot();
        let steps = delta.unsigned_abs();
        match self.logs_mode {
            LogsMode::Live => {
                let scroll = &mut self.logs_cursor.live_scroll;
                *scroll = if delta < 0 {
                    scroll.saturating_add(steps).min(state.lines.len())
                } else {
                    scroll.saturating_sub(steps)
                };
            }
            LogsMode::Analysis => {
                let last = state.analysis.len().saturating_sub(1);
                let selected = &mut self.logs_cursor.selected;
                *selected = if delta < 0 {
                    selected.saturating_sub(steps)
                } else {
                    selected.saturating_add(steps).min(last)
                };
            }
        }
    }

    fn handle_accounts_key(&mut self, code: KeyCode) -> Option<Action> {
        let accounts = self.backend.accounts.accounts();
        let last = accounts.len().saturating_sub(1);
        match code {
            KeyCode::Char('r') => Some(Action::RefreshAccounts),
            KeyCode::Up | KeyCode::Char('k') => {
                self.account_selected = self.account_selected.min(last).saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.account_selected = (self.account_selected + 1).min(last);
                None
            }
            KeyCode::Char('n') => {
                self.mode = InputMode::AddAccount(AccountForm::default());
                None
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                match accounts.get(self.account_selected.min(last)) {
                    Some(entry) => {
                        self.mode = InputMode::ConfirmRemove(entry.account.username.clone());
                    }
                    None => self.notify(Notification::info("No account selected")),
                }
                None
            }
            _ => None,
        }
    }

    // ── Notifications ─────────────────────────────────────────────────────────

    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    /// Move finished action outcomes into the visible list (non-blocking).
    fn drain_notifications(&mut self) {
        while let Ok(notification) = self.rx.try_recv() {
            self.notifications.push(notification);
        }
    }

    /// Drop notifications older than [`NOTIFICATION_TTL`].
    pub fn prune_notifications(&mut self, now: Instant) {
        self.notifications.retain(|n| !n.is_expired(now));
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    fn notification_lines(&self) -> Vec<Line<'_>> {
        self.notifications
            .iter()
            .map(|n| {
                let style = match n.level {
                    NotificationLevel::Info => self.theme.notification_info,
                    NotificationLevel::Success => self.theme.notification_success,
                    NotificationLevel::Error => self.theme.notification_error,
                };
                Line::from(Span::styled(format!(" {} ", n.message), style))
            })
            .collect()
    }

    fn help_line(&self) -> Line<'_> {
        let keys = match (&self.mode, self.tab) {
            (InputMode::EditConfig(_), _) => "Enter save  Tab save and next field  Esc cancel",
            (InputMode::AddAccount(_), _) => "Enter next / submit  ↑ previous  Esc cancel",
            (InputMode::ConfirmRemove(_), _) => "y remove  any other key keeps the account",
            (InputMode::LogDetail, _) => "any key closes",
            (InputMode::Normal, Tab::Dashboard) => {
                "s start  x stop  r refresh  e edit  t test mode  +/- interval  p preset"
            }
            (InputMode::Normal, Tab::Logs) => match self.logs_mode {
                LogsMode::Live => "r refresh  ↑/↓ scroll  a analysis  c clear  d download",
                LogsMode::Analysis => "r reload  ↑/↓ select  Enter details  a live  d download",
            },
            (InputMode::Normal, Tab::Accounts) => "↑/↓ select  n add  x remove  r refresh",
        };
        let mut spans = vec![Span::styled(format!(" {keys}"), self.theme.dim)];
        if self.mode == InputMode::Normal {
            spans.push(Span::styled("  1/2/3 tabs  q quit", self.theme.dim));
        }
        Line::from(spans)
    }

    /// Render the current application state into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let clock = chrono::Local::now().format("%H:%M:%S").to_string();
        let header = Header::new(&self.api_url, &clock, self.tab, &self.theme).to_lines();
        let notifications = self.notification_lines();

        let chunks = Layout::vertical([
            Constraint::Length(header.len() as u16),
            Constraint::Min(3),
            Constraint::Length(notifications.len() as u16),
            Constraint::Length(1),
        ])
        .split(frame.area());

        frame.render_widget(Paragraph::new(Text::from(header)), chunks[0]);

        let edit = match &self.mode {
            InputMode::EditConfig(edit) => Some(edit),
            _ => None,
        };
        let logs = self.backend.logs.snapshot();
        match self.tab {
            Tab::Dashboard => dashboard_view::render_dashboard_view(
                frame,
                chunks[1],
                &self.backend.session.snapshot(),
                edit,
                &self.theme,
            ),
            Tab::Logs => logs_view::render_logs_view(
                frame,
                chunks[1],
                &logs,
                self.logs_mode,
                self.logs_cursor,
                &self.theme,
            ),
            Tab::Accounts => accounts_view::render_accounts_view(
                frame,
                chunks[1],
                &self.backend.accounts.snapshot(),
                self.account_selected,
                &self.theme,
            ),
        }

        match &self.mode {
            InputMode::AddAccount(form) => {
                accounts_view::render_account_form(frame, chunks[1], form, &self.theme)
            }
            InputMode::ConfirmRemove(username) => {
                accounts_view::render_remove_prompt(frame, chunks[1], username, &self.theme)
            }
            InputMode::LogDetail => {
                if let Some(entry) = logs_view::selected_entry(&logs, self.logs_cursor.selected) {
                    logs_view::render_analysis_detail(frame, chunks[1], entry, &self.theme);
                }
            }
            InputMode::Normal | InputMode::EditConfig(_) => {}
        }

        frame.render_widget(Paragraph::new(Text::from(notifications)), chunks[2]);
        frame.render_widget(Paragraph::new(self.help_line()), chunks[3]);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_api::{ApiError, ApiResult, HttpApiClient};
    use dashboard_core::models::{
        AccountsResponse, CommandAck, MonitoringConfig, MonitoringStats, DEFAULT_CHECK_INTERVAL,
    };
    use dashboard_runtime::session::SessionOptions;
    use ratatui::backend::TestBackend;
    use std::sync::Mutex;

    const CSV: &str = "timestamp,mode,type,content_id,reddit_permalink,ai_decision,reason,original_content,generated_reply\n\
        2024-05-01 10:00,TEST_MODE,post,p1,https://reddit.com/p1,YES,mentions rupture,Tore my achilles,Hope it heals\n\
        2024-05-01 10:05,LIVE_MODE,comment,c1,https://reddit.com/c1,NO,off topic,Nice weather,N/A\n";

    /// Backend with canned logs, analysis and an in-memory account list.
    struct StubApi {
        logs: Vec<String>,
        accounts: Mutex<Vec<Account>>,
    }

    impl StubApi {
        fn new(usernames: &[&str]) -> Self {
            Self {
                logs: (1..=30).map(|i| format!("INFO line {i}")).collect(),
                accounts: Mutex::new(usernames.iter().map(|u| stub_account(u)).collect()),
            }
        }
    }

    fn stub_account(username: &str) -> Account {
        Account {
            client_id: format!("{username}-client"),
            client_secret: "secret".to_string(),
            username: username.to_string(),
            password: "pw".to_string(),
            api_key: String::new(),
        }
    }

    impl MonitorApi for StubApi {
        async fn start_monitoring(&self, _config: &MonitoringConfig) -> ApiResult<CommandAck> {
            Ok(CommandAck {
                status: "started".to_string(),
            })
        }

        async fn stop_monitoring(&self) -> ApiResult<CommandAck> {
            Ok(CommandAck {
                status: "stopped".to_string(),
            })
        }

        async fn get_status(&self) -> ApiResult<MonitoringStats> {
            Err(ApiError::Unavailable("no status".to_string()))
        }

        async fn get_logs(&self, limit: usize) -> ApiResult<Vec<String>> {
            Ok(self.logs.iter().take(limit).cloned().collect())
        }

        async fn clear_logs(&self) -> ApiResult<()> {
            Ok(())
        }

        async fn download_analysis_log(&self) -> ApiResult<Vec<u8>> {
            Ok(CSV.as_bytes().to_vec())
        }

        async fn get_accounts(&self) -> ApiResult<AccountsResponse> {
            let accounts = self.accounts.lock().unwrap().clone();
            let status = vec![true; accounts.len()];
            Ok(AccountsResponse { accounts, status })
        }

        async fn add_account(&self, account: &Account) -> ApiResult<()> {
            self.accounts.lock().unwrap().push(account.clone());
            Ok(())
        }

        async fn remove_account(&self, username: &str) -> ApiResult<()> {
            self.accounts.lock().unwrap().retain(|a| a.username != username);
            Ok(())
        }
    }

    fn stub_app(tab: Tab, usernames: &[&str]) -> App<StubApi> {
        let api = Arc::new(StubApi::new(usernames));
        let backend = Backend {
            session: Arc::new(MonitoringSession::new(
                Arc::clone(&api),
                SessionOptions::default(),
            )),
            logs: LogsFeed::new(Arc::clone(&api)),
            accounts: Arc::new(AccountsRoster::new(api)),
            download_dir: std::env::temp_dir(),
        };
        App::new("dark", tab, "http://stub", backend)
    }

    fn special(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text<A: MonitorApi>(app: &mut App<A>, text: &str) {
        for c in text.chars() {
            assert_eq!(app.handle_key(key(c)), None);
        }
    }

    fn clear_buffer<A: MonitorApi>(app: &mut App<A>) {
        for _ in 0..100 {
            app.handle_key(special(KeyCode::Backspace));
        }
    }

    /// Nothing listens on the discard port, so any request fails fast.
    const DEAD_URL: &str = "http://127.0.0.1:9";

    fn make_backend() -> Backend<HttpApiClient> {
        let api = Arc::new(HttpApiClient::new(DEAD_URL).unwrap());
        Backend {
            session: Arc::new(MonitoringSession::new(
                Arc::clone(&api),
                SessionOptions::default(),
            )),
            logs: LogsFeed::new(Arc::clone(&api)),
            accounts: Arc::new(AccountsRoster::new(api)),
            download_dir: std::env::temp_dir(),
        }
    }

    fn make_app(tab: Tab) -> App<HttpApiClient> {
        App::new("dark", tab, DEAD_URL, make_backend())
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    // ── Tab ───────────────────────────────────────────────────────────────────

    #[test]
    fn test_tab_from_view() {
        assert_eq!(Tab::from_view("logs"), Tab::Logs);
        assert_eq!(Tab::from_view(" Accounts "), Tab::Accounts);
        assert_eq!(Tab::from_view("dashboard"), Tab::Dashboard);
        assert_eq!(Tab::from_view("realtime"), Tab::Dashboard);
    }

    #[test]
    fn test_tab_next_cycles() {
        assert_eq!(Tab::Dashboard.next(), Tab::Logs);
        assert_eq!(Tab::Logs.next(), Tab::Accounts);
        assert_eq!(Tab::Accounts.next(), Tab::Dashboard);
    }

    // ── Keys ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_quit_keys() {
        let mut app = make_app(Tab::Dashboard);
        assert_eq!(app.handle_key(key('q')), None);
        assert!(app.should_quit);

        let mut app = make_app(Tab::Logs);
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_tab_switch_requests_fetch() {
        let mut app = make_app(Tab::Dashboard);
        assert_eq!(app.handle_key(key('2')), Some(Action::RefreshLogs));
        assert_eq!(app.tab, Tab::Logs);
        assert_eq!(app.handle_key(key('2')), None);
        assert_eq!(
            app.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE)),
            Some(Action::RefreshAccounts)
        );
        assert_eq!(app.tab, Tab::Accounts);
        assert_eq!(app.handle_key(key('1')), None);
        assert_eq!(app.tab, Tab::Dashboard);
    }

    #[test]
    fn test_plain_c_on_logs_clears_not_quits() {
        let mut app = make_app(Tab::Logs);
        assert_eq!(app.handle_key(key('c')), Some(Action::ClearLogs));
        assert!(!app.should_quit);
    }

    #[test]
    fn test_dashboard_command_keys() {
        let mut app = make_app(Tab::Dashboard);
        assert_eq!(app.handle_key(key('s')), Some(Action::Start));
        assert_eq!(app.handle_key(key('x')), Some(Action::Stop));
        assert_eq!(app.handle_key(key('r')), Some(Action::RefreshStats));
        assert_eq!(app.handle_key(key('d')), None);
    }

    #[test]
    fn test_toggle_test_mode_and_interval() {
        let mut app = make_app(Tab::Dashboard);
        assert!(app.backend.session.config().test_mode);

        app.handle_key(key('t'));
        assert!(!app.backend.session.config().test_mode);

        app.handle_key(key('+'));
        assert_eq!(app.backend.session.config().check_interval, 3);
        for _ in 0..10 {
            app.handle_key(key('-'));
        }
        assert_eq!(app.backend.session.config().check_interval, MIN_CHECK_INTERVAL);
    }

    #[test]
    fn test_presets_cycle_and_notify() {
        let mut app = make_app(Tab::Dashboard);
        app.handle_key(key('t'));
        app.handle_key(key('p'));
        let config = app.backend.session.config();
        assert_eq!(config, ConfigPreset::GeneralHelp.config());
        assert!(config.test_mode);
        assert_eq!(app.notifications.len(), 1);
        assert!(app.notifications[0].message.contains("General Help"));

        app.handle_key(key('p'));
        assert_eq!(app.backend.session.config(), MonitoringConfig::default());
    }

    #[test]
    fn test_logs_mode_toggle_loads_analysis() {
        let mut app = make_app(Tab::Logs);
        assert_eq!(app.handle_key(key('r')), Some(Action::RefreshLogs));
        assert_eq!(app.handle_key(key('a')), Some(Action::LoadAnalysis));
        assert_eq!(app.logs_mode, LogsMode::Analysis);
        assert_eq!(app.handle_key(key('r')), Some(Action::LoadAnalysis));
        assert_eq!(app.handle_key(key('d')), Some(Action::DownloadAnalysis));
        assert_eq!(app.handle_key(key('a')), Some(Action::RefreshLogs));
    }

    // ── Config editing ────────────────────────────────────────────────────────

    #[test]
    fn test_edit_subreddit_captures_command_keys() {
        let mut app = make_app(Tab::Dashboard);
        app.handle_key(key('e'));
        assert!(matches!(app.mode, InputMode::EditConfig(ref e) if e.buffer == "AskReddit"));

        clear_buffer(&mut app);
        type_text(&mut app, "r/AskScience");
        type_text(&mut app, "q2");
        app.handle_key(special(KeyCode::Backspace));
        app.handle_key(special(KeyCode::Backspace));
        assert!(!app.should_quit);
        assert_eq!(app.tab, Tab::Dashboard);

        assert_eq!(app.handle_key(special(KeyCode::Enter)), None);
        assert_eq!(app.mode, InputMode::Normal);
        assert_eq!(app.backend.session.config().subreddit, "AskScience");
        assert!(app.notifications[0].message.contains("Subreddit updated"));
    }

    #[test]
    fn test_edit_interval_falls_back_and_clamps() {
        let mut app = make_app(Tab::Dashboard);
        app.handle_key(key('+'));
        assert_eq!(app.backend.session.config().check_interval, 3);

        app.handle_key(key('e'));
        app.handle_key(special(KeyCode::Tab));
        app.handle_key(special(KeyCode::Tab));
        assert!(matches!(
            app.mode,
            InputMode::EditConfig(ref e) if e.field == ConfigField::Interval
        ));
        clear_buffer(&mut app);
        type_text(&mut app, "abc");
        app.handle_key(special(KeyCode::Enter));
        assert_eq!(app.backend.session.config().check_interval, DEFAULT_CHECK_INTERVAL);

        app.handle_key(key('e'));
        app.handle_key(special(KeyCode::Tab));
        app.handle_key(special(KeyCode::Tab));
        clear_buffer(&mut app);
        type_text(&mut app, "90");
        app.handle_key(special(KeyCode::Enter));
        assert_eq!(app.backend.session.config().check_interval, MAX_CHECK_INTERVAL);
    }

    #[test]
    fn test_edit_topic_filter_and_cancel() {
        let mut app = make_app(Tab::Dashboard);
        app.handle_key(key('e'));
        app.handle_key(special(KeyCode::Tab));
        clear_buffer(&mut app);
        type_text(&mut app, "running injuries");
        app.handle_key(special(KeyCode::Enter));
        assert_eq!(app.backend.session.config().topic_filter, "running injuries");

        app.handle_key(key('e'));
        type_text(&mut app, "zzz");
        app.handle_key(special(KeyCode::Esc));
        assert_eq!(app.mode, InputMode::Normal);
        assert_eq!(app.backend.session.config().subreddit, "AskReddit");
    }

    #[test]
    fn test_blank_subreddit_is_refused() {
        let mut app = make_app(Tab::Dashboard);
        app.handle_key(key('e'));
        clear_buffer(&mut app);
        type_text(&mut app, "r/");
        app.handle_key(special(KeyCode::Enter));

        assert!(matches!(app.mode, InputMode::EditConfig(_)));
        assert_eq!(app.backend.session.config().subreddit, "AskReddit");
        assert_eq!(app.notifications[0].level, NotificationLevel::Error);
    }

    // ── Accounts ──────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_remove_account_needs_confirmation() {
        let mut app = stub_app(Tab::Accounts, &["alice", "bob"]);
        perform(&app.backend, Action::RefreshAccounts).await;

        app.handle_key(special(KeyCode::Down));
        app.handle_key(special(KeyCode::Down));
        assert_eq!(app.account_selected, 1);
        assert_eq!(app.handle_key(key('x')), None);
        assert_eq!(app.mode, InputMode::ConfirmRemove("bob".to_string()));

        assert_eq!(app.handle_key(key('n')), None);
        assert_eq!(app.mode, InputMode::Normal);
        assert_eq!(app.backend.accounts.accounts().len(), 2);

        app.handle_key(key('x'));
        let action = app.handle_key(key('y')).unwrap();
        assert_eq!(action, Action::RemoveAccount("bob".to_string()));

        let notification = perform(&app.backend, action).await.unwrap();
        assert_eq!(notification.level, NotificationLevel::Success);
        let accounts = app.backend.accounts.accounts();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].account.username, "alice");
    }

    #[test]
    fn test_remove_without_accounts_notifies() {
        let mut app = make_app(Tab::Accounts);
        assert_eq!(app.handle_key(key('x')), None);
        assert_eq!(app.mode, InputMode::Normal);
        assert_eq!(app.notifications[0].message, "No account selected");
    }

    #[tokio::test]
    async fn test_add_account_form_submits() {
        let mut app = stub_app(Tab::Accounts, &[]);
        app.handle_key(key('n'));
        for value in ["cid", "csecret", "new_bot", "pw", ""] {
            type_text(&mut app, value);
            if value.is_empty() {
                break;
            }
            assert_eq!(app.handle_key(special(KeyCode::Enter)), None);
        }
        let action = app.handle_key(special(KeyCode::Enter)).unwrap();
        assert_eq!(app.mode, InputMode::Normal);
        let Action::AddAccount(ref account) = action else {
            panic!("expected AddAccount, got {action:?}");
        };
        assert_eq!(account.username, "new_bot");
        assert_eq!(account.client_secret, "csecret");
        assert!(account.api_key.is_empty());

        let notification = perform(&app.backend, action).await.unwrap();
        assert_eq!(notification.message, "Account added successfully");
        assert_eq!(app.backend.accounts.accounts()[0].account.username, "new_bot");
    }

    #[test]
    fn test_add_account_requires_username() {
        let mut app = make_app(Tab::Accounts);
        app.handle_key(key('n'));
        for _ in 0..5 {
            app.handle_key(special(KeyCode::Enter));
        }
        assert!(matches!(app.mode, InputMode::AddAccount(_)));
        assert_eq!(app.notifications[0].message, "Username must not be empty");

        app.handle_key(special(KeyCode::Up));
        app.handle_key(special(KeyCode::Up));
        type_text(&mut app, "bot");
        app.handle_key(special(KeyCode::Esc));
        assert_eq!(app.mode, InputMode::Normal);
    }

    // ── Logs ──────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_live_logs_scroll() {
        let mut app = stub_app(Tab::Logs, &[]);
        perform(&app.backend, Action::RefreshLogs).await;

        app.handle_key(special(KeyCode::Up));
        app.handle_key(key('k'));
        app.handle_key(key('k'));
        assert_eq!(app.logs_cursor.live_scroll, 3);
        app.handle_key(special(KeyCode::Down));
        assert_eq!(app.logs_cursor.live_scroll, 2);
        for _ in 0..5 {
            app.handle_key(special(KeyCode::PageUp));
        }
        assert_eq!(app.logs_cursor.live_scroll, 30);
        app.handle_key(special(KeyCode::PageDown));
        assert_eq!(app.logs_cursor.live_scroll, 20);

        assert_eq!(app.handle_key(key('c')), Some(Action::ClearLogs));
        assert_eq!(app.logs_cursor.live_scroll, 0);
    }

    #[tokio::test]
    async fn test_analysis_selection_opens_detail() {
        let mut app = stub_app(Tab::Logs, &[]);
        assert_eq!(app.handle_key(key('a')), Some(Action::LoadAnalysis));
        app.handle_key(special(KeyCode::Enter));
        assert_eq!(app.mode, InputMode::Normal);

        perform(&app.backend, Action::LoadAnalysis).await;
        app.handle_key(key('j'));
        app.handle_key(key('j'));
        assert_eq!(app.logs_cursor.selected, 1);

        app.handle_key(special(KeyCode::Enter));
        assert_eq!(app.mode, InputMode::LogDetail);
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        let out: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(out.contains("https://reddit.com/p1"), "{out}");
        assert!(out.contains("Tore my achilles"), "{out}");

        assert_eq!(app.handle_key(key('q')), None);
        assert!(!app.should_quit);
        assert_eq!(app.mode, InputMode::Normal);
    }

    #[tokio::test]
    async fn test_auto_refresh_only_on_live_logs() {
        let mut app = make_app(Tab::Dashboard);
        app.sync_auto_refresh();
        assert!(!app.auto_refresh_active());

        app.handle_key(key('2'));
        app.sync_auto_refresh();
        assert!(app.auto_refresh_active());

        app.handle_key(key('a'));
        app.sync_auto_refresh();
        assert!(!app.auto_refresh_active());

        app.handle_key(key('a'));
        app.sync_auto_refresh();
        assert!(app.auto_refresh_active());

        app.handle_key(key('3'));
        app.sync_auto_refresh();
        assert!(!app.auto_refresh_active());
    }

    // ── Notifications ─────────────────────────────────────────────────────────

    #[test]
    fn test_notifications_expire_after_ttl() {
        let mut app = make_app(Tab::Dashboard);
        app.notify(Notification::success("Monitoring started"));
        let created = app.notifications[0].created_at;

        app.prune_notifications(created + Duration::from_secs(3));
        assert_eq!(app.notifications.len(), 1);

        app.prune_notifications(created + NOTIFICATION_TTL);
        assert!(app.notifications.is_empty());
    }

    #[tokio::test]
    async fn test_failed_start_reports_error() {
        let backend = make_backend();
        let notification = perform(&backend, Action::Start).await.unwrap();
        assert_eq!(notification.level, NotificationLevel::Error);
        assert!(!backend.session.snapshot().config_loading);
    }

    #[tokio::test]
    async fn test_failed_refresh_reports_error() {
        let backend = make_backend();
        let notification = perform(&backend, Action::RefreshAccounts).await.unwrap();
        assert_eq!(notification.level, NotificationLevel::Error);
        assert!(notification.message.starts_with("Failed to fetch accounts"));
    }

    // ── Render ────────────────────────────────────────────────────────────────

    #[test]
    fn test_render_every_tab_does_not_panic() {
        for tab in Tab::ALL {
            let mut app = make_app(tab);
            app.notify(Notification::error("Failed to fetch logs"));
            let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
            terminal.draw(|frame| app.render(frame)).unwrap();
        }
    }

    #[test]
    fn test_render_modal_popups() {
        let mut app = make_app(Tab::Accounts);
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();

        app.mode = InputMode::ConfirmRemove("helper_bot".to_string());
        terminal.draw(|frame| app.render(frame)).unwrap();
        let out: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(out.contains("remove account \"helper_bot\""), "{out}");
        assert!(out.contains("any other key keeps the account"), "{out}");

        app.mode = InputMode::AddAccount(AccountForm::default());
        terminal.draw(|frame| app.render(frame)).unwrap();

        app.mode = InputMode::Normal;
        app.tab = Tab::Dashboard;
        app.handle_key(key('e'));
        terminal.draw(|frame| app.render(frame)).unwrap();
    }
}
