use crate::themes::Theme;
use dashboard_core::formatting::format_mode;
use dashboard_core::models::MonitorStatus;
use dashboard_runtime::cooldown::Cooldown;
use ratatui::text::{Line, Span};

// ── StatusIndicator ──────────────────────────────────────────────────────────

/// Coloured status dot plus label, e.g. `"● Status: Active"`.
pub struct StatusIndicator<'a> {
    pub status: &'a MonitorStatus,
    pub theme: &'a Theme,
}

impl<'a> StatusIndicator<'a> {
    pub fn new(status: &'a MonitorStatus, theme: &'a Theme) -> Self {
        Self { status, theme }
    }

    /// Filled dot while running, hollow otherwise.
    pub fn dot(&self) -> &'static str {
        if self.status.is_running() {
            "●"
        } else {
            "○"
        }
    }

    pub fn to_line(&self) -> Line<'a> {
        let style = self.theme.status_style(self.status);
        Line::from(vec![
            Span::styled(self.dot(), style),
            Span::styled(" Status: ", self.theme.label),
            Span::styled(self.status.display_label(), style),
        ])
    }
}

// ── MonitoringTarget ─────────────────────────────────────────────────────────

/// `"Monitoring: r/AskReddit (Test Mode)"`. Live mode is highlighted.
pub struct MonitoringTarget<'a> {
    pub subreddit: &'a str,
    pub test_mode: bool,
    pub theme: &'a Theme,
}

impl<'a> MonitoringTarget<'a> {
    pub fn new(subreddit: &'a str, test_mode: bool, theme: &'a Theme) -> Self {
        Self {
            subreddit,
            test_mode,
            theme,
        }
    }

    pub fn to_line(&self) -> Line<'a> {
        let mode_style = if self.test_mode {
            self.theme.info
        } else {
            self.theme.warning
        };
        Line::from(vec![
            Span::styled("Monitoring: ", self.theme.label),
            Span::styled(format!("r/{}", self.subreddit), self.theme.value),
            Span::styled(" (", self.theme.dim),
            Span::styled(format_mode(self.test_mode), mode_style),
            Span::styled(")", self.theme.dim),
        ])
    }
}

// ── ControlHint ──────────────────────────────────────────────────────────────

/// The start/stop control as it would read on a button.
///
/// While the bot runs (or is starting) the control is Stop, otherwise Start.
/// A running cooldown replaces the label with the countdown; a transition in
/// the opposite direction shows the transitional label instead.
pub struct ControlHint<'a> {
    pub status: &'a MonitorStatus,
    pub cooldown: Cooldown,
    pub busy: bool,
    pub theme: &'a Theme,
}

impl<'a> ControlHint<'a> {
    pub fn new(status: &'a MonitorStatus, cooldown: Cooldown, busy: bool, theme: &'a Theme) -> Self {
        Self {
            status,
            cooldown,
            busy,
            theme,
        }
    }

    /// `true` when the control shows Stop rather than Start.
    pub fn is_stop(&self) -> bool {
        matches!(self.status, MonitorStatus::Active | MonitorStatus::Starting)
    }

    /// `false` while a command is in flight, the cooldown runs or the bot is
    /// transitioning.
    pub fn enabled(&self) -> bool {
        let transitioning = if self.is_stop() {
            *self.status == MonitorStatus::Starting
        } else {
            *self.status == MonitorStatus::Stopping
        };
        !(self.busy || self.cooldown.active || transitioning)
    }

    pub fn label(&self) -> String {
        if self.cooldown.active {
            return format!("Wait {}s", self.cooldown.remaining);
        }
        match (self.is_stop(), self.status) {
            (true, MonitorStatus::Starting) => "Starting...".to_string(),
            (true, _) => "[x] Stop".to_string(),
            (false, MonitorStatus::Stopping) => "Stopping...".to_string(),
            (false, _) => "[s] Start".to_string(),
        }
    }

    pub fn to_line(&self) -> Line<'a> {
        let style = if !self.enabled() {
            self.theme.dim
        } else if self.is_stop() {
            self.theme.error
        } else {
            self.theme.success
        };
        Line::from(vec![
            Span::styled("Control: ", self.theme.label),
            Span::styled(self.label(), style),
        ])
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
