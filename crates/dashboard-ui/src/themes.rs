use dashboard_core::logs::LogLevel;
use dashboard_core::models::MonitorStatus;
use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`.  Background values
/// 0–6 are considered dark; 7–15 are considered light.  If the variable is
/// absent or unparseable, `BackgroundType::Dark` is returned.
pub fn detect_background() -> BackgroundType {
    if let Ok(val) = std::env::var("COLORFGBG") {
        if let Some(bg) = val.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                return if bg_num <= 6 {
                    BackgroundType::Dark
                } else {
                    BackgroundType::Light
                };
            }
        }
    }
    BackgroundType::Dark
}

/// Complete theme definition carrying all UI styles used by the dashboard.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header / tabs ────────────────────────────────────────────────────────
    pub header: Style,
    pub header_accent: Style,
    pub separator: Style,
    pub tab_active: Style,
    pub tab_inactive: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub bold: Style,
    pub label: Style,
    pub value: Style,

    // ── Levels ───────────────────────────────────────────────────────────────
    pub info: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,

    // ── Monitor status ───────────────────────────────────────────────────────
    pub status_active: Style,
    pub status_starting: Style,
    pub status_stopping: Style,
    pub status_error: Style,
    pub status_idle: Style,

    // ── Progress bars ────────────────────────────────────────────────────────
    /// Unfilled portion of a bar.
    pub progress_empty: Style,
    pub progress_label: Style,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_border: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
    /// Highlighted row in selectable tables.
    pub table_selected: Style,

    // ── Notifications ────────────────────────────────────────────────────────
    pub notification_info: Style,
    pub notification_success: Style,
    pub notification_error: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Yellow),
            separator: Style::default().fg(Color::DarkGray),
            tab_active: Style::default()
                .fg(Color::Black)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            status_active: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            status_starting: Style::default().fg(Color::Yellow),
            status_stopping: Style::default().fg(Color::LightRed),
            status_error: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            status_idle: Style::default().fg(Color::Gray),

            progress_empty: Style::default().fg(Color::DarkGray),
            progress_label: Style::default().fg(Color::Gray),

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_selected: Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),

            notification_info: Style::default().fg(Color::Cyan),
            notification_success: Style::default().fg(Color::Green),
            notification_error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        }
    }

    /// Light-background terminal theme.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::Gray),
            tab_active: Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            bold: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Blue),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            status_active: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            status_starting: Style::default().fg(Color::Yellow),
            status_stopping: Style::default().fg(Color::Magenta),
            status_error: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            status_idle: Style::default().fg(Color::DarkGray),

            progress_empty: Style::default().fg(Color::Gray),
            progress_label: Style::default().fg(Color::DarkGray),

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::Gray),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
            table_selected: Style::default()
                .bg(Color::Gray)
                .add_modifier(Modifier::BOLD),

            notification_info: Style::default().fg(Color::Blue),
            notification_success: Style::default().fg(Color::Green),
            notification_error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        }
    }

    /// Classic terminal theme using only the basic 8-colour ANSI palette,
    /// without bold modifiers.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Red),
            header_accent: Style::default().fg(Color::White),
            separator: Style::default().fg(Color::DarkGray),
            tab_active: Style::default().fg(Color::Black).bg(Color::White),
            tab_inactive: Style::default().fg(Color::White),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default().fg(Color::White),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            status_active: Style::default().fg(Color::Green),
            status_starting: Style::default().fg(Color::Yellow),
            status_stopping: Style::default().fg(Color::Yellow),
            status_error: Style::default().fg(Color::Red),
            status_idle: Style::default().fg(Color::White),

            progress_empty: Style::default().fg(Color::DarkGray),
            progress_label: Style::default().fg(Color::White),

            table_header: Style::default().fg(Color::Cyan),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_selected: Style::default().add_modifier(Modifier::REVERSED),

            notification_info: Style::default().fg(Color::Cyan),
            notification_success: Style::default().fg(Color::Green),
            notification_error: Style::default().fg(Color::Red),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name.  Falls back to `auto_detect` for unknown
    /// names.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Style for a monitor status. Inactive and unknown states share the idle
    /// style, matching their label.
    pub fn status_style(&self, status: &MonitorStatus) -> Style {
        match status {
            MonitorStatus::Active => self.status_active,
            MonitorStatus::Starting => self.status_starting,
            MonitorStatus::Stopping => self.status_stopping,
            MonitorStatus::Error => self.status_error,
            MonitorStatus::Idle | MonitorStatus::Inactive | MonitorStatus::Unknown(_) => {
                self.status_idle
            }
        }
    }

    /// Style for a classified live log line.
    pub fn log_style(&self, level: LogLevel) -> Style {
        match level {
            LogLevel::Error => self.error,
            LogLevel::Success => self.success,
            LogLevel::Warning => self.warning,
            LogLevel::Info => self.info,
            LogLevel::Default => self.text,
        }
    }

    /// Style for an AI decision cell: `YES` green, anything else dim.
    pub fn decision_style(&self, is_yes: bool) -> Style {
        if is_yes {
            self.success
        } else {
            self.dim
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
