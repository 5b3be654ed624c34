//! Dashboard tab: monitor status, counters and the configuration draft.

use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use dashboard_core::formatting::{format_count, format_interval, format_mode, truncate};
use dashboard_core::models::{MonitorStatus, MonitoringStats};
use dashboard_runtime::session::SessionState;

use crate::components::indicators::{ControlHint, MonitoringTarget, StatusIndicator};
use crate::components::progress_bar::{CooldownBar, ReplyRateBar};
use crate::forms::{ConfigEdit, ConfigField};
use crate::themes::Theme;

/// Width the labels of the stat and config rows are padded to.
const LABEL_WIDTH: usize = 20;

/// Longest topic filter shown before truncation.
const TOPIC_PREVIEW_CHARS: usize = 72;

/// Shown before the first snapshot arrives.
static IDLE: MonitorStatus = MonitorStatus::Idle;

fn row<'a>(label: &str, value: String, theme: &'a Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {:<width$}", label, width = LABEL_WIDTH), theme.label),
        Span::styled(value, theme.value),
    ])
}

/// Draft row, replaced by the edit buffer while `field` is being edited.
fn config_row<'a>(
    field: ConfigField,
    value: String,
    edit: Option<&ConfigEdit>,
    theme: &'a Theme,
) -> Line<'a> {
    match edit.filter(|e| e.field == field) {
        Some(edit) => Line::from(vec![
            Span::styled(
                format!("> {:<width$}", field.label(), width = LABEL_WIDTH),
                theme.header_accent,
            ),
            Span::styled(format!("{}▏", edit.buffer), theme.warning),
        ]),
        None => row(field.label(), value, theme),
    }
}

fn section<'a>(title: &'a str, theme: &'a Theme) -> Line<'a> {
    Line::from(Span::styled(title, theme.bold))
}

/// Build the full `Vec<Line>` for the dashboard tab. `edit` is the draft
/// field currently being typed into, if any.
pub fn build_dashboard_lines<'a>(
    state: &'a SessionState,
    edit: Option<&ConfigEdit>,
    theme: &'a Theme,
) -> Vec<Line<'a>> {
    let mut lines: Vec<Line<'a>> = Vec::with_capacity(32);

    if state.stats.is_none() && state.loading {
        lines.push(Line::from(Span::styled(
            "Loading monitoring status...",
            theme.dim,
        )));
        return lines;
    }

    // ── Status card ───────────────────────────────────────────────────────────
    let status = state.stats.as_ref().map_or(&IDLE, |s| &s.status);
    lines.push(StatusIndicator::new(status, theme).to_line());
    if let Some(stats) = state.stats.as_ref().filter(|s| !s.subreddit.is_empty()) {
        lines.push(MonitoringTarget::new(&stats.subreddit, stats.test_mode, theme).to_line());
    }
    lines.push(ControlHint::new(status, state.cooldown, state.config_loading, theme).to_line());
    if state.cooldown.active {
        lines.push(CooldownBar::new(state.cooldown, theme).to_line());
    }
    lines.push(Line::from(""));

    // ── Statistics ────────────────────────────────────────────────────────────
    lines.push(section("Statistics", theme));
    let zero;
    let stats = match state.stats.as_ref() {
        Some(stats) => stats,
        None => {
            zero = MonitoringStats::idle(&state.config);
            &zero
        }
    };
    lines.push(row("Posts Checked", format_count(stats.posts_checked), theme));
    lines.push(row("Comments Checked", format_count(stats.comments_checked), theme));
    lines.push(row("AI Replies", format_count(stats.ai_replies), theme));
    lines.push(Line::from(vec![
        Span::styled(format!("  {:<width$}", "Errors", width = LABEL_WIDTH), theme.label),
        Span::styled(
            format_count(stats.errors),
            if stats.errors > 0 { theme.error } else { theme.value },
        ),
    ]));
    lines.push(row("Rate Limited", format_count(stats.rate_limited), theme));
    lines.push(row("Mode", format_mode(stats.test_mode).to_string(), theme));

    let mut rate = vec![Span::styled(
        format!("  {:<width$}", "Reply Rate", width = LABEL_WIDTH),
        theme.label,
    )];
    rate.extend(
        ReplyRateBar::new(
            stats.ai_replies,
            stats.posts_checked.saturating_add(stats.comments_checked),
            theme,
        )
        .to_line()
        .spans,
    );
    lines.push(Line::from(rate));
    lines.push(Line::from(""));

    // ── Configuration draft ───────────────────────────────────────────────────
    let config = &state.config;
    lines.push(section("Monitoring Configuration", theme));
    lines.push(config_row(
        ConfigField::Subreddit,
        format!("r/{}", config.subreddit),
        edit,
        theme,
    ));
    lines.push(config_row(
        ConfigField::TopicFilter,
        truncate(&config.topic_filter, TOPIC_PREVIEW_CHARS),
        edit,
        theme,
    ));
    lines.push(config_row(
        ConfigField::Interval,
        format!("{} min ({})", config.check_interval, format_interval(config.check_interval)),
        edit,
        theme,
    ));
    lines.push(row("Test Mode", if config.test_mode { "on" } else { "off" }.to_string(), theme));
    if !config.test_mode {
        lines.push(Line::from(Span::styled(
            "  Live Mode posts real replies. Test in Test Mode first.",
            theme.warning,
        )));
    }

    lines
}

/// Render the dashboard tab into `area`.
pub fn render_dashboard_view(
    frame: &mut Frame,
    area: Rect,
    state: &SessionState,
    edit: Option<&ConfigEdit>,
    theme: &Theme,
) {
    let title = if state.refreshing {
        " Monitoring (refreshing) "
    } else {
        " Monitoring "
    };
    let paragraph = Paragraph::new(Text::from(build_dashboard_lines(state, edit, theme)))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(title),
        );
    frame.render_widget(paragraph, area);
}

// ── Tests ──────────────────────────────────────────────────────────────────────
