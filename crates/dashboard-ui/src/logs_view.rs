//! Logs tab: the live log tail and the parsed AI analysis export.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use dashboard_core::logs::{CsvLogEntry, LogLevel};
use dashboard_runtime::logs::LogsState;

use crate::components::popup::render_popup;
use crate::themes::Theme;

/// Which half of the logs tab is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogsMode {
    #[default]
    Live,
    Analysis,
}

impl LogsMode {
    pub fn toggle(self) -> Self {
        match self {
            LogsMode::Live => LogsMode::Analysis,
            LogsMode::Analysis => LogsMode::Live,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            LogsMode::Live => "Live Logs",
            LogsMode::Analysis => "AI Analysis",
        }
    }
}

/// Scroll and selection for the logs tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogsCursor {
    /// Live lines hidden below the view; 0 follows the tail.
    pub live_scroll: usize,
    /// Index into the analysis rows, newest first.
    pub selected: usize,
}

/// The analysis entry at `selected`, counting from the newest.
pub fn selected_entry(state: &LogsState, selected: usize) -> Option<&CsvLogEntry> {
    state.analysis.iter().rev().nth(selected)
}

/// Cut `text` to at most `width` terminal columns, marking the cut with `…`.
pub fn fit_to_width(text: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= width {
        return text.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Style each live line by its inferred level and keep the `height` lines
/// that end `scroll` lines above the tail.
pub fn build_live_lines<'a>(
    lines: &'a [String],
    width: usize,
    height: usize,
    scroll: usize,
    theme: &'a Theme,
) -> Vec<Line<'a>> {
    let end = lines.len().saturating_sub(scroll);
    let skip = end.saturating_sub(height);
    lines[..end]
        .iter()
        .skip(skip)
        .map(|line| {
            Line::from(Span::styled(
                fit_to_width(line, width),
                theme.log_style(LogLevel::classify(line)),
            ))
        })
        .collect()
}

fn block(title: String, theme: &Theme) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.table_border)
        .title(title)
}

fn render_placeholder(frame: &mut Frame, area: Rect, title: String, hint: &str, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No logs available", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(hint.to_string(), theme.dim)),
    ];
    frame.render_widget(Paragraph::new(Text::from(text)).block(block(title, theme)), area);
}

fn render_live(frame: &mut Frame, area: Rect, state: &LogsState, scroll: usize, theme: &Theme) {
    let scroll = scroll.min(state.lines.len());
    let title = if state.refreshing {
        format!(" {} (refreshing) ", LogsMode::Live.title())
    } else if scroll > 0 {
        format!(
            " {} ({} lines, {} below) ",
            LogsMode::Live.title(),
            state.lines.len(),
            scroll
        )
    } else {
        format!(" {} ({} lines) ", LogsMode::Live.title(), state.lines.len())
    };
    if state.lines.is_empty() {
        let hint = if state.loading {
            "Loading logs..."
        } else {
            "Press [r] to refresh or [a] to view the AI analysis"
        };
        render_placeholder(frame, area, title, hint, theme);
        return;
    }

    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;
    let lines = build_live_lines(&state.lines, inner_width, inner_height, scroll, theme);
    frame.render_widget(Paragraph::new(Text::from(lines)).block(block(title, theme)), area);
}

fn analysis_row<'a>(index: usize, entry: &'a CsvLogEntry, theme: &Theme) -> Row<'a> {
    let style = if index % 2 == 0 {
        theme.table_row
    } else {
        theme.table_row_alt
    };
    let mode_style = if entry.is_live_mode() {
        theme.warning
    } else {
        theme.info
    };
    Row::new(vec![
        Cell::from(entry.timestamp.as_str()),
        Cell::from(entry.mode.as_str()).style(mode_style),
        Cell::from(entry.kind.as_str()),
        Cell::from(entry.ai_decision.as_str()).style(theme.decision_style(entry.decision_is_yes())),
        Cell::from(entry.reason.as_str()),
        Cell::from(entry.generated_reply().unwrap_or("-")),
    ])
    .style(style)
}

fn render_analysis(
    frame: &mut Frame,
    area: Rect,
    state: &LogsState,
    selected: usize,
    theme: &Theme,
) {
    let title = format!(
        " {} ({} entries) ",
        LogsMode::Analysis.title(),
        state.analysis.len()
    );
    if state.analysis.is_empty() {
        render_placeholder(
            frame,
            area,
            title,
            "Press [r] to load the analysis export or [d] to download it",
            theme,
        );
        return;
    }

    let header = Row::new(
        ["Timestamp", "Mode", "Type", "Decision", "Reason", "Reply"]
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    )
    .height(1);

    // Newest first.
    let rows: Vec<Row> = state
        .analysis
        .iter()
        .rev()
        .enumerate()
        .map(|(i, entry)| analysis_row(i, entry, theme))
        .collect();

    let widths = [
        Constraint::Length(19),
        Constraint::Length(10),
        Constraint::Length(8),
        Constraint::Length(9),
        Constraint::Percentage(40),
        Constraint::Percentage(60),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block(title, theme))
        .style(theme.text)
        .row_highlight_style(theme.table_selected);
    let mut table_state =
        TableState::default().with_selected(Some(selected.min(state.analysis.len() - 1)));
    frame.render_stateful_widget(table, area, &mut table_state);
}

/// Render the logs tab in the given `mode`.
pub fn render_logs_view(
    frame: &mut Frame,
    area: Rect,
    state: &LogsState,
    mode: LogsMode,
    cursor: LogsCursor,
    theme: &Theme,
) {
    match mode {
        LogsMode::Live => render_live(frame, area, state, cursor.live_scroll, theme),
        LogsMode::Analysis => render_analysis(frame, area, state, cursor.selected, theme),
    }
}

fn detail_row<'a>(label: &'a str, value: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{label:<18}"), theme.label),
        Span::styled(value, theme.value),
    ])
}

/// Popup with every column of one analysis entry.
pub fn render_analysis_detail(frame: &mut Frame, area: Rect, entry: &CsvLogEntry, theme: &Theme) {
    let mode_style = if entry.is_live_mode() {
        theme.warning
    } else {
        theme.info
    };
    let lines = vec![
        detail_row("Timestamp", &entry.timestamp, theme),
        Line::from(vec![
            Span::styled(format!("{:<18}", "Mode"), theme.label),
            Span::styled(entry.mode.as_str(), mode_style),
        ]),
        detail_row("Type", &entry.kind, theme),
        detail_row("Content ID", &entry.content_id, theme),
        detail_row("Reddit Link", &entry.reddit_permalink, theme),
        Line::from(vec![
            Span::styled(format!("{:<18}", "AI Decision"), theme.label),
            Span::styled(
                entry.ai_decision.as_str(),
                theme.decision_style(entry.decision_is_yes()),
            ),
        ]),
        detail_row("Reason", &entry.reason, theme),
        Line::from(""),
        Line::from(Span::styled("Original Content", theme.bold)),
        Line::from(Span::styled(entry.original_content.as_str(), theme.text)),
        Line::from(""),
        Line::from(Span::styled("Generated Reply", theme.bold)),
        Line::from(Span::styled(
            entry.generated_reply().unwrap_or("No reply generated"),
            theme.text,
        )),
        Line::from(""),
        Line::from(Span::styled("Press any key to close", theme.dim)),
    ];
    render_popup(frame, area, "Analysis Entry", lines, theme);
}

// ── Tests ──────────────────────────────────────────────────────────────────────
