//! Accounts tab: the configured Reddit accounts with masked credentials.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use dashboard_core::models::{mask_secret, AccountWithStatus};
use dashboard_runtime::accounts::AccountsState;

use crate::components::popup::render_popup;
use crate::forms::{AccountField, AccountForm};
use crate::themes::Theme;

/// Label shown in the status column.
pub fn auth_label(authenticated: bool) -> &'static str {
    if authenticated {
        "✓ Authenticated"
    } else {
        "✗ Failed"
    }
}

fn account_row<'a>(index: usize, entry: &AccountWithStatus, theme: &Theme) -> Row<'a> {
    let style = if index % 2 == 0 {
        theme.table_row
    } else {
        theme.table_row_alt
    };
    let account = &entry.account;
    Row::new(vec![
        Cell::from(account.username.clone()),
        Cell::from(account.client_id.clone()),
        Cell::from(mask_secret(&account.client_secret)),
        Cell::from(mask_secret(&account.api_key)),
        Cell::from(auth_label(entry.status)).style(if entry.status {
            theme.success
        } else {
            theme.error
        }),
    ])
    .style(style)
}

/// Render the accounts table, or a placeholder when none are configured.
/// The row at `selected` is highlighted.
pub fn render_accounts_view(
    frame: &mut Frame,
    area: Rect,
    state: &AccountsState,
    selected: usize,
    theme: &Theme,
) {
    let title = format!(" Reddit Accounts ({}) ", state.accounts.len());

    if state.accounts.is_empty() {
        let hint = if state.loading {
            "Loading accounts..."
        } else {
            "Press [n] to add an account"
        };
        let text = vec![
            Line::from(""),
            Line::from(Span::styled("No accounts configured", theme.warning)),
            Line::from(""),
            Line::from(Span::styled(hint, theme.dim)),
        ];
        frame.render_widget(
            Paragraph::new(Text::from(text))
                .block(Block::default().borders(Borders::ALL).title(title)),
            area,
        );
        return;
    }

    let header = Row::new(
        ["Username", "Client ID", "Client Secret", "API Key", "Status"]
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    )
    .height(1);

    let rows: Vec<Row> = state
        .accounts
        .iter()
        .enumerate()
        .map(|(i, entry)| account_row(i, entry, theme))
        .collect();

    let widths = [
        Constraint::Length(20),
        Constraint::Length(24),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(title),
        )
        .style(theme.text)
        .row_highlight_style(theme.table_selected)
        .highlight_symbol("> ");
    let mut table_state =
        TableState::default().with_selected(Some(selected.min(state.accounts.len() - 1)));
    frame.render_stateful_widget(table, area, &mut table_state);
}

/// Popup for the add-account form; the active field carries a cursor.
pub fn render_account_form(frame: &mut Frame, area: Rect, form: &AccountForm, theme: &Theme) {
    let active = form.field();
    let mut lines: Vec<Line> = AccountField::ALL
        .iter()
        .map(|&field| {
            let marker = if field == active { "> " } else { "  " };
            let mut value = form.display_value(field);
            if field == active {
                value.push('▏');
            }
            let style = if field == active {
                theme.warning
            } else {
                theme.value
            };
            Line::from(vec![
                Span::styled(format!("{marker}{:<15}", field.label()), theme.label),
                Span::styled(value, style),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter next / submit  ↑ previous  Esc cancel",
        theme.dim,
    )));
    render_popup(frame, area, "Add Reddit Account", lines, theme);
}

/// Popup asking the operator to confirm deleting `username`.
pub fn render_remove_prompt(frame: &mut Frame, area: Rect, username: &str, theme: &Theme) {
    let lines = vec![
        Line::from(Span::styled(
            format!("Are you sure you want to remove account \"{username}\"?"),
            theme.warning,
        )),
        Line::from(""),
        Line::from(Span::styled("[y] remove  [n] keep", theme.dim)),
    ];
    render_popup(frame, area, "Remove Account", lines, theme);
}

// ── Tests ──────────────────────────────────────────────────────────────────────
