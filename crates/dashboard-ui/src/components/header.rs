use crate::app::Tab;
use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Decorative marker placed either side of the application title.
pub const ACCENT: &str = "◆ ◇ ◆";

/// Dashboard header rendering four lines:
///
/// 1. Application title with accent decorations (ALL CAPS).
/// 2. A 60-column `=` separator.
/// 3. Backend URL and local clock in `[ url | time ]` format.
/// 4. The tab bar, with the active tab highlighted.
pub struct Header<'a> {
    /// Base URL of the backend the dashboard talks to.
    pub api_url: &'a str,
    /// Pre-formatted wall clock, e.g. `"14:05:09"`.
    pub clock: &'a str,
    pub active_tab: Tab,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(api_url: &'a str, clock: &'a str, active_tab: Tab, theme: &'a Theme) -> Self {
        Self {
            api_url,
            clock,
            active_tab,
            theme,
        }
    }

    /// Render the header as a `Vec<Line>` containing exactly four lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);

        let mut tabs: Vec<Span<'a>> = Vec::with_capacity(Tab::ALL.len() * 2);
        for (idx, tab) in Tab::ALL.iter().enumerate() {
            let style = if *tab == self.active_tab {
                self.theme.tab_active
            } else {
                self.theme.tab_inactive
            };
            tabs.push(Span::styled(format!(" {} {} ", idx + 1, tab.title()), style));
            tabs.push(Span::raw(" "));
        }

        vec![
            Line::from(vec![
                Span::styled(ACCENT, self.theme.header_accent),
                Span::styled(" REDDIT BOT DASHBOARD ", self.theme.header),
                Span::styled(ACCENT, self.theme.header_accent),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.api_url.to_string(), self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.clock.to_string(), self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(tabs),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_header_to_lines_count() {
        let theme = Theme::dark();
        let header = Header::new("https://bot.example", "12:00:00", Tab::Dashboard, &theme);
        assert_eq!(header.to_lines().len(), 4);
    }

    #[test]
    fn test_header_title_and_separator() {
        let theme = Theme::dark();
        let lines = Header::new("https://bot.example", "12:00:00", Tab::Dashboard, &theme).to_lines();

        let title = text(&lines[0]);
        assert!(title.contains("REDDIT BOT DASHBOARD"), "got: {title}");
        assert!(title.contains(ACCENT), "got: {title}");

        let sep = text(&lines[1]);
        assert_eq!(sep.chars().count(), 60);
        assert!(sep.chars().all(|c| c == '='));
    }

    #[test]
    fn test_header_info_line() {
        let theme = Theme::dark();
        let lines = Header::new("https://bot.example", "09:30:00", Tab::Logs, &theme).to_lines();
        let info = text(&lines[2]);
        assert_eq!(info, "[ https://bot.example | 09:30:00 ]");
        assert_eq!(lines[2].spans.len(), 5);
    }

    #[test]
    fn test_header_highlights_active_tab() {
        let theme = Theme::dark();
        let lines = Header::new("u", "t", Tab::Accounts, &theme).to_lines();
        let tabs = &lines[3];

        let active: Vec<&str> = tabs
            .spans
            .iter()
            .filter(|s| s.style == theme.tab_active)
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(active, vec![" 3 Accounts "]);
        assert!(text(tabs).contains("1 Dashboard"));
        assert!(text(tabs).contains("2 Logs"));
    }
}
