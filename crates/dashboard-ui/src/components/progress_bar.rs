use crate::themes::Theme;
use dashboard_core::formatting::{format_count, percentage};
use dashboard_runtime::cooldown::{Cooldown, COOLDOWN_SECS};
use ratatui::text::{Line, Span};

/// Configuration controlling visual appearance of a progress bar.
pub struct ProgressBarConfig {
    /// Width in terminal columns of the bar portion (excluding label).
    pub width: u16,
    pub filled_char: char,
    pub empty_char: char,
}

impl Default for ProgressBarConfig {
    fn default() -> Self {
        Self {
            width: 30,
            filled_char: '\u{2588}', // █  FULL BLOCK
            empty_char: '\u{2591}',  // ░  LIGHT SHADE
        }
    }
}

impl ProgressBarConfig {
    /// Split the bar into filled and empty strings for `pct` in `[0, 100]`.
    fn segments(&self, pct: f64) -> (String, String) {
        let capped = pct.clamp(0.0, 100.0);
        let filled = ((capped / 100.0) * self.width as f64).round() as usize;
        let empty = (self.width as usize).saturating_sub(filled);
        (
            std::iter::repeat_n(self.filled_char, filled).collect(),
            std::iter::repeat_n(self.empty_char, empty).collect(),
        )
    }
}

// ── CooldownBar ──────────────────────────────────────────────────────────────

/// Bar that drains as the start/stop cooldown counts down.
pub struct CooldownBar<'a> {
    pub cooldown: Cooldown,
    pub theme: &'a Theme,
    pub config: ProgressBarConfig,
}

impl<'a> CooldownBar<'a> {
    pub fn new(cooldown: Cooldown, theme: &'a Theme) -> Self {
        Self {
            cooldown,
            theme,
            config: ProgressBarConfig::default(),
        }
    }

    /// Share of the cooldown still to run; `0` when inactive.
    pub fn percentage(&self) -> f64 {
        if !self.cooldown.active {
            return 0.0;
        }
        percentage(self.cooldown.remaining as f64, COOLDOWN_SECS as f64, 1)
    }

    pub fn to_line(&self) -> Line<'a> {
        let (filled, empty) = self.config.segments(self.percentage());
        let label = if self.cooldown.active {
            format!(" {}s until next command", self.cooldown.remaining)
        } else {
            " ready".to_string()
        };
        Line::from(vec![
            Span::styled(filled, self.theme.warning),
            Span::styled(empty, self.theme.progress_empty),
            Span::styled(label, self.theme.progress_label),
        ])
    }
}

// ── ReplyRateBar ─────────────────────────────────────────────────────────────

/// Share of checked posts and comments that received an AI reply.
pub struct ReplyRateBar<'a> {
    pub replies: u64,
    pub checked: u64,
    pub theme: &'a Theme,
    pub config: ProgressBarConfig,
}

impl<'a> ReplyRateBar<'a> {
    pub fn new(replies: u64, checked: u64, theme: &'a Theme) -> Self {
        Self {
            replies,
            checked,
            theme,
            config: ProgressBarConfig::default(),
        }
    }

    pub fn percentage(&self) -> f64 {
        percentage(self.replies as f64, self.checked as f64, 1)
    }

    pub fn to_line(&self) -> Line<'a> {
        let pct = self.percentage();
        let (filled, empty) = self.config.segments(pct);
        let label = format!(
            " {:.1}% ({} / {})",
            pct,
            format_count(self.replies),
            format_count(self.checked)
        );
        Line::from(vec![
            Span::styled(filled, self.theme.success),
            Span::styled(empty, self.theme.progress_empty),
            Span::styled(label, self.theme.progress_label),
        ])
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── CooldownBar ──────────────────────────────────────────────────────────

    #[test]
    fn test_cooldown_bar_full_when_armed() {
        let theme = Theme::dark();
        let mut cooldown = Cooldown::idle();
        cooldown.arm();
        let line = CooldownBar::new(cooldown, &theme).to_line();

        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans[0].content.chars().count(), 30);
        assert!(line.spans[1].content.is_empty());
        assert!(line.spans[2].content.contains("15s until next command"));
    }

    #[test]
    fn test_cooldown_bar_drains() {
        let theme = Theme::dark();
        let cooldown = Cooldown {
            active: true,
            remaining: 5,
        };
        let bar = CooldownBar::new(cooldown, &theme);
        assert!((bar.percentage() - 33.3).abs() < 1e-9);

        let line = bar.to_line();
        assert_eq!(line.spans[0].content.chars().count(), 10);
        assert_eq!(line.spans[1].content.chars().count(), 20);
    }

    #[test]
    fn test_cooldown_bar_idle_is_empty() {
        let theme = Theme::dark();
        let line = CooldownBar::new(Cooldown::idle(), &theme).to_line();
        assert!(line.spans[0].content.is_empty());
        assert_eq!(line.spans[2].content, " ready");
    }

    // ── ReplyRateBar ─────────────────────────────────────────────────────────

    #[test]
    fn test_reply_rate_bar_label() {
        let theme = Theme::dark();
        let line = ReplyRateBar::new(25, 1_000, &theme).to_line();
        let label = &line.spans[2].content;
        assert!(label.contains("2.5%"), "label was: {label}");
        assert!(label.contains("25 / 1,000"), "label was: {label}");
    }

    #[test]
    fn test_reply_rate_bar_nothing_checked() {
        let theme = Theme::dark();
        let bar = ReplyRateBar::new(0, 0, &theme);
        assert_eq!(bar.percentage(), 0.0);
        assert_eq!(bar.to_line().spans[1].content.chars().count(), 30);
    }
}
