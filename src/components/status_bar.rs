use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

/// Status bar widget that displays the manifest path, tree summary, key
/// hints, or a transient status message.
pub struct StatusBarWidget<'a> {
    manifest_str: &'a str,
    summary: &'a str,
    theme: &'a ThemeColors,
    status_message: Option<&'a str>,
    is_error: bool,
    watcher_status: Option<&'a str>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(manifest_str: &'a str, summary: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            manifest_str,
            summary,
            theme,
            status_message: None,
            is_error: false,
            watcher_status: None,
        }
    }

    pub fn status_message(mut self, msg: &'a str, is_error: bool) -> Self {
        self.status_message = Some(msg);
        self.is_error = is_error;
        self
    }

    pub fn watcher_status(mut self, status: &'a str) -> Self {
        self.watcher_status = Some(status);
        self
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let width = area.width as usize;

        if let Some(msg) = self.status_message {
            let style = if self.is_error {
                Style::default()
                    .bg(self.theme.error_fg)
                    .fg(self.theme.status_fg)
            } else {
                Style::default().fg(self.theme.info_fg)
            };

            // Pad or truncate message to fill full width
            let display: String = if msg.len() >= width {
                msg[..width].to_string()
            } else {
                format!("{:<width$}", msg, width = width)
            };

            let line = Line::from(Span::styled(display, style));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        // Normal bar: [manifest path] [summary] [key hints]
        let key_hints = " enter:open  h/l:fold  r:reset  w:watch  q:quit ";
        let hints_len = key_hints.len();

        // Reserve space for hints on the right
        let remaining = width.saturating_sub(hints_len);

        // Split remaining between path (left) and summary (center-right)
        let summary_len = self.summary.len();
        let path_budget = remaining.saturating_sub(summary_len).saturating_sub(1);

        let path_display = if self.manifest_str.len() > path_budget {
            if path_budget > 3 {
                format!(
                    "...{}",
                    &self.manifest_str[self.manifest_str.len() - (path_budget - 3)..]
                )
            } else {
                self.manifest_str[..path_budget].to_string()
            }
        } else {
            self.manifest_str.to_string()
        };

        let summary_display = if summary_len > remaining.saturating_sub(path_display.len()) {
            let budget = remaining.saturating_sub(path_display.len());
            if budget > 0 {
                self.summary[..budget].to_string()
            } else {
                String::new()
            }
        } else {
            self.summary.to_string()
        };

        // Gap between path and summary pushes the summary toward center-right
        let gap = remaining
            .saturating_sub(path_display.len())
            .saturating_sub(summary_display.len());

        let path_style = Style::default().fg(self.theme.status_fg);
        let summary_style = Style::default().fg(self.theme.info_fg);
        let hints_style = Style::default()
            .fg(self.theme.dim_fg)
            .add_modifier(Modifier::DIM);

        let mut spans = vec![
            Span::styled(path_display, path_style),
            Span::raw(" ".repeat(gap)),
            Span::styled(summary_display, summary_style),
        ];

        // Add watcher status indicator if present
        if let Some(watcher_str) = self.watcher_status {
            let watcher_style = Style::default()
                .fg(self.theme.warning_fg)
                .add_modifier(Modifier::BOLD);
            spans.push(Span::raw(" "));
            spans.push(Span::styled(watcher_str.to_string(), watcher_style));
        }

        // Pad to fill remaining width if needed, then add hints
        let used: usize = spans.iter().map(|s| s.content.len()).sum();
        let pad = width.saturating_sub(used).saturating_sub(hints_len);
        if pad > 0 {
            spans.push(Span::raw(" ".repeat(pad)));
        }
        spans.push(Span::styled(key_hints, hints_style));

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
