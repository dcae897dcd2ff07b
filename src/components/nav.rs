use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::config::NavLinkConfig;
use crate::overflow::OverflowList;
use crate::theme::ThemeColors;

/// Build the display labels the overflow list partitions. The trailing
/// separator is part of the label so width accounting stays honest.
pub fn nav_labels(links: &[NavLinkConfig]) -> Vec<String> {
    links
        .iter()
        .map(|link| {
            if link.external {
                format!("{}↗  ", link.text)
            } else {
                format!("{}  ", link.text)
            }
        })
        .collect()
}

/// Horizontal navigation bar driven by an [`OverflowList`]: visible links
/// left to right, then a `+N more` indicator for the rest.
pub struct NavBarWidget<'a> {
    links: &'a [NavLinkConfig],
    list: &'a OverflowList,
    theme: &'a ThemeColors,
}

impl<'a> NavBarWidget<'a> {
    pub fn new(links: &'a [NavLinkConfig], list: &'a OverflowList, theme: &'a ThemeColors) -> Self {
        Self { links, list, theme }
    }
}

impl Widget for NavBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        buf.set_style(area, Style::default().bg(self.theme.nav_bg));

        let mut spans = Vec::new();
        for &i in &self.list.partition().visible {
            let style = if self.links.get(i).map(|l| l.external).unwrap_or(false) {
                Style::default().fg(self.theme.nav_external_fg)
            } else {
                Style::default().fg(self.theme.nav_fg)
            };
            spans.push(Span::styled(self.list.labels()[i].clone(), style));
        }

        let hidden = self.list.overflow_count();
        if hidden > 0 {
            spans.push(Span::styled(
                format!("+{hidden} more"),
                Style::default()
                    .fg(self.theme.nav_overflow_fg)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
