use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::theme::ThemeColors;

/// The region shown below the tree on narrow terminals, listing the
/// configured mobile companion components.
pub struct MobileRegionWidget<'a> {
    components: &'a [String],
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> MobileRegionWidget<'a> {
    pub fn new(components: &'a [String], theme: &'a ThemeColors) -> Self {
        Self {
            components,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }
}

impl Widget for MobileRegionWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        if inner_area.height == 0 || inner_area.width == 0 {
            return;
        }

        if self.components.is_empty() {
            let line = Line::from(Span::styled(
                "(no mobile components)",
                Style::default().fg(self.theme.dim_fg),
            ));
            buf.set_line(inner_area.x, inner_area.y, &line, inner_area.width);
            return;
        }

        for (i, name) in self.components.iter().enumerate() {
            let y = inner_area.y + i as u16;
            if y >= inner_area.y + inner_area.height {
                break;
            }
            let line = Line::from(vec![
                Span::styled("▪ ", Style::default().fg(self.theme.accent_fg)),
                Span::styled(
                    name.clone(),
                    Style::default()
                        .fg(self.theme.tree_fg)
                        .add_modifier(Modifier::BOLD),
                ),
            ]);
            buf.set_line(inner_area.x, y, &line, inner_area.width);
        }
    }
}
