use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::explorer::ExplorerRow;
use crate::theme::ThemeColors;

/// Tree widget that renders the flattened explorer rows with box-drawing
/// characters and collapse chevrons.
pub struct TreeWidget<'a> {
    rows: &'a [ExplorerRow],
    selected: usize,
    scroll_offset: usize,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> TreeWidget<'a> {
    pub fn new(
        rows: &'a [ExplorerRow],
        selected: usize,
        scroll_offset: usize,
        theme: &'a ThemeColors,
    ) -> Self {
        Self {
            rows,
            selected,
            scroll_offset,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    /// Build the prefix string for tree indentation using box-drawing characters.
    ///
    /// We need to know the ancestor chain to draw continuation lines correctly.
    fn build_prefix(row: &ExplorerRow, rows: &[ExplorerRow], row_index: usize) -> String {
        if row.depth == 0 {
            return String::new();
        }

        let mut parts: Vec<&str> = Vec::new();

        // For each ancestor level, determine if it's the last sibling at
        // that level by walking backwards from the current row.
        for d in 1..row.depth {
            let mut ancestor_is_last = false;
            for j in (0..row_index).rev() {
                if rows[j].depth == d {
                    ancestor_is_last = rows[j].is_last_sibling;
                    break;
                }
                if rows[j].depth < d {
                    break;
                }
            }
            if ancestor_is_last {
                parts.push("   ");
            } else {
                parts.push("│  ");
            }
        }

        // The connector for this row
        if row.is_last_sibling {
            parts.push("└──");
        } else {
            parts.push("├──");
        }

        parts.join("")
    }

    /// Chevron for folders, spacing for files.
    fn indicator(row: &ExplorerRow) -> &'static str {
        if row.is_folder {
            if row.collapsed {
                "▸ "
            } else {
                "▾ "
            }
        } else {
            "  "
        }
    }
}

impl Widget for TreeWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        let visible_height = inner_area.height as usize;
        if self.rows.is_empty() || visible_height == 0 {
            return;
        }

        let visible_rows = self
            .rows
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(visible_height);

        for (i, (idx, row)) in visible_rows.enumerate() {
            let y = inner_area.y + i as u16;
            if y >= inner_area.y + inner_area.height {
                break;
            }

            let prefix = Self::build_prefix(row, self.rows, idx);
            let indicator = Self::indicator(row);

            let style = if idx == self.selected {
                Style::default()
                    .bg(self.theme.tree_selected_bg)
                    .fg(self.theme.tree_selected_fg)
                    .add_modifier(Modifier::BOLD)
            } else if row.is_folder {
                Style::default()
                    .fg(self.theme.folder_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.file_fg)
            };

            let line_content = format!("{}{}{}", prefix, indicator, row.display_name);
            let line = Line::from(Span::styled(line_content, style));
            buf.set_line(inner_area.x, y, &line, inner_area.width);
        }
    }
}
