use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

use crate::app::App;
use crate::components::mobile::MobileRegionWidget;
use crate::components::nav::NavBarWidget;
use crate::components::status_bar::StatusBarWidget;
use crate::components::tree::TreeWidget;
use crate::theme::ThemeColors;

/// Render the full frame: nav bar on top, tree in the middle (with the
/// mobile region below it on narrow terminals), status bar at the bottom.
pub fn render(app: &mut App, frame: &mut Frame, theme: &ThemeColors) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    frame.render_widget(NavBarWidget::new(&app.nav_links, &app.nav_list, theme), chunks[0]);

    let mobile_components = app.controller.options().mobile_components.clone();
    let (tree_area, mobile_area) = if app.is_mobile() {
        let region_height = mobile_components.len().max(1) as u16 + 2;
        let main = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(region_height)])
            .split(chunks[1]);
        (main[0], Some(main[1]))
    } else {
        (chunks[1], None)
    };

    let tree_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused_fg))
        .title(format!(" {} ", app.controller.title()));

    // Remember the inner viewport for mouse hit tests and scrolling.
    let inner = tree_block.inner(tree_area);
    app.tree_area = inner;
    app.update_scroll(inner.height as usize);

    frame.render_widget(
        TreeWidget::new(&app.rows, app.selected_index, app.scroll_offset, theme)
            .block(tree_block),
        tree_area,
    );

    if let Some(area) = mobile_area {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_fg))
            .title(" Mobile ");
        frame.render_widget(
            MobileRegionWidget::new(&mobile_components, theme).block(block),
            area,
        );
    }

    let manifest_str = app.manifest_path.display().to_string();
    let mut status = StatusBarWidget::new(&manifest_str, app.summary(), theme);
    if let Some((msg, is_error, _)) = &app.status_message {
        status = status.status_message(msg, *is_error);
    } else if !app.watcher_active {
        status = status.watcher_status("⏸ watch paused");
    }
    frame.render_widget(status, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RenderContext;
    use crate::explorer::{ExplorerController, ExplorerOptions};
    use crate::pipeline::TransformSpec;
    use crate::state::CollapseStateStore;
    use crate::theme;
    use crate::trie::{FileTrieNode, SiteEntry};
    use ratatui::{backend::TestBackend, Terminal};
    use std::path::PathBuf;

    fn setup_app(mobile_components: Vec<String>) -> App {
        let tree = FileTrieNode::from_entries(&[
            SiteEntry::file("guides/intro.md"),
            SiteEntry::file("index.md"),
        ]);
        let mut ctx = RenderContext::new();
        let controller = ExplorerController::new(
            &mut ctx,
            ExplorerOptions {
                title: Some("Contents".to_string()),
                mobile_components,
                ..ExplorerOptions::default()
            },
            TransformSpec::default(),
            tree,
            CollapseStateStore::in_memory(true),
        )
        .unwrap();
        App::new(PathBuf::from("public/manifest.json"), controller, Vec::new(), 8)
    }

    fn rendered_content(app: &mut App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        let tc = theme::dark_theme();
        terminal.draw(|frame| render(app, frame, &tc)).unwrap();
        let buf = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..height {
            for x in 0..width {
                out.push_str(buf.cell((x, y)).unwrap().symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn wide_layout_has_title_and_status() {
        let mut app = setup_app(Vec::new());
        app.handle_resize(100);
        let content = rendered_content(&mut app, 100, 12);
        assert!(content.contains("Contents"));
        assert!(content.contains("index.md"));
        assert!(content.contains("q:quit"));
        assert!(!content.contains("Mobile"));
    }

    #[test]
    fn narrow_layout_shows_mobile_region() {
        let mut app = setup_app(vec!["reader-mode".to_string()]);
        app.handle_resize(60);
        let content = rendered_content(&mut app, 60, 16);
        assert!(content.contains("Mobile"));
        assert!(content.contains("reader-mode"));
    }

    #[test]
    fn render_records_tree_viewport() {
        let mut app = setup_app(Vec::new());
        app.handle_resize(100);
        rendered_content(&mut app, 100, 12);
        // Inner area of the bordered block between nav and status bars.
        assert_eq!(app.tree_area.y, 2);
        assert!(app.tree_area.height > 0);
    }

    #[test]
    fn status_message_replaces_normal_bar() {
        let mut app = setup_app(Vec::new());
        app.handle_resize(100);
        app.set_status_message("Manifest reloaded".to_string(), false);
        let content = rendered_content(&mut app, 100, 12);
        assert!(content.contains("Manifest reloaded"));
        assert!(!content.contains("q:quit"));
    }
}
