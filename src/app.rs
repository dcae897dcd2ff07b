use std::path::PathBuf;
use std::time::Instant;

use ratatui::layout::Rect;
use tracing::{info, warn};

use crate::components::nav::nav_labels;
use crate::config::NavLinkConfig;
use crate::explorer::{ExplorerController, ExplorerRow, ToggleOutcome};
use crate::manifest::SiteManifest;
use crate::overflow::OverflowList;
use crate::trie::FileTrieNode;

/// Terminal width below which the layout switches to the mobile region.
pub const MOBILE_BREAKPOINT: u16 = 80;

/// How long a status message stays on screen.
const STATUS_TTL_SECS: u64 = 3;

/// Main application state.
pub struct App {
    pub controller: ExplorerController,
    /// Flattened display rows, rebuilt after every interaction.
    pub rows: Vec<ExplorerRow>,
    pub selected_index: usize,
    pub scroll_offset: usize,
    pub nav_links: Vec<NavLinkConfig>,
    pub nav_list: OverflowList,
    pub status_message: Option<(String, bool, Instant)>,
    pub should_quit: bool,
    pub watcher_active: bool,
    pub manifest_path: PathBuf,
    pub terminal_width: u16,
    /// Inner tree viewport from the last render pass, for mouse hit tests.
    pub tree_area: Rect,
    summary: String,
}

impl App {
    pub fn new(
        manifest_path: PathBuf,
        controller: ExplorerController,
        nav_links: Vec<NavLinkConfig>,
        nav_reserved: u16,
    ) -> Self {
        let rows = controller.rows();
        let summary = summarize(controller.display_tree());
        let nav_list = OverflowList::new(nav_labels(&nav_links), nav_reserved);
        Self {
            controller,
            rows,
            selected_index: 0,
            scroll_offset: 0,
            nav_links,
            nav_list,
            status_message: None,
            should_quit: false,
            watcher_active: true,
            manifest_path,
            terminal_width: 0,
            tree_area: Rect::default(),
            summary,
        }
    }

    /// Translate a terminal click position into a row index.
    pub fn row_at(&self, column: u16, row: u16) -> Option<usize> {
        let area = self.tree_area;
        if column < area.x
            || column >= area.x + area.width
            || row < area.y
            || row >= area.y + area.height
        {
            return None;
        }
        let index = self.scroll_offset + (row - area.y) as usize;
        (index < self.rows.len()).then_some(index)
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Whether the narrow-terminal layout (with the mobile region) applies.
    pub fn is_mobile(&self) -> bool {
        self.terminal_width < MOBILE_BREAKPOINT
    }

    /// "N pages · M folders" for the status bar.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn selected_row(&self) -> Option<&ExplorerRow> {
        self.rows.get(self.selected_index)
    }

    /// Move selection down by one row.
    pub fn select_next(&mut self) {
        let len = self.rows.len();
        if len > 0 && self.selected_index < len - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up by one row.
    pub fn select_previous(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Jump to the first row.
    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    /// Jump to the last row.
    pub fn select_last(&mut self) {
        let len = self.rows.len();
        if len > 0 {
            self.selected_index = len - 1;
        }
    }

    /// Keep the selected row inside the viewport.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected_index + 1 - visible_height;
        }
    }

    /// Activate the selected row: folders follow the configured click
    /// behavior, files report their link target.
    pub fn activate_selected(&mut self) {
        let Some(row) = self.selected_row().cloned() else {
            return;
        };
        if row.is_folder {
            match self.controller.activate(&row.path) {
                ToggleOutcome::Toggled { collapsed } => {
                    self.refresh_rows();
                    info!(path = %row.path, collapsed, "folder toggled");
                }
                ToggleOutcome::Navigate { target } => {
                    self.set_status_message(format!("→ /{target}"), false);
                }
                ToggleOutcome::NotAFolder => {}
            }
        } else {
            self.set_status_message(format!("→ /{}", row.path), false);
        }
    }

    /// Expand the selected folder via its chevron (works regardless of
    /// click behavior).
    pub fn expand_selected(&mut self) {
        let Some(row) = self.selected_row().cloned() else {
            return;
        };
        if row.is_folder && row.collapsed {
            self.controller.set_collapsed(&row.path, false);
            self.refresh_rows();
        }
    }

    /// Collapse the selected folder, or jump to the parent folder when on
    /// a file or an already-collapsed folder.
    pub fn collapse_selected(&mut self) {
        let Some(row) = self.selected_row().cloned() else {
            return;
        };
        if row.is_folder && !row.collapsed {
            self.controller.set_collapsed(&row.path, true);
            self.refresh_rows();
            // Keep the selection on the folder that collapsed.
            if let Some(idx) = self.rows.iter().position(|r| r.path == row.path) {
                self.selected_index = idx;
            }
        } else if row.depth > 0 {
            for j in (0..self.selected_index).rev() {
                if self.rows[j].depth < row.depth {
                    self.selected_index = j;
                    break;
                }
            }
        }
    }

    /// Forget all explicit collapse state.
    pub fn reset_collapse_state(&mut self) {
        self.controller.reset_state();
        self.refresh_rows();
        self.set_status_message("Collapse state reset".to_string(), false);
    }

    /// Toggle the manifest watcher pause state (synced in the main loop).
    pub fn toggle_watcher(&mut self) {
        self.watcher_active = !self.watcher_active;
    }

    /// Reload the manifest from disk and rebuild the display tree.
    pub fn reload_manifest(&mut self) {
        match SiteManifest::load(&self.manifest_path) {
            Ok(manifest) => {
                let tree = FileTrieNode::from_entries(&manifest.entries());
                self.controller.replace_tree(tree);
                self.summary = summarize(self.controller.display_tree());
                self.refresh_rows();
                self.set_status_message("Manifest reloaded".to_string(), false);
                info!(path = %self.manifest_path.display(), "manifest reloaded");
            }
            Err(e) => {
                warn!(error = %e, "manifest reload failed");
                self.set_status_message(format!("⚠ Reload failed: {e}"), true);
            }
        }
    }

    /// React to a terminal resize: remember the width for the breakpoint
    /// and let the nav bar re-partition.
    pub fn handle_resize(&mut self, width: u16) {
        self.terminal_width = width;
        self.nav_list.notify_resize(width);
    }

    /// Rebuild rows after a state or tree change and clamp the selection.
    pub fn refresh_rows(&mut self) {
        self.rows = self.controller.rows();
        if self.selected_index >= self.rows.len() {
            self.selected_index = self.rows.len().saturating_sub(1);
        }
    }

    /// Set a status message with current timestamp.
    pub fn set_status_message(&mut self, msg: String, is_error: bool) {
        self.status_message = Some((msg, is_error, Instant::now()));
    }

    /// Clear the status message once it has been displayed long enough.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, _, ref created)) = self.status_message {
            if created.elapsed().as_secs() > STATUS_TTL_SECS {
                self.status_message = None;
            }
        }
    }
}

fn summarize(tree: &FileTrieNode) -> String {
    let mut pages = 0usize;
    let mut folders = 0usize;
    for node in tree.walk().skip(1) {
        if node.is_folder() {
            folders += 1;
        } else {
            pages += 1;
        }
    }
    format!("{pages} pages · {folders} folders")
}
