//! Explorer controller: owns one explorer instance's options, transform
//! pipeline, display tree and collapse state, and answers interaction.

use crate::context::RenderContext;
use crate::error::{ExplorerError, Result};
use crate::pipeline::{TransformPipeline, TransformSpec};
use crate::state::CollapseStateStore;
use crate::trie::FileTrieNode;

/// Initial collapse state applied to folders the user never toggled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FolderState {
    #[default]
    Collapsed,
    Open,
}

impl FolderState {
    pub fn as_str(&self) -> &'static str {
        match self {
            FolderState::Collapsed => "collapsed",
            FolderState::Open => "open",
        }
    }

    pub fn is_collapsed(&self) -> bool {
        matches!(self, FolderState::Collapsed)
    }
}

/// What clicking a folder label does. The chevron always toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClickBehavior {
    Collapse,
    #[default]
    Link,
}

impl ClickBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClickBehavior::Collapse => "collapse",
            ClickBehavior::Link => "link",
        }
    }
}

/// Per-instance explorer configuration.
#[derive(Debug, Clone)]
pub struct ExplorerOptions {
    /// Heading; `None` falls back to the stock title.
    pub title: Option<String>,
    pub folder_default_state: FolderState,
    pub folder_click_behavior: ClickBehavior,
    /// Persist collapse state across sessions.
    pub use_saved_state: bool,
    /// Whether folders have index pages to navigate to.
    pub folder_links: bool,
    /// Names of components shown in the mobile region.
    pub mobile_components: Vec<String>,
}

impl Default for ExplorerOptions {
    fn default() -> Self {
        Self {
            title: None,
            folder_default_state: FolderState::default(),
            folder_click_behavior: ClickBehavior::default(),
            use_saved_state: true,
            folder_links: true,
            mobile_components: Vec::new(),
        }
    }
}

/// Result of activating a folder row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The folder's collapse state changed.
    Toggled { collapsed: bool },
    /// Click behavior is `link`: navigate instead of toggling.
    Navigate { target: String },
    /// The path is a file or does not exist in the display tree.
    NotAFolder,
}

/// One visible line of the flattened display tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerRow {
    pub path: String,
    pub display_name: String,
    pub is_folder: bool,
    pub depth: usize,
    /// Meaningful for folder rows only.
    pub collapsed: bool,
    pub is_last_sibling: bool,
}

/// Controller for a single explorer instance.
pub struct ExplorerController {
    id: String,
    options: ExplorerOptions,
    pipeline: TransformPipeline,
    display_tree: FileTrieNode,
    state: CollapseStateStore,
}

impl ExplorerController {
    /// Build a controller, applying the transform spec to the raw tree.
    ///
    /// Fails when the options are inconsistent: `link` click behavior
    /// requires folders to have link targets.
    pub fn new(
        ctx: &mut RenderContext,
        options: ExplorerOptions,
        spec: TransformSpec,
        tree: FileTrieNode,
        state: CollapseStateStore,
    ) -> Result<Self> {
        if options.folder_click_behavior == ClickBehavior::Link && !options.folder_links {
            return Err(ExplorerError::Configuration(
                "folder click behavior is `link` but folders have no link targets".to_string(),
            ));
        }
        let pipeline = TransformPipeline::new(spec);
        let display_tree = pipeline.apply(&tree);
        Ok(Self {
            id: ctx.next_instance_id(),
            options,
            pipeline,
            display_tree,
            state,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn options(&self) -> &ExplorerOptions {
        &self.options
    }

    pub fn title(&self) -> &str {
        self.options.title.as_deref().unwrap_or("Explorer")
    }

    pub fn spec(&self) -> &TransformSpec {
        self.pipeline.spec()
    }

    pub fn display_tree(&self) -> &FileTrieNode {
        &self.display_tree
    }

    pub fn state(&self) -> &CollapseStateStore {
        &self.state
    }

    /// Swap in a freshly built raw tree (manifest reload) and re-run the
    /// pipeline. Collapse state is keyed by path and carries over.
    pub fn replace_tree(&mut self, tree: FileTrieNode) {
        self.display_tree = self.pipeline.apply(&tree);
    }

    /// Flatten the display tree into rows, omitting the subtrees of
    /// collapsed folders.
    pub fn rows(&self) -> Vec<ExplorerRow> {
        let mut rows = Vec::new();
        self.flatten(&self.display_tree, "", 0, &mut rows);
        rows
    }

    fn flatten(&self, node: &FileTrieNode, path: &str, depth: usize, rows: &mut Vec<ExplorerRow>) {
        let count = node.children.len();
        for (i, child) in node.children.iter().enumerate() {
            let child_path = if path.is_empty() {
                child.slug_segment().to_string()
            } else {
                format!("{}/{}", path, child.slug_segment())
            };
            let collapsed = child.is_folder() && self.state.is_collapsed(&child_path);
            rows.push(ExplorerRow {
                path: child_path.clone(),
                display_name: child.display_name.clone(),
                is_folder: child.is_folder(),
                depth,
                collapsed,
                is_last_sibling: i + 1 == count,
            });
            if child.is_folder() && !collapsed {
                self.flatten(child, &child_path, depth + 1, rows);
            }
        }
    }

    /// Activate a folder row, honoring the configured click behavior.
    pub fn activate(&mut self, path: &str) -> ToggleOutcome {
        if !self.is_folder_path(path) {
            return ToggleOutcome::NotAFolder;
        }
        match self.options.folder_click_behavior {
            ClickBehavior::Collapse => ToggleOutcome::Toggled {
                collapsed: self.state.toggle(path),
            },
            ClickBehavior::Link => ToggleOutcome::Navigate {
                target: path.to_string(),
            },
        }
    }

    /// Toggle via the chevron, which works in both click behaviors.
    pub fn toggle_chevron(&mut self, path: &str) -> ToggleOutcome {
        if !self.is_folder_path(path) {
            return ToggleOutcome::NotAFolder;
        }
        ToggleOutcome::Toggled {
            collapsed: self.state.toggle(path),
        }
    }

    /// Set a folder's collapse state explicitly.
    pub fn set_collapsed(&mut self, path: &str, collapsed: bool) -> ToggleOutcome {
        if !self.is_folder_path(path) {
            return ToggleOutcome::NotAFolder;
        }
        self.state.set_collapsed(path, collapsed);
        ToggleOutcome::Toggled { collapsed }
    }

    /// Forget all explicit collapse state.
    pub fn reset_state(&mut self) {
        self.state.reset();
    }

    fn is_folder_path(&self, path: &str) -> bool {
        !path.is_empty()
            && self
                .display_tree
                .get(path)
                .map(FileTrieNode::is_folder)
                .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::SiteEntry;

    fn sample_tree() -> FileTrieNode {
        FileTrieNode::from_entries(&[
            SiteEntry::file("a/x.md"),
            SiteEntry::file("a/y.md"),
            SiteEntry::file("b/z.md"),
            SiteEntry::file("readme.md"),
        ])
    }

    fn controller(options: ExplorerOptions) -> ExplorerController {
        let mut ctx = RenderContext::new();
        ExplorerController::new(
            &mut ctx,
            options,
            TransformSpec::default(),
            sample_tree(),
            CollapseStateStore::in_memory(true),
        )
        .unwrap()
    }

    fn collapse_options() -> ExplorerOptions {
        ExplorerOptions {
            folder_click_behavior: ClickBehavior::Collapse,
            ..ExplorerOptions::default()
        }
    }

    #[test]
    fn link_behavior_without_folder_links_is_rejected() {
        let mut ctx = RenderContext::new();
        let options = ExplorerOptions {
            folder_click_behavior: ClickBehavior::Link,
            folder_links: false,
            ..ExplorerOptions::default()
        };
        let result = ExplorerController::new(
            &mut ctx,
            options,
            TransformSpec::default(),
            sample_tree(),
            CollapseStateStore::in_memory(true),
        );
        assert!(matches!(result, Err(ExplorerError::Configuration(_))));
    }

    #[test]
    fn collapsed_default_hides_folder_contents() {
        let c = controller(collapse_options());
        let paths: Vec<String> = c.rows().into_iter().map(|r| r.path).collect();
        // Folders first per default sort, files of collapsed folders hidden.
        assert_eq!(paths, vec!["a", "b", "readme.md"]);
    }

    #[test]
    fn activating_a_folder_reveals_its_children_only() {
        let mut c = controller(collapse_options());
        let outcome = c.activate("a");
        assert_eq!(outcome, ToggleOutcome::Toggled { collapsed: false });

        let paths: Vec<String> = c.rows().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["a", "a/x.md", "a/y.md", "b", "readme.md"]);
        // Folder b is untouched.
        assert!(!paths.contains(&"b/z.md".to_string()));
    }

    #[test]
    fn activating_again_hides_children() {
        let mut c = controller(collapse_options());
        c.activate("a");
        c.activate("a");
        let paths: Vec<String> = c.rows().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["a", "b", "readme.md"]);
    }

    #[test]
    fn rows_carry_depth_and_sibling_position() {
        let mut c = controller(collapse_options());
        c.activate("a");
        let rows = c.rows();
        let a = rows.iter().find(|r| r.path == "a").unwrap();
        assert_eq!(a.depth, 0);
        assert!(a.is_folder);
        assert!(!a.collapsed);
        let y = rows.iter().find(|r| r.path == "a/y.md").unwrap();
        assert_eq!(y.depth, 1);
        assert!(y.is_last_sibling);
        let x = rows.iter().find(|r| r.path == "a/x.md").unwrap();
        assert!(!x.is_last_sibling);
        let readme = rows.iter().find(|r| r.path == "readme.md").unwrap();
        assert!(readme.is_last_sibling);
    }

    #[test]
    fn open_default_shows_everything() {
        let mut ctx = RenderContext::new();
        let c = ExplorerController::new(
            &mut ctx,
            collapse_options(),
            TransformSpec::default(),
            sample_tree(),
            CollapseStateStore::in_memory(false),
        )
        .unwrap();
        assert_eq!(c.rows().len(), 6);
    }

    #[test]
    fn link_behavior_navigates_without_toggling() {
        let mut c = controller(ExplorerOptions::default());
        let outcome = c.activate("a");
        assert_eq!(
            outcome,
            ToggleOutcome::Navigate {
                target: "a".to_string()
            }
        );
        // Collapse state did not change.
        assert!(c.rows().iter().all(|r| r.path != "a/x.md"));
    }

    #[test]
    fn chevron_toggles_even_with_link_behavior() {
        let mut c = controller(ExplorerOptions::default());
        let outcome = c.toggle_chevron("a");
        assert_eq!(outcome, ToggleOutcome::Toggled { collapsed: false });
        assert!(c.rows().iter().any(|r| r.path == "a/x.md"));
    }

    #[test]
    fn activating_a_file_or_missing_path_is_rejected() {
        let mut c = controller(collapse_options());
        assert_eq!(c.activate("readme.md"), ToggleOutcome::NotAFolder);
        assert_eq!(c.activate("nope"), ToggleOutcome::NotAFolder);
        assert_eq!(c.activate(""), ToggleOutcome::NotAFolder);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut c = controller(collapse_options());
        c.activate("a");
        c.activate("b");
        c.reset_state();
        let paths: Vec<String> = c.rows().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["a", "b", "readme.md"]);
    }

    #[test]
    fn replace_tree_keeps_collapse_state_by_path() {
        let mut c = controller(collapse_options());
        c.activate("a");
        c.replace_tree(FileTrieNode::from_entries(&[
            SiteEntry::file("a/new.md"),
            SiteEntry::file("b/z.md"),
        ]));
        let paths: Vec<String> = c.rows().into_iter().map(|r| r.path).collect();
        // Folder a stays open across the reload.
        assert_eq!(paths, vec!["a", "a/new.md", "b"]);
    }

    #[test]
    fn saved_state_carries_into_a_fresh_controller() {
        use crate::state::MemoryBackend;
        use std::sync::Arc;

        let backend = Arc::new(MemoryBackend::default());
        let mut ctx = RenderContext::new();
        let mut first = ExplorerController::new(
            &mut ctx,
            collapse_options(),
            TransformSpec::default(),
            sample_tree(),
            CollapseStateStore::new(Box::new(backend.clone()), false, true),
        )
        .unwrap();
        // Open default; the user collapses folder a.
        first.activate("a");
        assert!(first.rows().iter().all(|r| r.path != "a/x.md"));
        drop(first);

        let second = ExplorerController::new(
            &mut ctx,
            collapse_options(),
            TransformSpec::default(),
            sample_tree(),
            CollapseStateStore::new(Box::new(backend), false, true),
        )
        .unwrap();
        // Folder a starts collapsed on the next render pass.
        assert!(second.rows().iter().all(|r| r.path != "a/x.md"));
        assert!(second.rows().iter().any(|r| r.path == "b/z.md"));
    }

    #[test]
    fn controllers_in_one_pass_get_distinct_ids() {
        let mut ctx = RenderContext::new();
        let make = |ctx: &mut RenderContext| {
            ExplorerController::new(
                ctx,
                collapse_options(),
                TransformSpec::default(),
                sample_tree(),
                CollapseStateStore::in_memory(true),
            )
            .unwrap()
        };
        let first = make(&mut ctx);
        let second = make(&mut ctx);
        assert_eq!(first.id(), "explorer-0");
        assert_eq!(second.id(), "explorer-1");
    }

    #[test]
    fn title_falls_back_to_stock_label() {
        let c = controller(collapse_options());
        assert_eq!(c.title(), "Explorer");
        let named = controller(ExplorerOptions {
            title: Some("All pages".to_string()),
            folder_click_behavior: ClickBehavior::Collapse,
            ..ExplorerOptions::default()
        });
        assert_eq!(named.title(), "All pages");
    }
}
