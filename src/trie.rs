//! File trie: the hierarchical representation of a site's folder/file
//! structure, built once per render pass from the flat entry list the
//! build pipeline hands over.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ExplorerError, Result};

/// A flat site entry supplied by the build pipeline.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SiteEntry {
    /// Root-relative slug path, segments joined by `/`.
    pub path: String,
    /// Whether this entry is a folder. File paths imply their ancestor
    /// folders, so explicit folder entries are only needed to attach
    /// metadata.
    #[serde(default)]
    pub is_folder: bool,
    /// Display title; defaults to the last path segment.
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl SiteEntry {
    /// Convenience constructor for a file entry.
    pub fn file(path: &str) -> Self {
        Self {
            path: path.to_string(),
            is_folder: false,
            display_name: None,
            tags: Vec::new(),
        }
    }

    /// Convenience constructor for an explicit folder entry.
    pub fn folder(path: &str) -> Self {
        Self {
            path: path.to_string(),
            is_folder: true,
            display_name: None,
            tags: Vec::new(),
        }
    }

    pub fn with_display_name(mut self, name: &str) -> Self {
        self.display_name = Some(name.to_string());
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }
}

/// Node metadata a map step is allowed to rewrite.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeMeta {
    pub tags: Vec<String>,
}

/// A node in the file trie.
///
/// `slug_segment` and `is_folder` are structural and deliberately kept
/// private: transform steps mutate metadata through [`MapTarget`],
/// which does not expose them.
#[derive(Debug, Clone, PartialEq)]
pub struct FileTrieNode {
    slug_segment: String,
    is_folder: bool,
    pub display_name: String,
    pub children: Vec<FileTrieNode>,
    pub meta: NodeMeta,
}

/// The mutable view of a node handed to map rules.
pub struct MapTarget<'a> {
    slug_segment: &'a str,
    is_folder: bool,
    pub display_name: &'a mut String,
    pub meta: &'a mut NodeMeta,
}

impl MapTarget<'_> {
    pub fn slug_segment(&self) -> &str {
        self.slug_segment
    }

    pub fn is_folder(&self) -> bool {
        self.is_folder
    }
}

impl FileTrieNode {
    /// Create the synthetic root node (empty slug segment).
    pub fn root() -> Self {
        Self {
            slug_segment: String::new(),
            is_folder: true,
            display_name: String::new(),
            children: Vec::new(),
            meta: NodeMeta::default(),
        }
    }

    fn folder_node(segment: &str) -> Self {
        Self {
            slug_segment: segment.to_string(),
            is_folder: true,
            display_name: segment.to_string(),
            children: Vec::new(),
            meta: NodeMeta::default(),
        }
    }

    fn file_node(segment: &str, entry: &SiteEntry) -> Self {
        Self {
            slug_segment: segment.to_string(),
            is_folder: false,
            display_name: entry
                .display_name
                .clone()
                .unwrap_or_else(|| segment.to_string()),
            children: Vec::new(),
            meta: NodeMeta {
                tags: entry.tags.clone(),
            },
        }
    }

    /// Build a trie from a flat entry sequence.
    ///
    /// Entries that cannot be inserted (a path segment collides with an
    /// existing file node) are skipped and logged rather than aborting
    /// the whole tree.
    pub fn from_entries(entries: &[SiteEntry]) -> Self {
        let mut root = Self::root();
        for entry in entries {
            if let Err(e) = root.insert(entry) {
                warn!(path = %entry.path, error = %e, "skipping malformed site entry");
            }
        }
        root
    }

    /// Insert a single entry, creating intermediate folders as needed.
    pub fn insert(&mut self, entry: &SiteEntry) -> Result<()> {
        let segments: Vec<&str> = entry.path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            return Err(ExplorerError::MalformedPath {
                path: entry.path.clone(),
                segment: String::new(),
            });
        }

        let mut node = self;
        for segment in &segments[..segments.len() - 1] {
            let pos = node.children.iter().position(|c| c.slug_segment == *segment);
            let pos = match pos {
                Some(i) => {
                    if !node.children[i].is_folder {
                        return Err(ExplorerError::MalformedPath {
                            path: entry.path.clone(),
                            segment: segment.to_string(),
                        });
                    }
                    i
                }
                None => {
                    node.children.push(Self::folder_node(segment));
                    node.children.len() - 1
                }
            };
            node = &mut node.children[pos];
        }

        let last = segments[segments.len() - 1];
        match node.children.iter_mut().find(|c| c.slug_segment == last) {
            Some(existing) => {
                if entry.is_folder && existing.is_folder {
                    // Folder entry for an implied folder: attach metadata.
                    if let Some(name) = &entry.display_name {
                        existing.display_name = name.clone();
                    }
                    if !entry.tags.is_empty() {
                        existing.meta.tags = entry.tags.clone();
                    }
                    Ok(())
                } else {
                    // Duplicate file, or a file entry where a folder lives.
                    Err(ExplorerError::MalformedPath {
                        path: entry.path.clone(),
                        segment: last.to_string(),
                    })
                }
            }
            None => {
                let child = if entry.is_folder {
                    let mut folder = Self::folder_node(last);
                    if let Some(name) = &entry.display_name {
                        folder.display_name = name.clone();
                    }
                    folder.meta.tags = entry.tags.clone();
                    folder
                } else {
                    Self::file_node(last, entry)
                };
                node.children.push(child);
                Ok(())
            }
        }
    }

    pub fn slug_segment(&self) -> &str {
        &self.slug_segment
    }

    pub fn is_folder(&self) -> bool {
        self.is_folder
    }

    /// The mutable view a map rule is allowed to see.
    pub fn map_target(&mut self) -> MapTarget<'_> {
        MapTarget {
            slug_segment: &self.slug_segment,
            is_folder: self.is_folder,
            display_name: &mut self.display_name,
            meta: &mut self.meta,
        }
    }

    /// Look up a node by exact root-relative path. The empty path
    /// resolves to the root itself.
    pub fn get(&self, path: &str) -> Option<&FileTrieNode> {
        let mut node = self;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            node = node.children.iter().find(|c| c.slug_segment == segment)?;
        }
        Some(node)
    }

    /// Depth-first pre-order enumeration of the whole trie, root first.
    pub fn walk(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }

    /// Visit every node pre-order together with its root-relative path.
    pub fn walk_paths(&self, f: &mut dyn FnMut(&str, &FileTrieNode)) {
        fn go(node: &FileTrieNode, path: &str, f: &mut dyn FnMut(&str, &FileTrieNode)) {
            f(path, node);
            for child in &node.children {
                let child_path = if path.is_empty() {
                    child.slug_segment.clone()
                } else {
                    format!("{}/{}", path, child.slug_segment)
                };
                go(child, &child_path, f);
            }
        }
        go(self, "", f);
    }
}

/// Pre-order iterator over trie nodes.
pub struct PreOrder<'a> {
    stack: Vec<&'a FileTrieNode>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a FileTrieNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        for child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}
