//! Site manifest loading: the JSON hand-off format the build pipeline
//! writes and this crate consumes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ExplorerError, Result};
use crate::trie::SiteEntry;

/// A file record from the manifest.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FileRecord {
    /// Root-relative slug path.
    pub path: String,
    /// Display title.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A folder metadata record from the manifest.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DirectoryRecord {
    /// Root-relative slug path.
    pub path: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Root manifest structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SiteManifest {
    #[serde(default)]
    pub files: Vec<FileRecord>,
    #[serde(default)]
    pub directories: Vec<DirectoryRecord>,
}

impl SiteManifest {
    /// Load and parse a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse manifest JSON.
    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| ExplorerError::Manifest(e.to_string()))
    }

    /// Flatten into the entry list the trie builder consumes.
    ///
    /// Directory records come first so their metadata is in place before
    /// file paths imply the same folders.
    pub fn entries(&self) -> Vec<SiteEntry> {
        let mut entries = Vec::with_capacity(self.directories.len() + self.files.len());
        for dir in &self.directories {
            entries.push(SiteEntry {
                path: dir.path.clone(),
                is_folder: true,
                display_name: dir.title.clone(),
                tags: dir.tags.clone(),
            });
        }
        for file in &self.files {
            entries.push(SiteEntry {
                path: file.path.clone(),
                is_folder: false,
                display_name: file.title.clone(),
                tags: file.tags.clone(),
            });
        }
        entries
    }
}
