//! Persisted per-folder collapse state.
//!
//! The store keeps a session map of explicitly toggled folders layered
//! over a configured default. A pluggable backend persists that map
//! across runs; backend failures degrade the store to session-only
//! operation instead of breaking the explorer.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ExplorerError, Result};

/// Storage abstraction for the collapse map.
pub trait StateBackend {
    fn load(&self) -> Result<HashMap<String, bool>>;
    fn persist(&self, folders: &HashMap<String, bool>) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

impl<B: StateBackend + ?Sized> StateBackend for Arc<B> {
    fn load(&self) -> Result<HashMap<String, bool>> {
        (**self).load()
    }

    fn persist(&self, folders: &HashMap<String, bool>) -> Result<()> {
        (**self).persist(folders)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}

/// In-process backend. Survives store re-creation within one run, which
/// is all the preview needs when persistence is disabled.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    slots: Mutex<HashMap<String, bool>>,
}

impl StateBackend for MemoryBackend {
    fn load(&self) -> Result<HashMap<String, bool>> {
        Ok(self.slots.lock().map_err(poisoned)?.clone())
    }

    fn persist(&self, folders: &HashMap<String, bool>) -> Result<()> {
        *self.slots.lock().map_err(poisoned)? = folders.clone();
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.slots.lock().map_err(poisoned)?.clear();
        Ok(())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> ExplorerError {
    ExplorerError::Storage("state backend lock poisoned".to_string())
}

/// Versioned on-disk representation.
#[derive(Debug, Default, Deserialize, Serialize)]
struct StateFile {
    version: u32,
    folders: HashMap<String, bool>,
}

const STATE_FILE_VERSION: u32 = 1;

/// JSON file backend, one file per site.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateBackend for JsonFileBackend {
    fn load(&self) -> Result<HashMap<String, bool>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let file: StateFile = serde_json::from_str(&content)
            .map_err(|e| ExplorerError::Storage(format!("invalid state file: {e}")))?;
        if file.version != STATE_FILE_VERSION {
            warn!(
                version = file.version,
                "ignoring state file with unknown version"
            );
            return Ok(HashMap::new());
        }
        Ok(file.folders)
    }

    fn persist(&self, folders: &HashMap<String, bool>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = StateFile {
            version: STATE_FILE_VERSION,
            folders: folders.clone(),
        };
        let content = serde_json::to_string_pretty(&file)
            .map_err(|e| ExplorerError::Storage(e.to_string()))?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// Default location for a site's state file.
pub fn default_state_path(site_name: &str) -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("site-explorer")
        .join(format!("{site_name}.state.json"))
}

/// Collapse state for every folder the user has explicitly toggled,
/// layered over the configured default.
pub struct CollapseStateStore {
    backend: Box<dyn StateBackend + Send>,
    session: HashMap<String, bool>,
    default_collapsed: bool,
    persistence: bool,
    degraded: bool,
}

impl CollapseStateStore {
    /// Build a store over a backend. With persistence enabled the backend
    /// is read immediately; a failed read logs a warning and degrades the
    /// store to session-only rather than failing construction.
    pub fn new(
        backend: Box<dyn StateBackend + Send>,
        default_collapsed: bool,
        persistence: bool,
    ) -> Self {
        let mut degraded = false;
        let session = if persistence {
            match backend.load() {
                Ok(folders) => folders,
                Err(e) => {
                    warn!(error = %e, "collapse state unreadable, continuing session-only");
                    degraded = true;
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };
        Self {
            backend,
            session,
            default_collapsed,
            persistence,
            degraded,
        }
    }

    /// Session-only store with no persistence.
    pub fn in_memory(default_collapsed: bool) -> Self {
        Self::new(Box::new(MemoryBackend::default()), default_collapsed, false)
    }

    /// Collapse state for a folder path: the stored value if the folder
    /// was ever toggled, the configured default otherwise.
    pub fn is_collapsed(&self, path: &str) -> bool {
        self.session
            .get(path)
            .copied()
            .unwrap_or(self.default_collapsed)
    }

    /// Record an explicit collapse state for a folder.
    pub fn set_collapsed(&mut self, path: &str, collapsed: bool) {
        self.session.insert(path.to_string(), collapsed);
        self.flush();
    }

    /// Flip a folder's state, returning the new value.
    pub fn toggle(&mut self, path: &str) -> bool {
        let next = !self.is_collapsed(path);
        self.set_collapsed(path, next);
        next
    }

    /// Forget all explicit state, in session and in the backend. Every
    /// folder reverts to the configured default.
    pub fn reset(&mut self) {
        self.session.clear();
        if self.persistence && !self.degraded {
            if let Err(e) = self.backend.clear() {
                warn!(error = %e, "failed to clear persisted collapse state");
                self.degraded = true;
            }
        }
    }

    /// Whether a backend failure has dropped the store to session-only.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn default_collapsed(&self) -> bool {
        self.default_collapsed
    }

    fn flush(&mut self) {
        if !self.persistence || self.degraded {
            return;
        }
        if let Err(e) = self.backend.persist(&self.session) {
            warn!(error = %e, "failed to persist collapse state, continuing session-only");
            self.degraded = true;
        }
    }
}
