//! Manifest watcher: debounced change notifications for the manifest
//! file, driving automatic reloads in the preview.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use tokio::sync::mpsc;
use tracing::debug;

use crate::event::Event;

/// Watches the directory containing the manifest and emits
/// [`Event::ManifestChanged`] when the manifest file itself changes.
///
/// The parent directory is watched (non-recursively) rather than the
/// file, because build pipelines typically replace the manifest instead
/// of rewriting it in place.
pub struct ManifestWatcher {
    /// Whether the watcher is currently forwarding events.
    active: Arc<AtomicBool>,
    /// Handle to the debouncer (dropped to stop watching).
    _debouncer: notify_debouncer_mini::Debouncer<notify::RecommendedWatcher>,
}

impl ManifestWatcher {
    /// Create a watcher for `manifest`, debounced by `debounce_duration`.
    pub fn new(
        manifest: &Path,
        debounce_duration: Duration,
        event_tx: mpsc::UnboundedSender<Event>,
    ) -> notify::Result<Self> {
        let active = Arc::new(AtomicBool::new(true));
        let active_clone = active.clone();
        let manifest_path: PathBuf = manifest
            .canonicalize()
            .unwrap_or_else(|_| manifest.to_path_buf());
        let file_name = manifest_path.file_name().map(|n| n.to_os_string());

        let mut debouncer = new_debouncer(
            debounce_duration,
            move |result: Result<Vec<notify_debouncer_mini::DebouncedEvent>, notify::Error>| {
                // If paused, silently drop events
                if !active_clone.load(Ordering::Relaxed) {
                    return;
                }

                match result {
                    Ok(events) => {
                        let hit = events
                            .iter()
                            .filter(|e| e.kind == DebouncedEventKind::Any)
                            .any(|e| is_manifest_event(&e.path, file_name.as_deref()));
                        if hit {
                            debug!("manifest change detected");
                            let _ = event_tx.send(Event::ManifestChanged);
                        }
                    }
                    Err(_errors) => {
                        // Watcher errors are non-fatal; silently ignore
                    }
                }
            },
        )?;

        let watch_root = manifest_path.parent().unwrap_or_else(|| Path::new("."));
        debouncer
            .watcher()
            .watch(watch_root, notify::RecursiveMode::NonRecursive)?;

        Ok(Self {
            active,
            _debouncer: debouncer,
        })
    }

    /// Pause event forwarding (watcher stays alive to avoid re-creating
    /// inotify watches).
    pub fn pause(&self) {
        self.active.store(false, Ordering::Relaxed);
    }

    /// Resume event forwarding.
    pub fn resume(&self) {
        self.active.store(true, Ordering::Relaxed);
    }

    /// Check if the watcher is currently active (forwarding events).
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }
}

/// Whether a changed path refers to the watched manifest file.
fn is_manifest_event(path: &Path, manifest_file_name: Option<&OsStr>) -> bool {
    match manifest_file_name {
        Some(name) => path.file_name() == Some(name),
        None => false,
    }
}
