//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--config`, `--no-watcher`, etc.)
//! 2. `$SITE_EXPLORER_CONFIG` environment variable (path to config file)
//! 3. Project-local `.site-explorer.toml` in the current working directory
//! 4. Global `~/.config/site-explorer/config.toml`
//! 5. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ExplorerError, Result};
use crate::explorer::{ClickBehavior, ExplorerOptions, FolderState};
use crate::pipeline::{FilterRule, MapRule, OpKind, SortRule, TransformSpec};
use crate::state::default_state_path;

// ── Section configs ──────────────────────────────────────────────────────────

/// Explorer instance settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ExplorerSection {
    /// Heading shown above the tree.
    pub title: Option<String>,
    /// Initial folder state: "collapsed" or "open".
    pub default_state: Option<String>,
    /// What clicking a folder label does: "collapse" or "link".
    pub click_behavior: Option<String>,
    /// Persist collapse state across sessions.
    pub use_saved_state: Option<bool>,
    /// Whether folders have index pages to navigate to.
    pub folder_links: Option<bool>,
    /// Component names shown in the mobile region.
    pub mobile_components: Option<Vec<String>>,
}

/// Transform pipeline settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TransformSection {
    /// Operation order, e.g. ["filter", "map", "sort"].
    pub order: Option<Vec<String>>,
    /// Slug segments dropped by the filter step.
    pub exclude_segments: Option<Vec<String>>,
    /// When set, the filter keeps only nodes carrying one of these tags.
    pub require_tags: Option<Vec<String>>,
    /// Strip file extensions from display names.
    pub strip_extensions: Option<bool>,
    /// Sort rule: "folders-first" or "alphabetical".
    pub sort: Option<String>,
}

/// Collapse-state persistence settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct StateSection {
    /// Explicit state file path; defaults to the per-site data dir file.
    pub path: Option<String>,
    /// Site name used to derive the default state file path.
    pub site_name: Option<String>,
}

/// One navigation bar entry.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct NavLinkConfig {
    pub text: String,
    pub link: String,
    #[serde(default)]
    pub external: bool,
}

/// Navigation bar settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct NavSection {
    pub links: Option<Vec<NavLinkConfig>>,
    /// Cells reserved for the overflow indicator.
    pub reserved_width: Option<u16>,
}

/// Manifest watcher settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct WatcherSection {
    /// Enable manifest watching for auto-reload.
    pub enabled: Option<bool>,
    /// Debounce interval in milliseconds.
    pub debounce_ms: Option<u64>,
}

/// Theme configuration section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeSection {
    /// Color scheme: "dark" or "light".
    pub scheme: Option<String>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub explorer: ExplorerSection,
    pub transform: TransformSection,
    pub state: StateSection,
    pub nav: NavSection,
    pub watcher: WatcherSection,
    pub theme: ThemeSection,
}

// ── Default constants ────────────────────────────────────────────────────────

/// Default debounce interval in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
/// Default cells reserved for the nav overflow indicator.
pub const DEFAULT_NAV_RESERVED_WIDTH: u16 = 10;
/// Default site name for the state file.
pub const DEFAULT_SITE_NAME: &str = "site";

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path — that is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // 1. $SITE_EXPLORER_CONFIG environment variable
    if let Ok(env_path) = std::env::var("SITE_EXPLORER_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    // 2. Project-local `.site-explorer.toml` in CWD
    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".site-explorer.toml"));
    }

    // 3. Global `~/.config/site-explorer/config.toml`
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("site-explorer").join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning printed to stderr).
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return None,
    };
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            eprintln!(
                "Warning: failed to parse config file {}: {}",
                path.display(),
                e
            );
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self` — `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            explorer: ExplorerSection {
                title: other.explorer.title.clone().or(self.explorer.title),
                default_state: other
                    .explorer
                    .default_state
                    .clone()
                    .or(self.explorer.default_state),
                click_behavior: other
                    .explorer
                    .click_behavior
                    .clone()
                    .or(self.explorer.click_behavior),
                use_saved_state: other
                    .explorer
                    .use_saved_state
                    .or(self.explorer.use_saved_state),
                folder_links: other.explorer.folder_links.or(self.explorer.folder_links),
                mobile_components: other
                    .explorer
                    .mobile_components
                    .clone()
                    .or(self.explorer.mobile_components),
            },
            transform: TransformSection {
                order: other.transform.order.clone().or(self.transform.order),
                exclude_segments: other
                    .transform
                    .exclude_segments
                    .clone()
                    .or(self.transform.exclude_segments),
                require_tags: other
                    .transform
                    .require_tags
                    .clone()
                    .or(self.transform.require_tags),
                strip_extensions: other
                    .transform
                    .strip_extensions
                    .or(self.transform.strip_extensions),
                sort: other.transform.sort.clone().or(self.transform.sort),
            },
            state: StateSection {
                path: other.state.path.clone().or(self.state.path),
                site_name: other.state.site_name.clone().or(self.state.site_name),
            },
            nav: NavSection {
                links: other.nav.links.clone().or(self.nav.links),
                reserved_width: other.nav.reserved_width.or(self.nav.reserved_width),
            },
            watcher: WatcherSection {
                enabled: other.watcher.enabled.or(self.watcher.enabled),
                debounce_ms: other.watcher.debounce_ms.or(self.watcher.debounce_ms),
            },
            theme: ThemeSection {
                scheme: other.theme.scheme.clone().or(self.theme.scheme),
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        // Start with built-in defaults (all None — the struct Default).
        let mut config = AppConfig::default();

        // Load from candidate files (lowest priority first so higher overwrites).
        let paths = candidate_paths();
        // Walk in reverse so that highest-priority (env var) overwrites lower.
        for path in paths.iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        // Explicit --config file has higher priority than candidates.
        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        // CLI flag overrides are highest priority.
        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    /// Build the explorer options, validating enum-like string fields.
    pub fn explorer_options(&self) -> Result<ExplorerOptions> {
        let folder_default_state = match self.explorer.default_state.as_deref() {
            None | Some("collapsed") => FolderState::Collapsed,
            Some("open") => FolderState::Open,
            Some(other) => {
                return Err(ExplorerError::Configuration(format!(
                    "unknown default_state `{other}` (expected `collapsed` or `open`)"
                )))
            }
        };
        let folder_click_behavior = match self.explorer.click_behavior.as_deref() {
            None | Some("link") => ClickBehavior::Link,
            Some("collapse") => ClickBehavior::Collapse,
            Some(other) => {
                return Err(ExplorerError::Configuration(format!(
                    "unknown click_behavior `{other}` (expected `collapse` or `link`)"
                )))
            }
        };
        Ok(ExplorerOptions {
            title: self.explorer.title.clone(),
            folder_default_state,
            folder_click_behavior,
            use_saved_state: self.explorer.use_saved_state.unwrap_or(true),
            folder_links: self.explorer.folder_links.unwrap_or(true),
            mobile_components: self.explorer.mobile_components.clone().unwrap_or_default(),
        })
    }

    /// Build the transform spec, validating the operation order.
    pub fn transform_spec(&self) -> Result<TransformSpec> {
        let defaults = TransformSpec::default();
        let order = match &self.transform.order {
            Some(names) => OpKind::parse_order(names)?,
            None => defaults.order,
        };
        let filter = if let Some(tags) = &self.transform.require_tags {
            FilterRule::RequireTags(tags.clone())
        } else if let Some(segments) = &self.transform.exclude_segments {
            FilterRule::ExcludeSegments(segments.clone())
        } else {
            defaults.filter
        };
        let map = if self.transform.strip_extensions.unwrap_or(false) {
            MapRule::StripExtension
        } else {
            MapRule::Identity
        };
        let sort = match self.transform.sort.as_deref() {
            None | Some("folders-first") => SortRule::FoldersFirstAlphabetical,
            Some("alphabetical") => SortRule::Alphabetical,
            Some(other) => {
                return Err(ExplorerError::Configuration(format!(
                    "unknown sort rule `{other}` (expected `folders-first` or `alphabetical`)"
                )))
            }
        };
        Ok(TransformSpec {
            order,
            filter,
            map,
            sort,
        })
    }

    /// Resolved collapse-state file path.
    pub fn state_path(&self) -> PathBuf {
        match &self.state.path {
            Some(path) => PathBuf::from(path),
            None => default_state_path(self.site_name()),
        }
    }

    /// Site name used to derive the default state file path.
    pub fn site_name(&self) -> &str {
        self.state.site_name.as_deref().unwrap_or(DEFAULT_SITE_NAME)
    }

    /// Navigation bar entries.
    pub fn nav_links(&self) -> Vec<NavLinkConfig> {
        self.nav.links.clone().unwrap_or_default()
    }

    /// Cells reserved for the nav overflow indicator.
    pub fn nav_reserved_width(&self) -> u16 {
        self.nav.reserved_width.unwrap_or(DEFAULT_NAV_RESERVED_WIDTH)
    }

    /// Whether the manifest watcher is enabled.
    pub fn watcher_enabled(&self) -> bool {
        self.watcher.enabled.unwrap_or(true)
    }

    /// Watcher debounce interval in milliseconds.
    pub fn debounce_ms(&self) -> u64 {
        self.watcher.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS)
    }

    /// Theme scheme: "dark" or "light".
    pub fn theme_scheme(&self) -> &str {
        self.theme.scheme.as_deref().unwrap_or("dark")
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
