mod app;
mod components;
mod config;
mod context;
mod error;
mod event;
mod explorer;
mod handler;
mod manifest;
mod overflow;
mod pipeline;
mod render;
mod state;
mod theme;
mod trie;
mod tui;
mod ui;
mod watch;

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::config::{AppConfig, ThemeSection};
use crate::context::{PageContext, RenderContext};
use crate::error::ExplorerError;
use crate::event::{Event, EventHandler};
use crate::explorer::ExplorerController;
use crate::manifest::SiteManifest;
use crate::state::{CollapseStateStore, JsonFileBackend, StateBackend};
use crate::trie::FileTrieNode;
use crate::tui::{install_panic_hook, Tui};
use crate::watch::ManifestWatcher;

/// Explore a static site's page tree in the terminal.
#[derive(Parser, Debug)]
#[command(name = "site-explorer", version, about)]
struct Cli {
    /// Path to the site manifest JSON produced by the build pipeline
    manifest: PathBuf,

    /// Config file (overrides the default lookup locations)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Color scheme override: "dark" or "light"
    #[arg(long)]
    theme: Option<String>,

    /// Print the rendered markup and script payload instead of opening the TUI
    #[arg(long)]
    emit: bool,

    /// Disable the manifest watcher (auto-reload)
    #[arg(long)]
    no_watcher: bool,

    /// Forget all persisted collapse state before starting
    #[arg(long)]
    reset_state: bool,
}

/// In emit mode logs go to stderr; in TUI mode they go to a file so the
/// alternate screen stays clean.
fn init_tracing(emit: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if emit {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return;
    }
    let log_path = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("site-explorer")
        .join("site-explorer.log");
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Arc::new(file))
            .with_ansi(false)
            .init();
    }
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.emit);

    let cli_overrides = cli.theme.as_ref().map(|scheme| AppConfig {
        theme: ThemeSection {
            scheme: Some(scheme.clone()),
        },
        ..AppConfig::default()
    });
    let config = AppConfig::load(cli.config.as_deref(), cli_overrides.as_ref());

    let options = config.explorer_options()?;
    let spec = config.transform_spec()?;

    let manifest = SiteManifest::load(&cli.manifest)?;
    let tree = FileTrieNode::from_entries(&manifest.entries());

    let backend = JsonFileBackend::new(config.state_path());
    if cli.reset_state {
        backend
            .clear()
            .map_err(|e| ExplorerError::Storage(format!("failed to reset state: {e}")))?;
    }
    let state = CollapseStateStore::new(
        Box::new(backend),
        options.folder_default_state.is_collapsed(),
        options.use_saved_state,
    );

    let mut render_ctx = RenderContext::new();
    let controller = ExplorerController::new(&mut render_ctx, options, spec, tree, state)?;

    if cli.emit {
        let page = PageContext::new("index", config.site_name());
        let rendered = render::render(&controller, &page);
        println!("{}", rendered.html);
        println!(
            "{}",
            serde_json::to_string_pretty(&rendered.script_payload)
                .map_err(|e| ExplorerError::Manifest(e.to_string()))?
        );
        return Ok(());
    }

    install_panic_hook();

    let mut tui = Tui::new()?;
    let mut app = App::new(
        cli.manifest.clone(),
        controller,
        config.nav_links(),
        config.nav_reserved_width(),
    );
    app.handle_resize(tui.size()?.0);

    let mut events = EventHandler::new(Duration::from_millis(16));
    let event_tx = events.sender();

    let _watcher = if cli.no_watcher || !config.watcher_enabled() {
        app.watcher_active = false;
        None
    } else {
        match ManifestWatcher::new(
            &cli.manifest,
            Duration::from_millis(config.debounce_ms()),
            event_tx.clone(),
        ) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                app.watcher_active = false;
                app.set_status_message(format!("⚠ Watcher unavailable: {e}"), true);
                None
            }
        }
    };

    let theme = theme::resolve_theme(&config.theme);

    loop {
        app.clear_expired_status();

        tui.terminal_mut().draw(|frame| {
            ui::render(&mut app, frame, &theme);
        })?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key),
            Event::Mouse(mouse) => handler::handle_mouse_event(&mut app, mouse),
            Event::Tick => {}
            Event::Resize(width, _) => app.handle_resize(width),
            Event::ManifestChanged => app.reload_manifest(),
        }

        // Sync watcher pause/resume state
        if let Some(ref watcher) = _watcher {
            if app.watcher_active && !watcher.is_active() {
                watcher.resume();
            } else if !app.watcher_active && watcher.is_active() {
                watcher.pause();
            }
        }

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    Ok(())
}
