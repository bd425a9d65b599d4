//! Wires the three contexts together for one highlight-and-translate round trip.
//!
//! 1. Loads the configuration and opens the local store
//! 2. Loads the page, from disk or over HTTP
//! 3. Starts the page extractor for a single tab and the dispatcher
//! 4. Opens the panel, clicks the toolbar button and drives messages until the panel settles
//!
use crate::api_client::{http_client, HttpLyricsApi, LyricsApi};
use crate::configuration::{self, ConfigFolder};
use crate::dispatcher::{Dispatcher, LocalHost};
use crate::extractor::{is_lyrics_site, ExtractorChain, Page, PageExtractor};
use crate::foundation::database::{self, set_preferred_language};
use crate::messaging::{Envelope, Message, TabId};
use crate::panel::{render_panel, PanelController, PanelState, PanelView};
use anyhow::{bail, Context};
use indicatif::{ProgressBar, ProgressStyle};
use sled::Db;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

const TAB: TabId = 1;
const TICK: Duration = Duration::from_millis(100);

/// What `moozi run` was asked to do.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub url: String,
    pub page_file: Option<PathBuf>,
    pub selection: String,
    pub language: Option<String>,
}

pub async fn run(cfg_folder: ConfigFolder, options: RunOptions) -> anyhow::Result<()> {
    if !cfg_folder.is_initialized() {
        eprintln!(
            "\x1b[1m\x1b[31mConfiguration folder or config.yaml not found. Please run 'moozi config' first.\x1b[0m"
        );
        return Ok(());
    }

    let config_file = cfg_folder
        .config_file
        .to_str()
        .context("Failed to convert the configuration path to a string")?;
    let config = configuration::get_configuration(config_file)
        .context("Unable to parse configuration file")?;

    let db = open_db(&cfg_folder)?;
    if let Some(language) = &options.language {
        set_preferred_language(&db, language)?;
    }

    let page = load_page(&options.url, options.page_file.as_ref(), &options.selection).await?;
    let api = Arc::new(HttpLyricsApi::new(&config.api_settings)?);

    let state = run_session(api, db, page, config.panel_settings.default_language).await?;
    print!("{}", render_panel(&state));

    if state.view == PanelView::Error {
        eprintln!("\x1b[33mRun the same command again to retry.\x1b[0m");
    }
    Ok(())
}

/// Prints what the extractor finds on a page, with the heuristics that fired.
pub async fn extract(url: &str, page_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let page = load_page(url, page_file, "").await?;
    let metadata = ExtractorChain::default().extract_song_info(&page);

    println!("\x1b[1m\x1b[34mSong info for {}\x1b[0m", page.url());
    println!("  Source:     {}", metadata.source);
    println!("  Lyrics site: {}", is_lyrics_site(page.hostname()));
    println!("  Title:      {}", metadata.title_or_empty());
    println!("  Artist:     {}", metadata.artist_or_empty());
    println!("  Album:      {}", metadata.album_or_empty());
    println!("  Year:       {}", metadata.release_year_or_empty());
    if let Some(confidence) = metadata.confidence {
        println!("  Confidence: {}", confidence.as_str());
    }

    if !metadata.hints.is_empty() {
        println!("\x1b[33mHints:\x1b[0m");
        for hint in &metadata.hints {
            println!("  - {}", hint);
        }
    }
    Ok(())
}

/// Stores the language the panel translates into.
pub fn set_language(cfg_folder: ConfigFolder, language: &str) -> anyhow::Result<()> {
    let language = language.trim();
    if language.is_empty() {
        bail!("Language code must not be empty");
    }

    let db = open_db(&cfg_folder)?;
    set_preferred_language(&db, language)?;
    println!("\x1b[32mTranslations will be shown in '{}'.\x1b[0m", language);
    Ok(())
}

fn open_db(cfg_folder: &ConfigFolder) -> anyhow::Result<Db> {
    let db_path = cfg_folder
        .moozi_db
        .to_str()
        .context("Failed to convert the database path to a string")?;
    Ok(database::open_database(db_path)?)
}

async fn load_page(
    url: &str,
    page_file: Option<&PathBuf>,
    selection: &str,
) -> anyhow::Result<Page> {
    match page_file {
        Some(path) => {
            let html = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok(Page::new(url, html, selection))
        }
        None => {
            log::info!("Downloading {}", url);
            let page = Page::fetch(&http_client()?, url, selection)
                .await
                .with_context(|| format!("Failed to download {}", url))?;
            Ok(page)
        }
    }
}

/// Runs one session and returns the panel as it ended up.
///
/// The session ends once the panel has shown the new selection, no translation is pending
/// and no dispatcher task is still running.
pub async fn run_session(
    api: Arc<dyn LyricsApi>,
    db: Db,
    page: Page,
    default_language: Option<String>,
) -> anyhow::Result<PanelState> {
    let extractor = PageExtractor::new(TAB, page);
    if !extractor.has_usable_selection() {
        log::info!("Selection too short, nothing to translate");
        return Ok(PanelState::default());
    }
    let mut panel = PanelController::new(db.clone());

    let (runtime_tx, mut runtime_rx) = mpsc::channel(32);
    let (tab_tx, tab_rx) = mpsc::channel(8);
    let (panel_tx, mut panel_rx) = broadcast::channel(32);

    let mut host = LocalHost::new();
    host.add_tab(TAB, extractor.page().url(), tab_tx);
    let extractor_task = tokio::spawn(extractor.run_loop(tab_rx, runtime_tx));

    let dispatcher = Dispatcher::new(api, Arc::new(host), db, panel_tx);
    dispatcher.on_extension_installed();

    // The click below always relays a fresh selection, so the stored one is not replayed.
    panel.load_language(default_language);
    let mut tasks = Vec::new();
    dispatcher.on_action_clicked(TAB);

    let spinner = spinner();
    let mut displayed = false;

    loop {
        tokio::select! {
            Some(envelope) = runtime_rx.recv() => {
                tasks.extend(dispatcher.handle(envelope));
            }
            received = panel_rx.recv() => match received {
                Ok(message) => {
                    displayed |= matches!(message, Message::DisplayHighlightedText { .. });
                    if let Some(request) = panel.on_message(message) {
                        tasks.extend(dispatcher.handle(Envelope::from_panel(request)));
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    log::warn!("Panel missed {} messages", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            _ = tokio::time::sleep(TICK), if !tasks.is_empty() => {}
        }

        spinner.set_message(match panel.state().view {
            PanelView::Loading => "Translating...",
            _ => "Looking up song info...",
        });

        tasks.retain(|task| !task.is_finished());
        if displayed
            && panel.state().pending_request.is_none()
            && tasks.is_empty()
            && runtime_rx.is_empty()
            && panel_rx.is_empty()
        {
            break;
        }
    }

    spinner.finish_and_clear();
    drop(dispatcher);
    extractor_task.await?;

    Ok(panel.state().clone())
}

fn spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Reading selection...");
    spinner.enable_steady_tick(TICK);
    spinner
}
