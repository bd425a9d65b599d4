//! The background dispatcher: routes messages between extractors and the panel and talks to
//! the translation backend.
//!
//! The dispatcher owns no state of its own. It relays the last selection through the local
//! store so a panel opened later can pick it up, and every network call runs on its own task
//! so a slow backend never blocks routing.

mod host;

pub use host::{BrowserHost, LocalHost, SIDE_PANEL_PATH};

#[cfg(test)]
pub use host::MockBrowserHost;

use crate::api_client::{identity_changed, LyricsApi};
use crate::foundation::database::{store_selection, store_selection_metadata};
use crate::messaging::{Envelope, Message, RequestId, RuntimeReceiver, TabId};
use crate::models::{SongMetadata, TranslationRequest};
use sled::Db;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

#[derive(Clone)]
pub struct Dispatcher {
    api: Arc<dyn LyricsApi>,
    host: Arc<dyn BrowserHost>,
    db: Db,
    broadcast: broadcast::Sender<Message>,
}

impl Dispatcher {
    pub fn new(
        api: Arc<dyn LyricsApi>,
        host: Arc<dyn BrowserHost>,
        db: Db,
        broadcast: broadcast::Sender<Message>,
    ) -> Self {
        Self {
            api,
            host,
            db,
            broadcast,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Message> {
        self.broadcast.subscribe()
    }

    pub fn on_extension_installed(&self) {
        self.host.enable_side_panel(SIDE_PANEL_PATH);
    }

    /// The toolbar button: open the panel and ask the tab for its selection.
    pub fn on_action_clicked(&self, tab: TabId) {
        self.host.open_side_panel(tab);
        self.host.send_to_tab(tab, Message::ProcessSelectedText);
    }

    /// Routes one inbound message.
    ///
    /// Returns the handle of the network task it started, if any. Callers are free to drop
    /// it; tests await it.
    pub fn handle(&self, envelope: Envelope) -> Option<JoinHandle<()>> {
        log::debug!("Dispatching {}", envelope.message.action());

        match envelope.message {
            Message::ProcessHighlightedText { text, metadata } => {
                self.process_highlighted_text(text, metadata)
            }
            Message::RequestTranslation {
                request_id,
                text,
                language,
                metadata,
            } => Some(self.request_translation(request_id, text, language, metadata)),
            Message::OpenSidePanel => {
                match envelope.sender_tab {
                    Some(tab) => self.host.open_side_panel(tab),
                    None => log::debug!("openSidePanel without a sender tab"),
                }
                None
            }
            other => {
                log::debug!("Dispatcher ignoring {}", other.action());
                None
            }
        }
    }

    /// Routes messages until every sender is gone.
    pub async fn run_loop(self, mut inbox: RuntimeReceiver) {
        while let Some(envelope) = inbox.recv().await {
            self.handle(envelope);
        }
    }

    fn process_highlighted_text(
        &self,
        text: String,
        metadata: SongMetadata,
    ) -> Option<JoinHandle<()>> {
        if let Err(e) = store_selection(&self.db, &text, &metadata) {
            log::error!("Failed to store the highlighted text: {}", e);
        }

        self.send(Message::DisplayHighlightedText {
            text,
            metadata: metadata.clone(),
        });

        if !metadata.has_title_or_artist() {
            return None;
        }

        let api = Arc::clone(&self.api);
        let db = self.db.clone();
        let broadcast = self.broadcast.clone();

        Some(tokio::spawn(async move {
            let enhanced = match api.validate_metadata(&metadata).await {
                Ok(enhanced) => enhanced,
                Err(e) => {
                    log::warn!("Metadata validation error: {}", e);
                    return;
                }
            };

            if !identity_changed(&metadata, &enhanced) {
                log::debug!("Validation confirmed the scraped metadata");
                return;
            }

            if let Err(e) = store_selection_metadata(&db, &enhanced) {
                log::error!("Failed to store the enhanced metadata: {}", e);
            }
            if broadcast
                .send(Message::MetadataEnhanced { metadata: enhanced })
                .is_err()
            {
                log::debug!("No panel listening for metadataEnhanced");
            }
        }))
    }

    fn request_translation(
        &self,
        request_id: RequestId,
        text: String,
        language: String,
        metadata: SongMetadata,
    ) -> JoinHandle<()> {
        log::info!("Translation requested: #{} to {}", request_id, language);

        let request = TranslationRequest {
            text,
            target_language_code: language,
            metadata,
            page_url: self.host.active_tab_url().unwrap_or_default(),
        };
        let api = Arc::clone(&self.api);
        let broadcast = self.broadcast.clone();

        tokio::spawn(async move {
            let reply = match api.translate(&request).await {
                Ok(translation_data) => Message::TranslationResult {
                    request_id,
                    translation_data,
                },
                Err(e) => {
                    log::error!("Translation error: {}", e);
                    Message::TranslationError {
                        request_id,
                        error: e.to_string(),
                    }
                }
            };

            if broadcast.send(reply).is_err() {
                log::debug!("No panel listening for translation #{}", request_id);
            }
        })
    }

    fn send(&self, message: Message) {
        let action = message.action();
        if self.broadcast.send(message).is_err() {
            log::debug!("No panel listening for {}", action);
        }
    }
}
