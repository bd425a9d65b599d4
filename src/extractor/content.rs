use crate::extractor::{is_lyrics_site, ExtractorChain, Page};
use crate::foundation::utils::grapheme_len;
use crate::messaging::{Envelope, Message, RuntimeSender, TabId};
use crate::models::SongMetadata;
use tokio::sync::mpsc;

/// Selections this short (or shorter) are ignored.
const MIN_SELECTION_LEN: usize = 10;

/// The extractor living inside one tab.
pub struct PageExtractor {
    tab: TabId,
    page: Page,
    chain: ExtractorChain,
}

impl PageExtractor {
    pub fn new(tab: TabId, page: Page) -> Self {
        Self::with_chain(tab, page, ExtractorChain::default())
    }

    pub fn with_chain(tab: TabId, page: Page, chain: ExtractorChain) -> Self {
        Self { tab, page, chain }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn is_lyrics_site(&self) -> bool {
        is_lyrics_site(self.page.hostname())
    }

    pub fn extract_song_info(&self) -> SongMetadata {
        self.chain.extract_song_info(&self.page)
    }

    /// Whether the trimmed selection is longer than 10 characters.
    pub fn has_usable_selection(&self) -> bool {
        grapheme_len(self.page.selection().trim()) > MIN_SELECTION_LEN
    }

    /// Builds the `processHighlightedText` message for the current selection.
    ///
    /// Returns `None` when the trimmed selection is 10 characters or shorter.
    pub fn process_selected_text(&self) -> Option<Message> {
        if !self.has_usable_selection() {
            log::info!("No text selected or selection too short");
            return None;
        }

        Some(Message::ProcessHighlightedText {
            text: self.page.selection().trim().to_string(),
            metadata: self.extract_song_info(),
        })
    }

    /// What a click on the floating badge sends: open the panel, then the selection.
    ///
    /// The badge only exists on known lyrics sites, so elsewhere this is empty.
    pub fn badge_click(&self) -> Vec<Message> {
        if !self.is_lyrics_site() {
            return Vec::new();
        }

        let mut messages = vec![Message::OpenSidePanel];
        messages.extend(self.process_selected_text());
        messages
    }

    /// Answers `processSelectedText` requests from the dispatcher until the tab channel closes.
    pub async fn run_loop(self, mut inbox: mpsc::Receiver<Message>, runtime: RuntimeSender) {
        while let Some(message) = inbox.recv().await {
            match message {
                Message::ProcessSelectedText => {
                    if let Some(reply) = self.process_selected_text() {
                        if runtime.send(Envelope::from_tab(self.tab, reply)).await.is_err() {
                            log::warn!("Dispatcher is gone, stopping extractor for tab {}", self.tab);
                            return;
                        }
                    }
                }
                other => log::debug!("Extractor ignoring {}", other.action()),
            }
        }
    }
}
