//! The side panel: shows the highlighted lyrics, asks for translations and renders them.
//!
//! `PanelController` is a plain state machine. Inbound messages from the dispatcher and user
//! actions go in, and the `requestTranslation` message to send (if any) comes out.

pub mod render;
mod state;

pub use render::render_panel;
pub use state::{LyricRow, PanelState, PanelView};

use crate::foundation::database::{get_preferred_language, get_selection, set_preferred_language};
use crate::messaging::{Message, RequestId};
use crate::models::{SongMetadata, TranslationResult};
use serde_json::Value;
use sled::Db;

const DEFAULT_ERROR: &str = "Failed to translate lyrics. Please try again.";

pub struct PanelController {
    db: Db,
    state: PanelState,
    next_request_id: RequestId,
}

impl PanelController {
    pub fn new(db: Db) -> Self {
        Self {
            db,
            state: PanelState::default(),
            next_request_id: 1,
        }
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    /// Loads the persisted language and selection when the panel opens.
    ///
    /// `default_language` is only used when no language was ever picked.
    pub fn initialize(&mut self, default_language: Option<String>) -> Option<Message> {
        self.load_language(default_language);

        let selection = get_selection(&self.db).unwrap_or_else(|e| {
            log::warn!("Could not read the stored selection: {}", e);
            None
        });

        match selection {
            Some(selection) => {
                self.state.highlighted_text = selection.text;
                self.state.song_metadata = selection.metadata;
                self.translate_or_show_original()
            }
            None => {
                self.show(PanelView::NoSelection);
                None
            }
        }
    }

    /// Loads only the persisted language, for a panel that is about to receive a fresh
    /// selection.
    pub fn load_language(&mut self, default_language: Option<String>) {
        let preferred = get_preferred_language(&self.db).unwrap_or_else(|e| {
            log::warn!("Could not read the preferred language: {}", e);
            None
        });
        self.state.selected_language = preferred.or(default_language);
    }

    /// Applies one message from the dispatcher.
    pub fn on_message(&mut self, message: Message) -> Option<Message> {
        match message {
            Message::DisplayHighlightedText { text, metadata } => {
                self.state.highlighted_text = text;
                self.state.song_metadata = Some(metadata);
                self.translate_or_show_original()
            }
            Message::TranslationResult {
                request_id,
                translation_data,
            } => {
                if self.accept(request_id) {
                    self.display_translation(translation_data);
                }
                None
            }
            Message::TranslationError { request_id, error } => {
                if self.accept(request_id) {
                    self.display_error(error);
                }
                None
            }
            Message::MetadataEnhanced { metadata } => self.apply_enhanced_metadata(metadata),
            other => {
                log::debug!("Panel ignoring {}", other.action());
                None
            }
        }
    }

    /// The user picked a language from the dropdown.
    pub fn select_language(&mut self, language: &str) -> Option<Message> {
        self.state.selected_language = Some(language.to_string());

        if let Err(e) = set_preferred_language(&self.db, language) {
            log::error!("Could not store the preferred language: {}", e);
        }

        if self.state.highlighted_text.is_empty() {
            return None;
        }
        self.request_translation()
    }

    /// The retry button. The current view stays up until the answer arrives.
    pub fn retry(&mut self) -> Option<Message> {
        self.issue_request()
    }

    fn translate_or_show_original(&mut self) -> Option<Message> {
        if self.state.selected_language.is_some() {
            return self.request_translation();
        }

        self.state.rows = render::placeholder_rows(&self.state.highlighted_text);
        self.state.explanation.clear();
        self.state.translation_data = None;
        self.show(PanelView::Translation);
        None
    }

    fn request_translation(&mut self) -> Option<Message> {
        let message = self.issue_request()?;
        self.show(PanelView::Loading);
        Some(message)
    }

    fn issue_request(&mut self) -> Option<Message> {
        let language = self.state.selected_language.clone()?;
        if self.state.highlighted_text.is_empty() {
            return None;
        }

        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.state.pending_request = Some(request_id);

        Some(Message::RequestTranslation {
            request_id,
            text: self.state.highlighted_text.clone(),
            language,
            metadata: self.state.song_metadata.clone().unwrap_or_default(),
        })
    }

    /// Only the latest request may update the panel.
    fn accept(&mut self, request_id: RequestId) -> bool {
        if self.state.pending_request != Some(request_id) {
            log::debug!("Dropping stale answer for request #{}", request_id);
            return false;
        }
        self.state.pending_request = None;
        true
    }

    fn display_translation(&mut self, translation_data: Value) {
        let result = TranslationResult::from_payload(&translation_data);

        self.state.rows =
            render::lyric_rows(&result.translated_lyrics, &self.state.highlighted_text);
        self.state.explanation =
            render::explanation_paragraphs(result.song_explanation.as_deref());
        self.state.translation_data = Some(translation_data);
        self.state.error_message = None;
        self.show(PanelView::Translation);
    }

    fn display_error(&mut self, error: String) {
        self.state.error_message = Some(if error.is_empty() {
            DEFAULT_ERROR.to_string()
        } else {
            error
        });
        self.show(PanelView::Error);
    }

    fn apply_enhanced_metadata(&mut self, metadata: SongMetadata) -> Option<Message> {
        let previous = self.state.song_metadata.replace(metadata);
        let current = self.state.song_metadata.as_ref()?;

        let significant = match &previous {
            Some(previous) => {
                changed(&current.song_title, &previous.song_title)
                    || changed(&current.artist_name, &previous.artist_name)
                    || (current.album.is_some() && previous.album.is_none())
            }
            None => current.has_title_or_artist(),
        };

        if !significant
            || self.state.selected_language.is_none()
            || self.state.highlighted_text.is_empty()
        {
            return None;
        }

        log::info!("Song identity changed, translating again");
        self.request_translation()
    }

    fn show(&mut self, view: PanelView) {
        log::debug!("Panel view: {} -> {}", self.state.view, view);
        self.state.view = view;
    }
}

/// A newly known value that differs from the old one.
fn changed(current: &Option<String>, previous: &Option<String>) -> bool {
    current.is_some() && current != previous
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::database::store_selection;
    use serde_json::json;

    fn temp_db() -> Db {
        sled::Config::new().temporary(true).open().unwrap()
    }

    fn metadata() -> SongMetadata {
        let mut metadata = SongMetadata::new("genius.com", "https://genius.com/stromae-alors-on-danse");
        metadata.song_title = Some("Alors on danse".to_string());
        metadata.artist_name = Some("Stromae".to_string());
        metadata
    }

    fn display(text: &str) -> Message {
        Message::DisplayHighlightedText {
            text: text.to_string(),
            metadata: metadata(),
        }
    }

    fn request_id(message: &Message) -> RequestId {
        match message {
            Message::RequestTranslation { request_id, .. } => *request_id,
            other => panic!("expected requestTranslation, got {:?}", other),
        }
    }

    #[test]
    fn test_initialize_without_selection() {
        let mut panel = PanelController::new(temp_db());
        assert_eq!(panel.initialize(None), None);
        assert_eq!(panel.state().view, PanelView::NoSelection);
    }

    #[test]
    fn test_initialize_with_selection_and_no_language_shows_placeholder() {
        let db = temp_db();
        store_selection(&db, "Qui dit étude dit travail", &metadata()).unwrap();

        let mut panel = PanelController::new(db);
        assert_eq!(panel.initialize(None), None);

        let state = panel.state();
        assert_eq!(state.view, PanelView::Translation);
        assert_eq!(state.rows.len(), 1);
        assert_eq!(state.rows[0].original, "Qui dit étude dit travail");
        assert_eq!(state.rows[0].translation, "Select a language to see translation");
        assert_eq!(state.song_metadata, Some(metadata()));
    }

    #[test]
    fn test_initialize_with_selection_and_language_requests_translation() {
        let db = temp_db();
        store_selection(&db, "Qui dit étude dit travail", &metadata()).unwrap();
        set_preferred_language(&db, "en").unwrap();

        let mut panel = PanelController::new(db);
        let request = panel.initialize(Some("de".to_string())).unwrap();

        assert_eq!(panel.state().view, PanelView::Loading);
        match request {
            Message::RequestTranslation {
                text,
                language,
                metadata: sent,
                ..
            } => {
                assert_eq!(text, "Qui dit étude dit travail");
                assert_eq!(language, "en");
                assert_eq!(sent, metadata());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_default_language_applies_when_none_stored() {
        let db = temp_db();
        store_selection(&db, "Qui dit étude dit travail", &metadata()).unwrap();

        let mut panel = PanelController::new(db);
        assert!(panel.initialize(Some("es".to_string())).is_some());
        assert_eq!(panel.state().selected_language.as_deref(), Some("es"));
    }

    #[test]
    fn test_load_language_ignores_stored_selection() {
        let db = temp_db();
        store_selection(&db, "Qui dit étude dit travail", &metadata()).unwrap();
        set_preferred_language(&db, "en").unwrap();

        let mut panel = PanelController::new(db);
        panel.load_language(None);

        let state = panel.state();
        assert_eq!(state.selected_language.as_deref(), Some("en"));
        assert!(state.highlighted_text.is_empty());
        assert_eq!(state.pending_request, None);
        assert_eq!(state.view, PanelView::NoSelection);
    }

    #[test]
    fn test_select_language_without_text_does_not_request() {
        let db = temp_db();
        let mut panel = PanelController::new(db.clone());
        panel.initialize(None);

        assert_eq!(panel.select_language("fr"), None);
        assert_eq!(panel.state().view, PanelView::NoSelection);
        assert_eq!(get_preferred_language(&db).unwrap().as_deref(), Some("fr"));
    }

    #[test]
    fn test_translation_result_renders_rows_and_explanation() {
        let mut panel = PanelController::new(temp_db());
        panel.on_message(display("Hello"));
        let id = request_id(&panel.select_language("fr").unwrap());

        let reply = panel.on_message(Message::TranslationResult {
            request_id: id,
            translation_data: json!({"translated_lyrics": {"Hello": "Bonjour"}, "song_explanation": "x"}),
        });
        assert_eq!(reply, None);

        let state = panel.state();
        assert_eq!(state.view, PanelView::Translation);
        assert_eq!(
            state.rows,
            vec![LyricRow {
                original: "Hello".to_string(),
                translation: "Bonjour".to_string(),
                overflow: false,
            }]
        );
        assert_eq!(state.explanation, vec!["x"]);
        assert_eq!(state.pending_request, None);
    }

    #[test]
    fn test_unparseable_string_payload_shows_error_row() {
        let mut panel = PanelController::new(temp_db());
        panel.on_message(display("Hello"));
        let id = request_id(&panel.select_language("fr").unwrap());

        panel.on_message(Message::TranslationResult {
            request_id: id,
            translation_data: json!("{not json"),
        });

        let state = panel.state();
        assert_eq!(state.view, PanelView::Translation);
        assert_eq!(state.rows[0].original, "Error");
        assert_eq!(state.rows[0].translation, "Failed to parse translation");
    }

    #[test]
    fn test_error_message_and_default() {
        let mut panel = PanelController::new(temp_db());
        panel.on_message(display("Hello"));
        let id = request_id(&panel.select_language("fr").unwrap());

        panel.on_message(Message::TranslationError {
            request_id: id,
            error: String::new(),
        });
        assert_eq!(panel.state().view, PanelView::Error);
        assert_eq!(
            panel.state().error_message.as_deref(),
            Some("Failed to translate lyrics. Please try again.")
        );
    }

    #[test]
    fn test_stale_answers_are_ignored() {
        let mut panel = PanelController::new(temp_db());
        panel.on_message(display("Hello"));
        let first = request_id(&panel.select_language("fr").unwrap());
        let second = request_id(&panel.select_language("de").unwrap());
        assert_ne!(first, second);

        panel.on_message(Message::TranslationResult {
            request_id: first,
            translation_data: json!({"translated_lyrics": {"Hello": "Bonjour"}}),
        });
        assert_eq!(panel.state().view, PanelView::Loading);

        panel.on_message(Message::TranslationResult {
            request_id: second,
            translation_data: json!({"translated_lyrics": {"Hello": "Hallo"}}),
        });
        assert_eq!(panel.state().rows[0].translation, "Hallo");

        // Already answered.
        panel.on_message(Message::TranslationError {
            request_id: second,
            error: "late".to_string(),
        });
        assert_eq!(panel.state().view, PanelView::Translation);
    }

    #[test]
    fn test_retry_keeps_view_until_answer() {
        let mut panel = PanelController::new(temp_db());
        panel.on_message(display("Hello"));
        let id = request_id(&panel.select_language("fr").unwrap());
        panel.on_message(Message::TranslationError {
            request_id: id,
            error: "API error: 503".to_string(),
        });

        let retry = request_id(&panel.retry().unwrap());
        assert_eq!(panel.state().view, PanelView::Error);

        panel.on_message(Message::TranslationResult {
            request_id: retry,
            translation_data: json!({"translated_lyrics": {"Hello": "Bonjour"}}),
        });
        assert_eq!(panel.state().view, PanelView::Translation);
        assert_eq!(panel.state().error_message, None);
    }

    #[test]
    fn test_retry_without_language_does_nothing() {
        let mut panel = PanelController::new(temp_db());
        panel.on_message(display("Hello"));
        assert_eq!(panel.retry(), None);
    }

    #[test]
    fn test_unchanged_enhancement_does_not_retranslate() {
        let mut panel = PanelController::new(temp_db());
        panel.on_message(display("Hello"));
        panel.select_language("fr").unwrap();

        let mut same_identity = metadata();
        same_identity.release_year = Some("2010".to_string());
        same_identity.validated_by_llm = true;

        assert_eq!(
            panel.on_message(Message::MetadataEnhanced {
                metadata: same_identity.clone()
            }),
            None
        );
        assert_eq!(panel.state().song_metadata, Some(same_identity));
    }

    #[test]
    fn test_changed_title_retranslates() {
        let mut panel = PanelController::new(temp_db());
        panel.on_message(display("Hello"));
        let first = request_id(&panel.select_language("fr").unwrap());

        let mut renamed = metadata();
        renamed.song_title = Some("Alors on danse (Radio Edit)".to_string());

        let second = request_id(
            &panel
                .on_message(Message::MetadataEnhanced { metadata: renamed })
                .unwrap(),
        );
        assert!(second > first);
        assert_eq!(panel.state().view, PanelView::Loading);
    }

    #[test]
    fn test_new_album_retranslates_but_not_without_language() {
        let mut album = metadata();
        album.album = Some("Cheese".to_string());

        let mut panel = PanelController::new(temp_db());
        panel.on_message(display("Hello"));
        assert_eq!(
            panel.on_message(Message::MetadataEnhanced {
                metadata: album.clone()
            }),
            None
        );

        let mut panel = PanelController::new(temp_db());
        panel.on_message(display("Hello"));
        panel.select_language("fr");
        assert!(panel
            .on_message(Message::MetadataEnhanced { metadata: album })
            .is_some());
    }
}
