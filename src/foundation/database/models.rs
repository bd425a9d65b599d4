use crate::models::SongMetadata;

/// Storage key holding the last highlighted text.
pub const HIGHLIGHTED_TEXT_KEY: &str = "highlightedText";
/// Storage key holding the metadata of the last selection.
pub const SELECTION_METADATA_KEY: &str = "selectionMetadata";
/// Storage key holding the user's target language code.
pub const PREFERRED_LANGUAGE_KEY: &str = "preferredLanguage";

/// The relay buffer written by the dispatcher and read by the panel on start.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSelection {
    pub text: String,
    pub metadata: Option<SongMetadata>,
}
