use crate::messaging::RequestId;
use crate::models::SongMetadata;
use serde_json::Value;
use std::fmt;

/// The five mutually exclusive panel views. Exactly one is visible at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelView {
    Instructions,
    NoSelection,
    Loading,
    Translation,
    Error,
}

impl PanelView {
    pub fn as_str(&self) -> &'static str {
        match self {
            PanelView::Instructions => "instructions",
            PanelView::NoSelection => "no-selection",
            PanelView::Loading => "loading",
            PanelView::Translation => "translation",
            PanelView::Error => "error",
        }
    }
}

impl fmt::Display for PanelView {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the original/translation table.
#[derive(Debug, Clone, PartialEq)]
pub struct LyricRow {
    pub original: String,
    pub translation: String,
    /// Either side is long enough to need wrapping.
    pub overflow: bool,
}

/// Everything the panel shows, owned by the `PanelController`.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelState {
    pub view: PanelView,
    pub highlighted_text: String,
    pub song_metadata: Option<SongMetadata>,
    pub selected_language: Option<String>,
    /// Last translation payload as received.
    pub translation_data: Option<Value>,
    pub rows: Vec<LyricRow>,
    /// Explanation paragraphs.
    pub explanation: Vec<String>,
    pub error_message: Option<String>,
    /// The only request whose answer will be accepted.
    pub pending_request: Option<RequestId>,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            view: PanelView::NoSelection,
            highlighted_text: String::new(),
            song_metadata: None,
            selected_language: None,
            translation_data: None,
            rows: Vec::new(),
            explanation: Vec::new(),
            error_message: None,
            pending_request: None,
        }
    }
}
