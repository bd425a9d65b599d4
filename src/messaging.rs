//! The message vocabulary exchanged between the page extractor, the dispatcher and the panel.
//!
//! Action names and field names are the wire contract: they serialize exactly as the
//! extension contexts spell them (`{"action": "displayHighlightedText", "text": ...}`).

use crate::models::SongMetadata;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;

/// Browser tab identifier.
pub type TabId = u32;

/// Correlates a `requestTranslation` with its `translationResult`/`translationError`.
pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Message {
    /// Dispatcher -> extractor: read the current selection and report it.
    ProcessSelectedText,
    /// Extractor -> dispatcher.
    ProcessHighlightedText { text: String, metadata: SongMetadata },
    /// Dispatcher -> panel.
    DisplayHighlightedText { text: String, metadata: SongMetadata },
    /// Dispatcher -> panel, after a successful validation changed the metadata.
    MetadataEnhanced { metadata: SongMetadata },
    /// Panel -> dispatcher.
    RequestTranslation {
        request_id: RequestId,
        text: String,
        language: String,
        metadata: SongMetadata,
    },
    /// Dispatcher -> panel, the endpoint response relayed verbatim.
    TranslationResult {
        request_id: RequestId,
        translation_data: Value,
    },
    /// Dispatcher -> panel.
    TranslationError { request_id: RequestId, error: String },
    /// Extractor -> dispatcher, from the floating badge.
    OpenSidePanel,
}

impl Message {
    pub fn action(&self) -> &'static str {
        match self {
            Message::ProcessSelectedText => "processSelectedText",
            Message::ProcessHighlightedText { .. } => "processHighlightedText",
            Message::DisplayHighlightedText { .. } => "displayHighlightedText",
            Message::MetadataEnhanced { .. } => "metadataEnhanced",
            Message::RequestTranslation { .. } => "requestTranslation",
            Message::TranslationResult { .. } => "translationResult",
            Message::TranslationError { .. } => "translationError",
            Message::OpenSidePanel => "openSidePanel",
        }
    }
}

/// A message on its way to the dispatcher, with the tab it came from (if any).
#[derive(Debug, Clone)]
pub struct Envelope {
    pub message: Message,
    pub sender_tab: Option<TabId>,
}

impl Envelope {
    pub fn from_tab(tab: TabId, message: Message) -> Self {
        Self {
            message,
            sender_tab: Some(tab),
        }
    }

    pub fn from_panel(message: Message) -> Self {
        Self {
            message,
            sender_tab: None,
        }
    }
}

pub type RuntimeSender = mpsc::Sender<Envelope>;
pub type RuntimeReceiver = mpsc::Receiver<Envelope>;
