//! Data shared between the extractor, the dispatcher and the panel.
//!
//! Every value here is owned by exactly one component at a time and handed over by value
//! through the message channels, so nothing in this module needs interior mutability.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How much trust the extractor (or the validation endpoint) puts in a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

/// Song information scraped from a lyrics page.
///
/// `source` and `url` are always filled in by the extractor that produced the value; every
/// other field is best effort. Empty strings are never stored, a missing value is `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongMetadata {
    pub song_title: Option<String>,
    pub artist_name: Option<String>,
    pub album: Option<String>,
    pub release_year: Option<String>,
    pub source: String,
    pub url: String,
    pub confidence: Option<Confidence>,
    #[serde(rename = "validatedByLLM", default)]
    pub validated_by_llm: bool,
    #[serde(default)]
    pub genres: Vec<String>,
    /// Operator trace of which heuristic produced which candidate. Never persisted.
    #[serde(skip)]
    pub hints: Vec<String>,
}

impl SongMetadata {
    pub fn new(source: &str, url: &str) -> Self {
        Self {
            source: source.to_string(),
            url: url.to_string(),
            ..Default::default()
        }
    }

    pub fn has_title_or_artist(&self) -> bool {
        self.song_title.is_some() || self.artist_name.is_some()
    }

    pub fn title_or_empty(&self) -> &str {
        self.song_title.as_deref().unwrap_or("")
    }

    pub fn artist_or_empty(&self) -> &str {
        self.artist_name.as_deref().unwrap_or("")
    }

    pub fn album_or_empty(&self) -> &str {
        self.album.as_deref().unwrap_or("")
    }

    pub fn release_year_or_empty(&self) -> &str {
        self.release_year.as_deref().unwrap_or("")
    }
}

/// A single translation call, built by the dispatcher from a panel request.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRequest {
    pub text: String,
    pub target_language_code: String,
    pub metadata: SongMetadata,
    pub page_url: String,
}

/// The `translated_lyrics` part of a translation response.
#[derive(Debug, Clone, PartialEq)]
pub enum TranslatedLyrics {
    /// `(original line, translated line)` pairs in response order.
    Lines(Vec<(String, String)>),
    /// Anything that was not a mapping, kept as text.
    Raw(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslationResult {
    pub translated_lyrics: TranslatedLyrics,
    pub song_explanation: Option<String>,
}

impl TranslationResult {
    /// Interprets a translation endpoint response.
    ///
    /// `translated_lyrics` may be a JSON object or a string holding an encoded JSON object.
    /// A string that does not parse becomes a single `Error` line.
    pub fn from_payload(payload: &Value) -> Self {
        let translated_lyrics = match &payload["translated_lyrics"] {
            Value::String(encoded) => match serde_json::from_str::<Value>(encoded) {
                Ok(decoded) => lyrics_from_value(&decoded),
                Err(e) => {
                    log::error!("Error parsing translated lyrics: {}", e);
                    TranslatedLyrics::Lines(vec![(
                        "Error".to_string(),
                        "Failed to parse translation".to_string(),
                    )])
                }
            },
            other => lyrics_from_value(other),
        };

        let song_explanation = payload["song_explanation"].as_str().map(str::to_string);

        Self {
            translated_lyrics,
            song_explanation,
        }
    }
}

fn lyrics_from_value(value: &Value) -> TranslatedLyrics {
    match value {
        Value::Object(map) => TranslatedLyrics::Lines(
            map.iter()
                .map(|(original, translated)| (original.clone(), value_as_text(translated)))
                .collect(),
        ),
        Value::Null => TranslatedLyrics::Raw(String::new()),
        other => TranslatedLyrics::Raw(value_as_text(other)),
    }
}

fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
