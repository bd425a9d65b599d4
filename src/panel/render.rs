//! Turns panel state into rows and text.

use crate::models::{SongMetadata, TranslatedLyrics};
use crate::panel::{LyricRow, PanelState, PanelView};
use std::fmt::Write;

/// Rows whose original or translated line is longer than this get the overflow flag.
const OVERFLOW_CHARS: usize = 100;

pub const SELECT_LANGUAGE_PLACEHOLDER: &str = "Select a language to see translation";
const NO_EXPLANATION: &str = "No explanation available.";
const NO_LYRICS_SELECTED: &str = "No lyrics selected";
const TRANSLATION_NOT_AVAILABLE: &str = "Translation not available";

/// Builds the table rows for a translation.
///
/// Mapping entries become one row each, in order, skipping blank originals. A non-mapping
/// payload becomes a single row next to the highlighted text.
pub fn lyric_rows(lyrics: &TranslatedLyrics, highlighted_text: &str) -> Vec<LyricRow> {
    match lyrics {
        TranslatedLyrics::Lines(lines) => lines
            .iter()
            .filter(|(original, _)| !original.trim().is_empty())
            .map(|(original, translation)| row(original, translation))
            .collect(),
        TranslatedLyrics::Raw(raw) => {
            let original = if highlighted_text.is_empty() {
                NO_LYRICS_SELECTED
            } else {
                highlighted_text
            };
            let translation = if raw.is_empty() {
                TRANSLATION_NOT_AVAILABLE
            } else {
                raw
            };
            vec![row(original, translation)]
        }
    }
}

/// The single row shown before a language has been picked.
pub fn placeholder_rows(highlighted_text: &str) -> Vec<LyricRow> {
    vec![row(highlighted_text, SELECT_LANGUAGE_PLACEHOLDER)]
}

fn row(original: &str, translation: &str) -> LyricRow {
    LyricRow {
        original: original.to_string(),
        translation: translation.to_string(),
        overflow: original.chars().count() > OVERFLOW_CHARS
            || translation.chars().count() > OVERFLOW_CHARS,
    }
}

/// Splits an explanation into paragraphs on blank lines.
pub fn explanation_paragraphs(explanation: Option<&str>) -> Vec<String> {
    let paragraphs: Vec<String> = explanation
        .unwrap_or("")
        .split("\n\n")
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .map(str::to_string)
        .collect();

    if paragraphs.is_empty() {
        vec![NO_EXPLANATION.to_string()]
    } else {
        paragraphs
    }
}

/// The song header, or `None` when neither title nor artist is known.
pub fn song_info_lines(metadata: Option<&SongMetadata>) -> Option<Vec<String>> {
    let metadata = metadata.filter(|metadata| metadata.has_title_or_artist())?;

    let mut lines = vec![
        metadata
            .song_title
            .clone()
            .unwrap_or_else(|| "Unknown Song".to_string()),
        format!(
            "by {}",
            metadata.artist_name.as_deref().unwrap_or("Unknown Artist")
        ),
    ];

    match (&metadata.album, &metadata.release_year) {
        (Some(album), Some(year)) => lines.push(format!("Album: {} ({})", album, year)),
        (Some(album), None) => lines.push(format!("Album: {}", album)),
        (None, Some(year)) => lines.push(format!("Year: {}", year)),
        (None, None) => {}
    }

    if !metadata.genres.is_empty() {
        lines.push(format!("Genre: {}", metadata.genres.join(", ")));
    }

    if metadata.validated_by_llm {
        lines.push("✓ Verified".to_string());
    }

    Some(lines)
}

/// Plain-text rendering of the visible view.
pub fn render_panel(state: &PanelState) -> String {
    let mut out = String::new();

    if let Some(lines) = song_info_lines(state.song_metadata.as_ref()) {
        for line in lines {
            let _ = writeln!(out, "{}", line);
        }
        out.push('\n');
    }

    match state.view {
        PanelView::Instructions => {
            out.push_str("Highlight lyrics on a lyrics page, then press the Moozi button.\n");
        }
        PanelView::NoSelection => {
            out.push_str("No lyrics selected. Highlight some lyrics and try again.\n");
        }
        PanelView::Loading => out.push_str("Translating...\n"),
        PanelView::Translation => {
            for row in &state.rows {
                let _ = writeln!(out, "{}", row.original);
                let _ = writeln!(out, "  → {}", row.translation);
                if row.overflow {
                    out.push('\n');
                }
            }
            if state.translation_data.is_some() {
                out.push('\n');
                for paragraph in &state.explanation {
                    let _ = writeln!(out, "{}\n", paragraph);
                }
            }
        }
        PanelView::Error => {
            let _ = writeln!(
                out,
                "Error: {}",
                state.error_message.as_deref().unwrap_or_default()
            );
        }
    }

    out
}
