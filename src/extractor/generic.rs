use crate::extractor::document::Document;
use crate::extractor::structured_data::{fill_from_structured_data, matching_types};
use crate::extractor::{Page, SongInfoExtractor};
use crate::foundation::utils::non_empty;
use crate::models::{Confidence, SongMetadata};
use regex::Regex;

const TITLE_PATTERNS: [(&str, &str); 3] = [
    (r#"(?i)^(?P<artist>.+?)\s+-\s+(?P<title>.+?)\s+Lyrics"#, "Artist - Song Lyrics"),
    (r#"(?i)^(?P<title>.+?)\s+Lyrics\s+by\s+(?P<artist>.+)$"#, "Song Lyrics by Artist"),
    (r#"(?i)Lyrics\s+to\s+(?P<title>.+?)\s+by\s+(?P<artist>.+)$"#, "Lyrics to Song by Artist"),
];

const SONG_TITLE_SELECTORS: [&str; 8] = [
    "h1.song-title",
    ".song-title",
    "#song-title",
    ".track-title",
    ".title",
    "h1.title",
    r#"[class*="title" i]"#,
    r#"[id*="title" i]"#,
];

const ARTIST_SELECTORS: [&str; 6] = [
    ".artist-name",
    ".artist",
    "#artist-name",
    "#artist",
    r#"[class*="artist" i]"#,
    r#"[id*="artist" i]"#,
];

/// Fallback for pages that no site profile recognizes.
///
/// Tries document title conventions, then common class and id names, then `MusicRecording`
/// structured data. Every candidate it sees is recorded in `hints` so an operator can tell why
/// a page came out the way it did.
pub struct GenericExtractor {
    title_patterns: Vec<(Regex, &'static str)>,
}

impl GenericExtractor {
    pub fn new() -> Self {
        let title_patterns = TITLE_PATTERNS
            .iter()
            .filter_map(|(pattern, label)| match Regex::new(pattern) {
                Ok(regex) => Some((regex, *label)),
                Err(e) => {
                    log::warn!("Invalid generic title pattern {:?}: {}", label, e);
                    None
                }
            })
            .collect();

        Self { title_patterns }
    }
}

impl Default for GenericExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SongInfoExtractor for GenericExtractor {
    fn name(&self) -> &str {
        "generic"
    }

    fn detect(&self, _hostname: &str) -> bool {
        true
    }

    fn extract(&self, page: &Page) -> SongMetadata {
        let mut metadata = SongMetadata::new("generic", page.url());
        let mut hints = Vec::new();
        let document = Document::parse(page.html());

        if let Some(og_title) = document.attribute(r#"meta[property="og:title"]"#, "content") {
            hints.push(format!("OG Title: {}", og_title));
            let parts: Vec<&str> = og_title.split(" - ").collect();
            if parts.len() >= 2 {
                hints.push(format!("Title parts: {:?}", parts));
            }
        }

        let page_title = document.title();
        hints.push(format!("Page title: {}", page_title));

        for (pattern, label) in &self.title_patterns {
            let Some(captures) = pattern.captures(&page_title) else {
                continue;
            };
            let artist = captures.name("artist").and_then(|m| non_empty(m.as_str()));
            let title = captures.name("title").and_then(|m| non_empty(m.as_str()));
            if let (Some(artist), Some(title)) = (artist, title) {
                hints.push(format!("Pattern matched: \"{}\"", label));
                metadata.artist_name = Some(artist);
                metadata.song_title = Some(title);
                break;
            }
        }

        for selector in SONG_TITLE_SELECTORS {
            if let Some(candidate) = document.non_empty_text(selector) {
                hints.push(format!("Possible title from {}: {}", selector, candidate));
                metadata.song_title.get_or_insert(candidate);
            }
        }

        for selector in ARTIST_SELECTORS {
            if let Some(candidate) = document.non_empty_text(selector) {
                hints.push(format!("Possible artist from {}: {}", selector, candidate));
                metadata.artist_name.get_or_insert(candidate);
            }
        }

        for schema_type in matching_types(&document, &["MusicRecording"]) {
            hints.push(format!("Found {} structured data", schema_type));
        }
        if metadata.song_title.is_none() || metadata.artist_name.is_none() {
            fill_from_structured_data(
                &document,
                &["MusicRecording"],
                &mut metadata.song_title,
                &mut metadata.artist_name,
            );
        }

        metadata.confidence = Some(
            if metadata.song_title.is_some() && metadata.artist_name.is_some() {
                Confidence::Medium
            } else {
                Confidence::Low
            },
        );

        for hint in &hints {
            log::debug!("generic extractor: {}", hint);
        }
        metadata.hints = hints;

        metadata
    }
}
