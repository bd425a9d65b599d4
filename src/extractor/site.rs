//! Extractors for lyrics sites whose pages follow a known layout.
//!
//! Every site runs the same first-match cascade, only the patterns and selectors differ:
//!
//! 1. match the document title against the site's title patterns,
//! 2. probe the per-field selectors for whatever is still missing,
//! 3. read album and release year independently of steps 1-2,
//! 4. fall back to embedded structured data for a missing title or artist.
//!
//! A value is never replaced once found.

use crate::extractor::document::Document;
use crate::extractor::structured_data::fill_from_structured_data;
use crate::extractor::{Page, SongInfoExtractor};
use crate::foundation::utils::non_empty;
use crate::models::SongMetadata;
use regex::Regex;

/// Where to look for song information on one site.
#[derive(Debug, Clone)]
pub struct SiteProfile {
    pub domain: &'static str,
    /// Regexes with `artist` and `title` named groups, tried in order.
    pub title_patterns: &'static [&'static str],
    pub title_selectors: &'static [&'static str],
    pub artist_selectors: &'static [&'static str],
    pub album_selectors: &'static [&'static str],
    /// Element whose text holds the release date.
    pub year_region: Option<&'static str>,
    pub year_pattern: &'static str,
    pub schema_types: &'static [&'static str],
}

pub const GENIUS: SiteProfile = SiteProfile {
    domain: "genius.com",
    title_patterns: &[r"(?i)^(?P<artist>.+?)\s+[–—-]\s+(?P<title>.+)\s+Lyrics\s+\|\s+Genius Lyrics"],
    title_selectors: &[
        r#"h1[class*="SongHeader__Title"]"#,
        "[data-lyrics-container] h1",
        ".header_with_cover_art-primary_info-title",
    ],
    artist_selectors: &[
        r#"a[class*="SongHeader__Artist"]"#,
        ".header_with_cover_art-primary_info-primary_artist",
    ],
    album_selectors: &[r#"div[class*="SongAlbum__"] a"#],
    year_region: Some(r#"div[class*="HeaderMetadata__"] span:nth-child(1)"#),
    year_pattern: r"\b\d{4}\b",
    schema_types: &["MusicRecording", "BreadcrumbList"],
};

pub const AZLYRICS: SiteProfile = SiteProfile {
    domain: "azlyrics.com",
    title_patterns: &[r"(?i)^(?P<artist>.+?)\s+-\s+(?P<title>.+)\s+Lyrics\s+\|\s+AZLyrics\.com$"],
    title_selectors: &[".ringtone ~ b"],
    artist_selectors: &["div.lyricsh h2"],
    album_selectors: &["div.panel.album-panel a"],
    year_region: Some("div.panel.album-panel"),
    year_pattern: r"\b(?:19|20)\d{2}\b",
    schema_types: &["MusicRecording"],
};

pub const MUSIXMATCH: SiteProfile = SiteProfile {
    domain: "musixmatch.com",
    title_patterns: &[r"(?i)^(?P<artist>.+?)\s+-\s+(?P<title>.+?)\s+Lyrics(?:\s+\|\s+Musixmatch)?$"],
    title_selectors: &["h1"],
    artist_selectors: &[r#"a[href^="/artist/"]"#],
    album_selectors: &[r#"a[href^="/album/"]"#],
    year_region: None,
    year_pattern: r"\b\d{4}\b",
    schema_types: &["MusicRecording"],
};

pub const METROLYRICS: SiteProfile = SiteProfile {
    domain: "metrolyrics.com",
    title_patterns: &[r"(?i)^(?P<artist>.+?)\s+-\s+(?P<title>.+?)\s+Lyrics(?:\s+\|\s+MetroLyrics)?$"],
    title_selectors: &["h1"],
    artist_selectors: &[".banner-heading a", "h2"],
    album_selectors: &[],
    year_region: None,
    year_pattern: r"\b\d{4}\b",
    schema_types: &["MusicRecording"],
};

pub const SONGLYRICS: SiteProfile = SiteProfile {
    domain: "songlyrics.com",
    title_patterns: &[r"(?i)^(?P<artist>.+?)\s+-\s+(?P<title>.+?)\s+Lyrics(?:\s+\|\s+SongLyrics\.com)?$"],
    title_selectors: &["div.pagetitle h1"],
    artist_selectors: &["div.pagetitle p a"],
    album_selectors: &[r#"div.pagetitle p a[href*="/album/"]"#],
    year_region: None,
    year_pattern: r"\b\d{4}\b",
    schema_types: &["MusicRecording"],
};

pub const LYRICS_COM: SiteProfile = SiteProfile {
    domain: "lyrics.com",
    title_patterns: &[
        r"(?i)^(?P<title>.+?)\s+Lyrics\s+by\s+(?P<artist>.+?)(?:\s+\|\s+Lyrics\.com)?$",
        r"(?i)^(?P<artist>.+?)\s+-\s+(?P<title>.+?)\s+Lyrics(?:\s+\|\s+Lyrics\.com)?$",
    ],
    title_selectors: &["#lyric-title-text", "h1"],
    artist_selectors: &[".lyric-artist a"],
    album_selectors: &[r#".lyric-infobox a[href*="/album/"]"#],
    year_region: Some(".lyric-infobox"),
    year_pattern: r"\b\d{4}\b",
    schema_types: &["MusicRecording"],
};

pub struct SiteExtractor {
    profile: SiteProfile,
    title_patterns: Vec<Regex>,
    year_pattern: Option<Regex>,
}

impl SiteExtractor {
    pub fn new(profile: SiteProfile) -> Self {
        let title_patterns = profile
            .title_patterns
            .iter()
            .filter_map(|pattern| compile(profile.domain, pattern))
            .collect();
        let year_pattern = compile(profile.domain, profile.year_pattern);

        Self {
            profile,
            title_patterns,
            year_pattern,
        }
    }

    /// Splits a document title into `(artist, title)` with the first matching pattern.
    fn match_title(&self, page_title: &str) -> Option<(String, String)> {
        self.title_patterns.iter().find_map(|pattern| {
            let captures = pattern.captures(page_title)?;
            let artist = non_empty(captures.name("artist")?.as_str())?;
            let title = non_empty(captures.name("title")?.as_str())?;
            Some((artist, title))
        })
    }

    fn release_year(&self, document: &Document) -> Option<String> {
        let region = document.element_text(self.profile.year_region?)?;
        self.year_pattern
            .as_ref()?
            .find(&region)
            .map(|year| year.as_str().to_string())
    }
}

fn compile(domain: &str, pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            log::warn!("Invalid pattern for {}: {}", domain, e);
            None
        }
    }
}

impl SongInfoExtractor for SiteExtractor {
    fn name(&self) -> &str {
        self.profile.domain
    }

    fn detect(&self, hostname: &str) -> bool {
        hostname.to_lowercase().contains(self.profile.domain)
    }

    fn extract(&self, page: &Page) -> SongMetadata {
        let mut metadata = SongMetadata::new(self.profile.domain, page.url());
        let document = Document::parse(page.html());

        if let Some((artist, title)) = self.match_title(&document.title()) {
            log::debug!(
                "{}: extracted from page title: {:?} - {:?}",
                self.profile.domain,
                artist,
                title
            );
            metadata.artist_name = Some(artist);
            metadata.song_title = Some(title);
        }

        if metadata.song_title.is_none() {
            metadata.song_title = document
                .first_text(self.profile.title_selectors)
                .map(|(text, _)| trim_quotes(&text));
        }
        if metadata.artist_name.is_none() {
            metadata.artist_name = document
                .first_text(self.profile.artist_selectors)
                .map(|(text, _)| trim_quotes(&text));
        }

        metadata.album = document
            .first_text(self.profile.album_selectors)
            .map(|(text, _)| text);
        metadata.release_year = self.release_year(&document);

        if metadata.song_title.is_none() || metadata.artist_name.is_none() {
            fill_from_structured_data(
                &document,
                self.profile.schema_types,
                &mut metadata.song_title,
                &mut metadata.artist_name,
            );
        }

        metadata
    }
}

fn trim_quotes(text: &str) -> String {
    text.trim()
        .trim_matches(|c| matches!(c, '"' | '“' | '”'))
        .trim()
        .to_string()
}
