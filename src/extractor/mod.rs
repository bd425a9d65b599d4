//! Page-side extraction: finds out which song a lyrics page is about and reports what the
//! user highlighted.

mod content;
mod document;
mod generic;
mod page;
mod site;
mod structured_data;

pub use content::PageExtractor;
pub use generic::GenericExtractor;
pub use page::Page;
pub use site::{
    SiteExtractor, SiteProfile, AZLYRICS, GENIUS, LYRICS_COM, METROLYRICS, MUSIXMATCH,
    SONGLYRICS,
};

use crate::foundation::utils::{clean_artist_name, clean_song_title, non_empty, normalize_text};
use crate::models::SongMetadata;

/// Domains with a dedicated extractor.
pub const KNOWN_LYRICS_DOMAINS: [&str; 6] = [
    "genius.com",
    "azlyrics.com",
    "lyrics.com",
    "musixmatch.com",
    "metrolyrics.com",
    "songlyrics.com",
];

/// One way of reading song information off a page.
pub trait SongInfoExtractor: Send + Sync {
    fn name(&self) -> &str;

    /// Whether this extractor handles pages served from `hostname`.
    fn detect(&self, hostname: &str) -> bool;

    /// Never fails; returns whatever could be found, `source` and `url` always set.
    fn extract(&self, page: &Page) -> SongMetadata;
}

/// Extractors in priority order. The first one that detects the hostname wins.
pub struct ExtractorChain {
    extractors: Vec<Box<dyn SongInfoExtractor>>,
}

impl ExtractorChain {
    pub fn new(extractors: Vec<Box<dyn SongInfoExtractor>>) -> Self {
        Self { extractors }
    }

    /// Extracts song information and applies the common cleanup.
    pub fn extract_song_info(&self, page: &Page) -> SongMetadata {
        let mut metadata = match self
            .extractors
            .iter()
            .find(|extractor| extractor.detect(page.hostname()))
        {
            Some(extractor) => {
                log::debug!("Extracting {} with the {} extractor", page.url(), extractor.name());
                extractor.extract(page)
            }
            None => SongMetadata::new("unknown", page.url()),
        };

        post_process(&mut metadata, page.url());
        metadata
    }
}

impl Default for ExtractorChain {
    /// Site extractors, with `lyrics.com` after the domains that contain it, then the
    /// generic fallback.
    fn default() -> Self {
        Self::new(vec![
            Box::new(SiteExtractor::new(GENIUS)),
            Box::new(SiteExtractor::new(AZLYRICS)),
            Box::new(SiteExtractor::new(MUSIXMATCH)),
            Box::new(SiteExtractor::new(METROLYRICS)),
            Box::new(SiteExtractor::new(SONGLYRICS)),
            Box::new(SiteExtractor::new(LYRICS_COM)),
            Box::new(GenericExtractor::new()),
        ])
    }
}

/// Whether `hostname` belongs to one of the known lyrics sites.
pub fn is_lyrics_site(hostname: &str) -> bool {
    let hostname = hostname.to_lowercase();
    KNOWN_LYRICS_DOMAINS
        .iter()
        .any(|domain| hostname.contains(domain))
}

/// Cleanup shared by every extractor: tidy title and artist, drop empty values and stamp the
/// page URL.
pub fn post_process(metadata: &mut SongMetadata, url: &str) {
    metadata.song_title = metadata
        .song_title
        .as_deref()
        .map(clean_song_title)
        .and_then(|title| non_empty(&title));
    metadata.artist_name = metadata
        .artist_name
        .as_deref()
        .map(clean_artist_name)
        .and_then(|artist| non_empty(&artist));
    metadata.album = metadata
        .album
        .as_deref()
        .map(normalize_text)
        .and_then(|album| non_empty(&album));
    metadata.release_year = metadata
        .release_year
        .as_deref()
        .and_then(non_empty);
    metadata.url = url.to_string();
}
