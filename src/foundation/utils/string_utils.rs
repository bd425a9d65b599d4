use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

fn lyrics_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\s+lyrics$").unwrap())
}

fn lyrics_by_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^lyrics by\s+").unwrap())
}

fn official_lyrics() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\(official lyrics\)").unwrap())
}

fn bracketed() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[.*?\]").unwrap())
}

/// Cleans up a scraped song title.
///
/// Removes trailing "Lyrics" suffixes, "(Official Lyrics)" and anything in square brackets
/// (e.g. "[Live]", "[Remix]"), then collapses whitespace. The rules are applied until the
/// string stops changing, so cleaning an already clean title is a no-op.
///
/// # Examples
///
/// ```
/// use moozi::foundation::utils::clean_song_title;
///
/// assert_eq!(clean_song_title("Bohemian Rhapsody [Remastered] Lyrics"), "Bohemian Rhapsody");
/// ```
pub fn clean_song_title(title: &str) -> String {
    clean_to_fixed_point(title, |s| {
        let s = official_lyrics().replace_all(s, "");
        let s = bracketed().replace_all(&s, "");
        let s = collapse_whitespace(&s);
        lyrics_suffix().replace(&s, "").trim().to_string()
    })
}

/// Cleans up a scraped artist name.
///
/// Removes trailing "Lyrics" suffixes and a leading "Lyrics by", then collapses whitespace.
///
/// # Examples
///
/// ```
/// use moozi::foundation::utils::clean_artist_name;
///
/// assert_eq!(clean_artist_name("Lyrics by Queen"), "Queen");
/// ```
pub fn clean_artist_name(artist: &str) -> String {
    clean_to_fixed_point(artist, |s| {
        let s = collapse_whitespace(s);
        let s = lyrics_by_prefix().replace(&s, "");
        lyrics_suffix().replace(&s, "").trim().to_string()
    })
}

fn clean_to_fixed_point(input: &str, pass: impl Fn(&str) -> String) -> String {
    let mut current = normalize_text(input);
    loop {
        let next = normalize_text(&pass(&current));
        if next == current {
            return current;
        }
        current = next;
    }
}

/// NFC-normalizes text and collapses runs of whitespace into single spaces.
///
/// Pages mix precomposed and decomposed accents; NFC keeps comparisons between the
/// scraped value and the validated value meaningful.
pub fn normalize_text(input: &str) -> String {
    collapse_whitespace(&input.nfc().collect::<String>())
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Number of user-perceived characters (extended grapheme clusters).
pub fn grapheme_len(input: &str) -> usize {
    input.graphemes(true).count()
}

/// Returns `Some(trimmed)` unless the trimmed string is empty.
pub fn non_empty(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clean_song_title() {
        assert_eq!(clean_song_title("Yesterday Lyrics"), "Yesterday");
        assert_eq!(clean_song_title("Yesterday (Official Lyrics)"), "Yesterday");
        assert_eq!(clean_song_title("Yesterday [Remastered 2009]"), "Yesterday");
        assert_eq!(clean_song_title("  Let   It Be  "), "Let It Be");
        assert_eq!(clean_song_title("Lyrics"), "Lyrics");
    }

    #[test]
    fn test_clean_song_title_exposed_suffix() {
        // Removing the bracket exposes a suffix that must be stripped as well.
        assert_eq!(clean_song_title("Hurt Lyrics [Live]"), "Hurt");
        assert_eq!(clean_song_title("Hurt lyrics LYRICS"), "Hurt");
    }

    #[test]
    fn test_clean_artist_name() {
        assert_eq!(clean_artist_name("Johnny Cash Lyrics"), "Johnny Cash");
        assert_eq!(clean_artist_name("lyrics by Johnny Cash"), "Johnny Cash");
        assert_eq!(clean_artist_name("Lyrics by Lyrics by Nas lyrics"), "Nas");
    }

    #[test]
    fn test_normalize_text_composes_accents() {
        let decomposed = "Bjo\u{308}rk";
        assert_eq!(normalize_text(decomposed), "Bj\u{f6}rk");
    }

    #[test]
    fn test_grapheme_len() {
        assert_eq!(grapheme_len("abc"), 3);
        assert_eq!(grapheme_len("e\u{301}"), 1);
        assert_eq!(grapheme_len("👩‍👩‍👧"), 1);
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("  x "), Some("x".to_string()));
        assert_eq!(non_empty(" \n\t"), None);
    }

    proptest! {
        #[test]
        fn clean_song_title_is_idempotent(s in "[ a-zA-Z\\[\\]()]{0,40}") {
            let once = clean_song_title(&s);
            prop_assert_eq!(clean_song_title(&once), once);
        }

        #[test]
        fn clean_artist_name_is_idempotent(s in "(lyrics by |Lyrics | |[a-zA-Z]){0,20}") {
            let once = clean_artist_name(&s);
            prop_assert_eq!(clean_artist_name(&once), once);
        }
    }
}
