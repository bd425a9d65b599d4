use crate::extractor::document::Document;
use crate::foundation::utils::non_empty;
use serde_json::Value;

/// Fills `title` and `artist` from embedded JSON-LD blocks of one of `schema_types`.
///
/// Only fields that are still `None` are written. Returns the schema type of every block that
/// contributed a value.
pub fn fill_from_structured_data(
    document: &Document,
    schema_types: &[&str],
    title: &mut Option<String>,
    artist: &mut Option<String>,
) -> Vec<String> {
    let mut contributed = Vec::new();

    for block in document.structured_data() {
        if title.is_some() && artist.is_some() {
            break;
        }

        let Some(schema_type) = matching_type(&block, schema_types) else {
            continue;
        };

        let mut used = false;
        if title.is_none() {
            if let Some(name) = block["name"].as_str().and_then(non_empty) {
                *title = Some(name);
                used = true;
            }
        }
        if artist.is_none() {
            if let Some(name) = artist_name(&block["byArtist"]) {
                *artist = Some(name);
                used = true;
            }
        }

        if used {
            contributed.push(schema_type);
        }
    }

    contributed
}

/// Schema types of every block that matches `schema_types`, in document order.
pub fn matching_types(document: &Document, schema_types: &[&str]) -> Vec<String> {
    document
        .structured_data()
        .iter()
        .filter_map(|block| matching_type(block, schema_types))
        .collect()
}

fn matching_type(block: &Value, schema_types: &[&str]) -> Option<String> {
    let declared: Vec<&str> = match &block["@type"] {
        Value::String(single) => vec![single.as_str()],
        Value::Array(many) => many.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    };

    declared
        .into_iter()
        .find(|declared| schema_types.contains(declared))
        .map(str::to_string)
}

fn artist_name(by_artist: &Value) -> Option<String> {
    match by_artist {
        Value::Object(_) => by_artist["name"].as_str().and_then(non_empty),
        Value::Array(artists) => artists.iter().find_map(artist_name),
        Value::String(name) => non_empty(name),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with(blocks: &[&str]) -> Document {
        let scripts: String = blocks
            .iter()
            .map(|block| format!(r#"<script type="application/ld+json">{}</script>"#, block))
            .collect();
        Document::parse(&format!("<html><head>{}</head><body></body></html>", scripts))
    }

    #[test]
    fn test_fills_only_missing_fields() {
        let document = page_with(&[
            r#"{"@type": "MusicRecording", "name": "Jolene", "byArtist": {"name": "Dolly Parton"}}"#,
        ]);

        let mut title = Some("Already Set".to_string());
        let mut artist = None;
        let contributed =
            fill_from_structured_data(&document, &["MusicRecording"], &mut title, &mut artist);

        assert_eq!(title.as_deref(), Some("Already Set"));
        assert_eq!(artist.as_deref(), Some("Dolly Parton"));
        assert_eq!(contributed, vec!["MusicRecording"]);
    }

    #[test]
    fn test_ignores_unrecognized_types_and_bad_json() {
        let document = page_with(&[
            r#"{"@type": "Organization", "name": "Lyrics Inc"}"#,
            r#"{"@type": "MusicRecording", "name": "#,
            r#"{"@type": ["Thing", "MusicRecording"], "name": "Jolene", "byArtist": [{"@type": "MusicGroup", "name": "Dolly Parton"}]}"#,
        ]);

        let mut title = None;
        let mut artist = None;
        fill_from_structured_data(&document, &["MusicRecording"], &mut title, &mut artist);

        assert_eq!(title.as_deref(), Some("Jolene"));
        assert_eq!(artist.as_deref(), Some("Dolly Parton"));
    }

    #[test]
    fn test_no_blocks() {
        let document = page_with(&[]);
        let mut title = None;
        let mut artist = None;
        let contributed =
            fill_from_structured_data(&document, &["MusicRecording"], &mut title, &mut artist);

        assert!(contributed.is_empty());
        assert!(title.is_none() && artist.is_none());
    }
}
