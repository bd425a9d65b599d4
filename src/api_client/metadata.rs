//! Client for the metadata validation endpoint.
//!
//! The backend checks scraped song information and may answer with corrected fields.
//! Corrections are merged over the scraped values; fields the backend leaves out keep their
//! scraped value.

use crate::api_client::ApiError;
use crate::models::{Confidence, SongMetadata};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const VALIDATE_PATH: &str = "/api/metadata/validate";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MetadataFields<'a> {
    song_title: &'a str,
    artist_name: &'a str,
    album: &'a str,
    release_year: &'a str,
}

#[derive(Debug, Serialize)]
struct ValidationPayload<'a> {
    metadata: MetadataFields<'a>,
    source: &'a str,
    url: &'a str,
    confidence: &'a str,
}

impl<'a> From<&'a SongMetadata> for ValidationPayload<'a> {
    fn from(metadata: &'a SongMetadata) -> Self {
        Self {
            metadata: MetadataFields {
                song_title: metadata.title_or_empty(),
                artist_name: metadata.artist_or_empty(),
                album: metadata.album_or_empty(),
                release_year: metadata.release_year_or_empty(),
            },
            source: &metadata.source,
            url: &metadata.url,
            confidence: metadata
                .confidence
                .unwrap_or(Confidence::Medium)
                .as_str(),
        }
    }
}

/// Fields the validation endpoint may correct.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedMetadata {
    #[serde(default)]
    pub song_title: Option<String>,
    #[serde(default)]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub release_year: Option<String>,
    /// Either a list of names or a single comma separated string.
    #[serde(default)]
    pub genres: Option<Value>,
}

impl ValidatedMetadata {
    fn genre_list(&self) -> Vec<String> {
        match &self.genres {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|genre| !genre.is_empty())
                .map(str::to_string)
                .collect(),
            Some(Value::String(joined)) => joined
                .split(',')
                .map(str::trim)
                .filter(|genre| !genre.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Posts scraped metadata to the validation endpoint and merges the answer.
///
/// # Returns
///
/// The merged metadata, marked as validated with high confidence. A non-2xx status or a
/// transport error is returned as `ApiError`; the caller decides to keep the original.
pub async fn validate_metadata(
    client: &Client,
    base_url: &str,
    metadata: &SongMetadata,
) -> Result<SongMetadata, ApiError> {
    let url = format!("{}{}", base_url.trim_end_matches('/'), VALIDATE_PATH);

    let response = client
        .post(&url)
        .json(&ValidationPayload::from(metadata))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::StatusError {
            code: status.as_u16(),
        });
    }

    let validated: ValidatedMetadata = response.json().await?;
    Ok(merge_validated(metadata, &validated))
}

/// Combines scraped and validated metadata, the validated value taking precedence whenever
/// it is non-empty.
pub fn merge_validated(original: &SongMetadata, validated: &ValidatedMetadata) -> SongMetadata {
    fn pick(validated: &Option<String>, original: &Option<String>) -> Option<String> {
        validated
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .or_else(|| original.clone())
    }

    let genres = validated.genre_list();

    SongMetadata {
        song_title: pick(&validated.song_title, &original.song_title),
        artist_name: pick(&validated.artist_name, &original.artist_name),
        album: pick(&validated.album, &original.album),
        release_year: pick(&validated.release_year, &original.release_year),
        genres: if genres.is_empty() {
            original.genres.clone()
        } else {
            genres
        },
        confidence: Some(Confidence::High),
        validated_by_llm: true,
        ..original.clone()
    }
}

/// Whether validation changed any of the fields that identify the song.
pub fn identity_changed(original: &SongMetadata, enhanced: &SongMetadata) -> bool {
    original.song_title != enhanced.song_title
        || original.artist_name != enhanced.artist_name
        || original.album != enhanced.album
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{request_body, serve_once, test_client};
    use serde_json::json;

    fn scraped() -> SongMetadata {
        let mut metadata = SongMetadata::new("generic", "https://lyrics.example/hallelujah");
        metadata.song_title = Some("Halleluja".to_string());
        metadata.artist_name = Some("Leonard Cohen".to_string());
        metadata.confidence = Some(Confidence::Medium);
        metadata
    }

    #[test]
    fn test_payload_shape() {
        let mut metadata = scraped();
        metadata.confidence = None;

        let payload = serde_json::to_value(ValidationPayload::from(&metadata)).unwrap();
        assert_eq!(
            payload,
            json!({
                "metadata": {
                    "songTitle": "Halleluja",
                    "artistName": "Leonard Cohen",
                    "album": "",
                    "releaseYear": ""
                },
                "source": "generic",
                "url": "https://lyrics.example/hallelujah",
                "confidence": "medium"
            })
        );
    }

    #[test]
    fn test_merge_prefers_non_empty_validated_values() {
        let validated = ValidatedMetadata {
            song_title: Some("Hallelujah".to_string()),
            artist_name: Some("".to_string()),
            album: Some("Various Positions".to_string()),
            release_year: None,
            genres: Some(json!(["Folk", "Singer-songwriter"])),
        };

        let merged = merge_validated(&scraped(), &validated);
        assert_eq!(merged.song_title.as_deref(), Some("Hallelujah"));
        assert_eq!(merged.artist_name.as_deref(), Some("Leonard Cohen"));
        assert_eq!(merged.album.as_deref(), Some("Various Positions"));
        assert_eq!(merged.release_year, None);
        assert_eq!(merged.genres, vec!["Folk", "Singer-songwriter"]);
        assert_eq!(merged.confidence, Some(Confidence::High));
        assert!(merged.validated_by_llm);
        assert_eq!(merged.url, "https://lyrics.example/hallelujah");
    }

    #[test]
    fn test_genres_as_joined_string() {
        let validated = ValidatedMetadata {
            genres: Some(json!("Folk, Rock")),
            ..Default::default()
        };
        assert_eq!(validated.genre_list(), vec!["Folk", "Rock"]);
    }

    #[test]
    fn test_identity_changed() {
        let original = scraped();

        let mut same = original.clone();
        same.validated_by_llm = true;
        same.release_year = Some("1984".to_string());
        assert!(!identity_changed(&original, &same));

        let mut retitled = original.clone();
        retitled.song_title = Some("Hallelujah".to_string());
        assert!(identity_changed(&original, &retitled));

        let mut with_album = original.clone();
        with_album.album = Some("Various Positions".to_string());
        assert!(identity_changed(&original, &with_album));
    }

    #[tokio::test]
    async fn test_validate_metadata_round_trip() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"songTitle":"Hallelujah","releaseYear":"1984","genres":["Folk"]}"#,
        )
        .await;

        let merged = validate_metadata(&test_client(), &base_url, &scraped())
            .await
            .unwrap();
        assert_eq!(merged.song_title.as_deref(), Some("Hallelujah"));
        assert_eq!(merged.release_year.as_deref(), Some("1984"));

        let raw_request = server.await.unwrap();
        assert!(raw_request.starts_with("POST /api/metadata/validate"));
        assert_eq!(
            request_body(&raw_request)["metadata"]["songTitle"],
            "Halleluja"
        );
    }

    #[tokio::test]
    async fn test_validate_metadata_error_status() {
        let (base_url, _server) = serve_once("503 Service Unavailable", "{}").await;

        let result = validate_metadata(&test_client(), &base_url, &scraped()).await;
        assert!(matches!(result, Err(ApiError::StatusError { code: 503 })));
    }
}
