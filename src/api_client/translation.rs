//! Client for the translation endpoint.
//!
//! The response is relayed to the panel untouched; interpreting `translated_lyrics` is the
//! panel's job, since the endpoint may return it either as a mapping or as an encoded string.

use crate::api_client::ApiError;
use crate::models::TranslationRequest;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

pub const TRANSLATE_PATH: &str = "/api/translation/translate";

/// Body of a translation call. Missing metadata fields are sent as empty strings.
#[derive(Debug, Serialize)]
struct TranslationPayload<'a> {
    direct_lyrics: &'a str,
    translate_to: &'a str,
    song_title: &'a str,
    artist_name: &'a str,
    album: &'a str,
    release_year: &'a str,
    page_url: &'a str,
    bypass_db: bool,
}

impl<'a> From<&'a TranslationRequest> for TranslationPayload<'a> {
    fn from(request: &'a TranslationRequest) -> Self {
        Self {
            direct_lyrics: &request.text,
            translate_to: &request.target_language_code,
            song_title: request.metadata.title_or_empty(),
            artist_name: request.metadata.artist_or_empty(),
            album: request.metadata.album_or_empty(),
            release_year: request.metadata.release_year_or_empty(),
            page_url: &request.page_url,
            bypass_db: true,
        }
    }
}

/// Posts a translation request and returns the raw response body.
///
/// Single attempt: any transport failure or non-2xx status is returned as an error and never
/// retried.
///
/// # Arguments
///
/// * `client` - An HTTP client for making requests.
/// * `base_url` - Base URL of the translation backend, without trailing path.
/// * `request` - The lyrics, target language and song context.
pub async fn fetch_translation(
    client: &Client,
    base_url: &str,
    request: &TranslationRequest,
) -> Result<Value, ApiError> {
    let url = format!("{}{}", base_url.trim_end_matches('/'), TRANSLATE_PATH);
    let payload = TranslationPayload::from(request);

    log::debug!(
        "Requesting {} translation of {} bytes from {}",
        request.target_language_code,
        request.text.len(),
        url
    );

    let response = client.post(&url).json(&payload).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::StatusError {
            code: status.as_u16(),
        });
    }

    Ok(response.json::<Value>().await?)
}
