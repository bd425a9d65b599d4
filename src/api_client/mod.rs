mod api_error;
mod metadata;
mod translation;

pub use api_error::ApiError;
pub use metadata::*;
pub use translation::*;

use crate::configuration::ApiSettings;
use crate::models::{SongMetadata, TranslationRequest};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));

/// The HTTP client used for the backend and for downloading pages.
pub fn http_client() -> Result<Client, ApiError> {
    Ok(Client::builder().user_agent(USER_AGENT).build()?)
}

/// The two calls the dispatcher makes to the translation backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LyricsApi: Send + Sync {
    async fn translate(&self, request: &TranslationRequest) -> Result<Value, ApiError>;

    async fn validate_metadata(&self, metadata: &SongMetadata) -> Result<SongMetadata, ApiError>;
}

/// `LyricsApi` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpLyricsApi {
    client: Client,
    base_url: String,
}

impl HttpLyricsApi {
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        Ok(Self::with_client(http_client()?, &settings.api_base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }
}

#[async_trait]
impl LyricsApi for HttpLyricsApi {
    async fn translate(&self, request: &TranslationRequest) -> Result<Value, ApiError> {
        fetch_translation(&self.client, &self.base_url, request).await
    }

    async fn validate_metadata(&self, metadata: &SongMetadata) -> Result<SongMetadata, ApiError> {
        validate_metadata(&self.client, &self.base_url, metadata).await
    }
}
