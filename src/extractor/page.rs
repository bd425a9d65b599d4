use crate::api_client::ApiError;
use reqwest::{Client, Url};

/// The visited page as the extractor sees it: its address, its markup and whatever the user
/// currently has selected.
#[derive(Debug, Clone)]
pub struct Page {
    url: String,
    hostname: String,
    html: String,
    selection: String,
}

impl Page {
    pub fn new(url: impl Into<String>, html: impl Into<String>, selection: impl Into<String>) -> Self {
        let url = url.into();
        let hostname = Url::parse(&url)
            .ok()
            .and_then(|parsed| parsed.host_str().map(str::to_lowercase))
            .unwrap_or_default();

        Self {
            url,
            hostname,
            html: html.into(),
            selection: selection.into(),
        }
    }

    /// Downloads a page to extract from.
    pub async fn fetch(client: &Client, url: &str, selection: &str) -> Result<Self, ApiError> {
        let response = client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::StatusError {
                code: status.as_u16(),
            });
        }

        let html = response.text().await?;
        Ok(Self::new(url, html, selection))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Lowercased host name, empty when the URL does not parse.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn selection(&self) -> &str {
        &self.selection
    }
}
