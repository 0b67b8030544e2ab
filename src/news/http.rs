//! HTTP implementation of [`NewsApi`].
//!
//! Issues `GET {base}/api/news?page={p}&limit=20` (or the feed's own path)
//! and decodes the JSON body.  A body that does not decode is reported as an
//! error in full; a page is never partially applied.

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;
use url::Url;

use super::{Category, NewsApi, NewsPage, PAGE_SIZE};

/// Why a page could not be loaded.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server answered {0}")]
    Status(StatusCode),
    #[error("malformed listing: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("bad listing url: {0}")]
    Url(#[from] url::ParseError),
}

/// Listing client backed by [`reqwest`].
pub struct HttpNewsApi {
    client: reqwest::Client,
    base: Url,
}

impl HttpNewsApi {
    /// Create a client rooted at `base` (e.g. `http://localhost:8000/`).
    pub fn new(client: reqwest::Client, mut base: Url) -> Self {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self { client, base }
    }

    /// The full listing URL for one page of `category`.
    pub fn page_url(&self, category: &Category, page: u32) -> Result<Url, FetchError> {
        let mut url = self.base.join(&category.listing_path())?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("limit", &PAGE_SIZE.to_string());
        Ok(url)
    }
}

#[async_trait]
impl NewsApi for HttpNewsApi {
    async fn fetch_page(&self, category: &Category, page: u32) -> Result<NewsPage, FetchError> {
        let url = self.page_url(category, page)?;
        debug!(%url, "requesting page");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
