use async_trait::async_trait;
use reqwest::header::HeaderMap;
use url::Url;

use crate::fetcher::{FetchError, fetch_with_headers};

/// Supplies the raw HTML of listing page `page` (1-based).
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, page: u32) -> Result<String, FetchError>;
}

/// Fetches listing pages over HTTP by setting a page number query parameter.
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    listing_url: Url,
    page_param: String,
    headers: HeaderMap,
}

impl HttpPageSource {
    pub fn new(listing_url: Url, page_param: impl Into<String>) -> Self {
        Self {
            listing_url,
            page_param: page_param.into(),
            headers: HeaderMap::new(),
        }
    }

    /// Extra request headers sent with every page fetch.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// The listing URL with the page parameter set to `page`, replacing any
    /// value already present.
    pub fn page_url(&self, page: u32) -> Url {
        let kept: Vec<(String, String)> = self
            .listing_url
            .query_pairs()
            .filter(|(key, _)| *key != self.page_param)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        let mut url = self.listing_url.clone();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair(&self.page_param, &page.to_string());
        url
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(&self, page: u32) -> Result<String, FetchError> {
        let response = fetch_with_headers(self.page_url(page).as_str(), &self.headers).await?;
        Ok(response.body_utf8)
    }
}
