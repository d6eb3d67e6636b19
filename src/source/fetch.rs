use crate::error::FetchError;
use crate::source::gallery::extract_image_urls;
use crate::source::manifest::{CandidateSource, ProductJob};
use log::{debug, warn};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use std::time::Duration;

const USER_AGENT: &str = "Mozilla/5.0 (+photo seeder)";
const ACCEPT_VALUE: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";
const TIMEOUT: Duration = Duration::from_secs(20);

/// Default number of candidates fetched per product.
pub const DEFAULT_CANDIDATE_LIMIT: usize = 12;

/// Blocking HTTP access for product pages and candidate images.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(TIMEOUT)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }

    /// Download a URL; non-2xx responses are errors.
    pub fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let request_error = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };
        let response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(request_error)?;
        let bytes = response.bytes().map_err(request_error)?;
        Ok(bytes.to_vec())
    }

    /// Candidate image URLs from a product page, best size hint first.
    pub fn scrape_gallery(&self, page_url: &str) -> Result<Vec<String>, FetchError> {
        url::Url::parse(page_url).map_err(|source| FetchError::Url {
            url: page_url.to_string(),
            source,
        })?;
        let html = self
            .client
            .get(page_url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
            .map_err(|source| FetchError::Request {
                url: page_url.to_string(),
                source,
            })?;
        Ok(extract_image_urls(page_url, &html))
    }

    /// Resolve a job's candidate URLs.
    pub fn candidate_urls(&self, job: &ProductJob) -> Result<Vec<String>, FetchError> {
        match &job.source {
            CandidateSource::Urls(urls) => Ok(urls.clone()),
            CandidateSource::Scrape(page) => self.scrape_gallery(page),
        }
    }

    /// Download up to `limit` candidates in order, skipping failures.
    pub fn collect_candidates(&self, urls: &[String], limit: usize) -> Vec<Vec<u8>> {
        urls.iter()
            .take(limit)
            .filter_map(|url| match self.fetch_bytes(url) {
                Ok(bytes) => {
                    debug!("Fetched {} ({} bytes)", url, bytes.len());
                    Some(bytes)
                }
                Err(err) => {
                    warn!("Download failed: {}", err);
                    None
                }
            })
            .filter(|bytes| !bytes.is_empty())
            .collect()
    }
}
