use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },

    #[error("Could not read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures that abort a single curation call.
///
/// Per-candidate problems (undecodable, undersized, unencodable) are not
/// errors; they show up as rejections on the returned curation.
#[derive(Debug, Error)]
pub enum CurateError {
    #[error("Invalid curation settings: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Row {row}: missing category or index")]
    MissingKey { row: usize },

    #[error("Row {row}: unknown mode '{mode}', expected 'urls' or 'scrape'")]
    UnknownMode { row: usize, mode: String },

    #[error("Row {row}: scrape mode without product_page_url")]
    MissingPageUrl { row: usize },

    #[error("Row {row}: no candidate image URLs found")]
    NoUrls { row: usize },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid URL {url}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
