//! Where candidate blobs come from: CSV manifests, product pages, HTTP.

pub mod fetch;
pub mod gallery;
pub mod manifest;

pub use fetch::{DEFAULT_CANDIDATE_LIMIT, Fetcher};
pub use gallery::extract_image_urls;
pub use manifest::{CandidateSource, ProductJob, read_manifest};
