//! Curates small, visually consistent product photo sets from noisy,
//! web-scraped candidate images.
//!
//! The [`CurationEngine`] is pure: raw candidate bytes in, re-encoded
//! best-first JPEGs out. The `source`, `store` and `seed` modules wrap it
//! with CSV manifests, HTTP fetching and on-disk persistence.

pub mod config;
pub mod core;
pub mod error;
pub mod seed;
pub mod source;
pub mod store;

pub use config::{CurationConfig, SelectionBounds};
pub use crate::core::{Curation, CurationEngine, EncodedImage, RejectReason, Rejection};
pub use error::{ConfigError, CurateError, FetchError, ManifestError, StoreError};
pub use seed::Seeder;
pub use store::{ProductStore, SeedRecord, SeedStatus};
