//! Candidate curation: decode, gate, fingerprint, cluster, rank, select, encode.

pub mod candidate;
pub mod cluster;
pub mod decode;
pub mod encode;
pub mod engine;
pub mod fingerprint;
pub mod scoring;
pub mod select;

pub use candidate::{CandidateImage, RejectReason, Rejection};
pub use engine::{Curation, CurationEngine, EncodedImage};
pub use fingerprint::Fingerprint;
pub use scoring::QualityKey;
