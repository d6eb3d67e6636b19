use crate::config::CurationConfig;
use crate::core::fingerprint::{Fingerprint, fingerprint};
use crate::core::scoring::QualityKey;
use image::RgbImage;
use image_hasher::Hasher;
use serde::Serialize;

/// A candidate that decoded cleanly and cleared the resolution gate.
///
/// Lives only for the duration of one curation call.
#[derive(Debug, Clone)]
pub struct CandidateImage {
    /// Position of the blob in the caller's candidate list.
    pub source_index: usize,
    pub pixels: RgbImage,
    pub fingerprint: Fingerprint,
    pub quality: QualityKey,
}

impl CandidateImage {
    pub fn new(
        source_index: usize,
        pixels: RgbImage,
        hasher: &Hasher,
        config: &CurationConfig,
    ) -> Self {
        let fingerprint = fingerprint(hasher, &pixels);
        let quality = QualityKey::measure(pixels.width(), pixels.height(), config);
        Self {
            source_index,
            pixels,
            fingerprint,
            quality,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Why a candidate did not make it into the pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectReason {
    Undecodable { message: String },
    BelowResolution { width: u32, height: u32 },
    Outlier { median: u32 },
    Unencodable { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub source_index: usize,
    #[serde(flatten)]
    pub reason: RejectReason,
}
