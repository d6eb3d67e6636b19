use crate::config::{CurationConfig, SelectionBounds};
use crate::core::candidate::{CandidateImage, RejectReason, Rejection};
use crate::core::cluster;
use crate::core::decode::{decode_normalized, passes_resolution_gate};
use crate::core::encode::encode_progressive_jpeg;
use crate::core::fingerprint::{Fingerprint, fingerprint_hasher};
use crate::core::scoring::rank_by_quality;
use crate::core::select;
use crate::error::{ConfigError, CurateError};
use log::{debug, warn};

/// One selected image, re-encoded and ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub source_index: usize,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

/// Outcome of one curation call.
#[derive(Debug, Clone, Default)]
pub struct Curation {
    /// Best first; position `i` is destined for `{i + 1}.jpg`.
    pub selected: Vec<EncodedImage>,
    /// Every dropped candidate, in input order.
    pub rejections: Vec<Rejection>,
}

impl Curation {
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

/// Turns one product's raw candidate blobs into a short, consistent,
/// best-first photo set.
///
/// Holds only configuration; every call is independent, so one engine can
/// be shared across threads that curate different products.
#[derive(Debug, Clone)]
pub struct CurationEngine {
    config: CurationConfig,
}

impl CurationEngine {
    pub fn new(config: CurationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Decode, gate, fingerprint, drop outliers, rank, bound and re-encode.
    ///
    /// Bad candidates never fail the call, even one that cannot be
    /// re-encoded; they are reported in [`Curation::rejections`]. An empty
    /// selection is a valid result.
    pub fn curate<B: AsRef<[u8]>>(
        &self,
        candidates: &[B],
        bounds: SelectionBounds,
    ) -> Result<Curation, CurateError> {
        let bounds = SelectionBounds::new(bounds.min, bounds.max)?;
        let mut rejections = Vec::new();

        let mut decoded = Vec::with_capacity(candidates.len());
        for (index, blob) in candidates.iter().enumerate() {
            match decode_normalized(blob.as_ref()) {
                Ok(pixels) => decoded.push((index, pixels)),
                Err(err) => {
                    warn!("Candidate {} could not be decoded: {}", index, err);
                    rejections.push(Rejection {
                        source_index: index,
                        reason: RejectReason::Undecodable {
                            message: err.to_string(),
                        },
                    });
                }
            }
        }

        let mut sized = Vec::with_capacity(decoded.len());
        for (index, pixels) in decoded {
            let (width, height) = pixels.dimensions();
            if passes_resolution_gate(width, height, self.config.min_short_side) {
                sized.push((index, pixels));
            } else {
                debug!("Candidate {} is too small ({}x{})", index, width, height);
                rejections.push(Rejection {
                    source_index: index,
                    reason: RejectReason::BelowResolution { width, height },
                });
            }
        }

        let hasher = fingerprint_hasher();
        let pool: Vec<CandidateImage> = sized
            .into_iter()
            .map(|(index, pixels)| CandidateImage::new(index, pixels, &hasher, &self.config))
            .collect();

        let fingerprints: Vec<Fingerprint> =
            pool.iter().map(|c| c.fingerprint.clone()).collect();
        let decisions = cluster::consistency(&fingerprints, self.config.cluster_threshold);

        let mut retained = Vec::with_capacity(pool.len());
        for (candidate, decision) in pool.into_iter().zip(decisions) {
            match decision.median {
                Some(median) if !decision.keep => {
                    debug!(
                        "Candidate {} is an outlier (median distance {})",
                        candidate.source_index, median
                    );
                    rejections.push(Rejection {
                        source_index: candidate.source_index,
                        reason: RejectReason::Outlier { median },
                    });
                }
                _ => retained.push(candidate),
            }
        }

        rank_by_quality(&mut retained, |c| c.quality);
        let chosen = select::bounded(retained, bounds);

        let mut selected = Vec::with_capacity(chosen.len());
        for candidate in chosen {
            match encode_progressive_jpeg(&candidate.pixels, self.config.jpeg_quality) {
                Ok(bytes) => selected.push(EncodedImage {
                    source_index: candidate.source_index,
                    width: candidate.width(),
                    height: candidate.height(),
                    bytes,
                }),
                Err(err) => {
                    warn!(
                        "Candidate {} could not be re-encoded: {}",
                        candidate.source_index, err
                    );
                    rejections.push(Rejection {
                        source_index: candidate.source_index,
                        reason: RejectReason::Unencodable {
                            message: err.to_string(),
                        },
                    });
                }
            }
        }

        rejections.sort_by_key(|r| r.source_index);
        Ok(Curation {
            selected,
            rejections,
        })
    }
}

impl Default for CurationEngine {
    fn default() -> Self {
        Self {
            config: CurationConfig::default(),
        }
    }
}
