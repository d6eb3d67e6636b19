use image::RgbImage;
use image_hasher::{HashAlg, Hasher, HasherConfig, ImageHash};

/// Side of the hash grid; fingerprints carry `FINGERPRINT_SIDE²` bits.
pub const FINGERPRINT_SIDE: u32 = 8;

/// Perceptual fingerprint of one candidate.
///
/// Only meaningful relative to other fingerprints: visually similar images
/// sit a small Hamming distance apart, unrelated ones roughly half the bit
/// length apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint(ImageHash);

impl Fingerprint {
    /// Rebuild a fingerprint from its packed bits.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        ImageHash::from_bytes(bytes).ok().map(Self)
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Number of differing bits.
    pub fn distance(&self, other: &Fingerprint) -> u32 {
        self.0.dist(&other.0)
    }
}

/// pHash: the 8×8 lowest DCT frequencies, each compared against their median.
///
/// The median split sets about half the bits regardless of how bright the
/// image is, which keeps unrelated pictures far apart.
///
/// Built per curation call; nothing about it is shared between products.
pub fn fingerprint_hasher() -> Hasher {
    HasherConfig::new()
        .hash_size(FINGERPRINT_SIDE, FINGERPRINT_SIDE)
        .hash_alg(HashAlg::Median)
        .preproc_dct()
        .to_hasher()
}

pub fn fingerprint(hasher: &Hasher, pixels: &RgbImage) -> Fingerprint {
    Fingerprint(hasher.hash_image(pixels))
}
