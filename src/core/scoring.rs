use crate::config::CurationConfig;
use std::cmp::Ordering;

/// Sortable quality of a retained image.
///
/// Compares greater when the image is the better pick: more pixels first,
/// then the longer short side, then the smaller aspect penalty.
#[derive(Debug, Clone, Copy)]
pub struct QualityKey {
    pub area: u64,
    pub short_side: u32,
    pub aspect_penalty: f64,
}

impl QualityKey {
    pub fn measure(width: u32, height: u32, config: &CurationConfig) -> Self {
        let aspect = if height == 0 {
            0.0
        } else {
            width as f64 / height as f64
        };
        let aspect_penalty = if aspect < config.aspect_min || aspect > config.aspect_max {
            config.aspect_penalty
        } else {
            0.0
        };

        Self {
            area: width as u64 * height as u64,
            short_side: width.min(height),
            aspect_penalty,
        }
    }
}

impl Ord for QualityKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.area
            .cmp(&other.area)
            .then(self.short_side.cmp(&other.short_side))
            .then(other.aspect_penalty.total_cmp(&self.aspect_penalty))
    }
}

impl PartialOrd for QualityKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QualityKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QualityKey {}

/// Sort best-first. Items with equal keys keep their input order.
pub fn rank_by_quality<T>(items: &mut [T], key: impl Fn(&T) -> QualityKey) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}
