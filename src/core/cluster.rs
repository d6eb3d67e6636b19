use crate::core::fingerprint::Fingerprint;

/// Whether one image belongs to the pool's visual cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterDecision {
    /// Median distance to the rest of the pool; `None` when the pool is too
    /// small to judge.
    pub median: Option<u32>,
    pub keep: bool,
}

impl ClusterDecision {
    fn undecided() -> Self {
        Self {
            median: None,
            keep: true,
        }
    }
}

/// Judge each fingerprint against the rest of the pool.
///
/// An image stays when the median of its distances to every other image is
/// at most `threshold`. Pools of one or two images are kept whole. For an
/// even number of distances the element at index `len / 2` of the sorted
/// list is used.
pub fn consistency(fingerprints: &[Fingerprint], threshold: u32) -> Vec<ClusterDecision> {
    if fingerprints.len() <= 2 {
        return vec![ClusterDecision::undecided(); fingerprints.len()];
    }

    fingerprints
        .iter()
        .enumerate()
        .map(|(i, fingerprint)| {
            let mut distances: Vec<u32> = fingerprints
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, other)| fingerprint.distance(other))
                .collect();
            distances.sort_unstable();

            let median = distances[distances.len() / 2];
            ClusterDecision {
                median: Some(median),
                keep: median <= threshold,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fingerprint whose lowest `bits` bits are set.
    fn low_bits(bits: u32) -> Fingerprint {
        let value = if bits == 64 { u64::MAX } else { (1u64 << bits) - 1 };
        Fingerprint::from_bytes(&value.to_be_bytes()).unwrap()
    }

    #[test]
    fn test_small_pools_are_kept_whole() {
        assert!(consistency(&[], 18).is_empty());

        let single = consistency(&[low_bits(0)], 18);
        assert_eq!(single, vec![ClusterDecision::undecided()]);

        let pair = consistency(&[low_bits(0), low_bits(64)], 18);
        assert!(pair.iter().all(|d| d.keep && d.median.is_none()));
    }

    #[test]
    fn test_far_image_is_dropped() {
        let pool = [low_bits(0), low_bits(3), low_bits(64), low_bits(5)];
        let decisions = consistency(&pool, 18);

        let kept: Vec<bool> = decisions.iter().map(|d| d.keep).collect();
        assert_eq!(kept, vec![true, true, false, true]);
        assert_eq!(decisions[2].median, Some(61));
    }

    #[test]
    fn test_minority_of_outliers_is_tolerated() {
        let pool = [
            low_bits(0),
            low_bits(2),
            low_bits(4),
            low_bits(6),
            low_bits(64),
        ];
        let decisions = consistency(&pool, 18);
        assert_eq!(decisions.iter().filter(|d| d.keep).count(), 4);
        assert!(!decisions[4].keep);
    }

    #[test]
    fn test_even_distance_count_uses_upper_middle() {
        // Distances from the first image: [0, 10, 20, 30].
        let pool = [low_bits(0), low_bits(0), low_bits(10), low_bits(20), low_bits(30)];
        let decisions = consistency(&pool, 18);

        assert_eq!(decisions[0].median, Some(20));
        assert!(!decisions[0].keep);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let pool = [low_bits(0), low_bits(18), low_bits(36)];
        let decisions = consistency(&pool, 18);

        // Distances from the middle image are [18, 18].
        assert_eq!(decisions[1].median, Some(18));
        assert!(decisions[1].keep);
    }

    #[test]
    fn test_everything_rejected_when_pool_is_scattered() {
        let pool = [low_bits(0), low_bits(32), low_bits(64)];
        let decisions = consistency(&pool, 10);
        assert!(decisions.iter().all(|d| !d.keep));
    }
}
