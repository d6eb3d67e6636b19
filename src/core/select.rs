use crate::config::SelectionBounds;

/// Cut a best-first list down to the requested count.
///
/// The first `max` items are taken. If that is fewer than `min`, the same
/// list is re-sliced to `min`; since `min <= max` this can only happen when
/// the list itself is shorter than `min`, so nothing is ever invented.
pub fn bounded<T>(mut ranked: Vec<T>, bounds: SelectionBounds) -> Vec<T> {
    let primary = ranked.len().min(bounds.max);
    let take = if primary < bounds.min {
        ranked.len().min(bounds.min)
    } else {
        primary
    };
    ranked.truncate(take);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(min: usize, max: usize) -> SelectionBounds {
        SelectionBounds::new(min, max).unwrap()
    }

    #[test]
    fn test_takes_first_max() {
        let picked = bounded((1..=8).collect(), bounds(3, 5));
        assert_eq!(picked, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_length_is_min_of_max_and_pool() {
        for pool in 3..10usize {
            let picked = bounded((0..pool).collect::<Vec<_>>(), bounds(3, 5));
            assert_eq!(picked.len(), pool.min(5));
        }
    }

    #[test]
    fn test_short_pool_is_returned_whole() {
        assert_eq!(bounded(vec!['a', 'b'], bounds(3, 5)), vec!['a', 'b']);
        assert!(bounded(Vec::<u8>::new(), bounds(3, 5)).is_empty());
    }

    #[test]
    fn test_exact_bounds() {
        assert_eq!(bounded(vec![1, 2, 3, 4], bounds(4, 4)), vec![1, 2, 3, 4]);
    }
}
