use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Row indices of the train and test partitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Number of test rows for `n` rows: `ceil(n * test_fraction)`, leaving both sides
/// non-empty whenever `n >= 2`.
pub fn test_len(n: usize, test_fraction: f64) -> usize {
    if n < 2 {
        return 0;
    }
    let raw = (n as f64 * test_fraction).ceil() as usize;
    raw.clamp(1, n - 1)
}

/// Seeded shuffle of `0..n`; the first `test_len` shuffled indices form the test set.
pub fn train_test_split(n: usize, test_fraction: f64, seed: u64) -> TrainTestSplit {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    let train = indices.split_off(test_len(n, test_fraction));
    TrainTestSplit {
        train,
        test: indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_follow_ceiling_rule() {
        assert_eq!(test_len(10, 0.2), 2);
        assert_eq!(test_len(11, 0.2), 3);
        assert_eq!(test_len(5, 0.2), 1);
        assert_eq!(test_len(2, 0.5), 1);
        assert_eq!(test_len(1, 0.2), 0);
    }

    #[test]
    fn partitions_cover_all_rows_once() {
        let split = train_test_split(23, 0.2, 9);
        assert_eq!(split.test.len(), 5);
        assert_eq!(split.train.len(), 18);
        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..23).collect::<Vec<_>>());
    }

    #[test]
    fn seed_controls_assignment() {
        assert_eq!(train_test_split(50, 0.2, 0), train_test_split(50, 0.2, 0));
        assert_ne!(train_test_split(50, 0.2, 0), train_test_split(50, 0.2, 1));
    }
}
