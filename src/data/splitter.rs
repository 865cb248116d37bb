// ============================================================
// Layer 4 — Train/Validation Splitter
// ============================================================
// Shuffles samples with a seeded RNG and holds out a fraction
// for validation.
//
// Sizing follows the usual test_size convention:
//   n_val = ceil(n * validation_fraction)
// capped so at least one sample is left for training whenever
// there are two or more samples. A 2-row corpus with fraction
// 0.1 therefore trains on one row and validates on the other.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle `samples` deterministically and split into (train, validation).
pub fn split_train_val<T>(
    mut samples:         Vec<T>,
    validation_fraction: f64,
    seed:                u64,
) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    let total = samples.len();
    let n_val = ((total as f64) * validation_fraction).ceil() as usize;
    let n_val = n_val.min(total.saturating_sub(1));

    // split_off(n) keeps [0..n) and returns [n..total)
    let val = samples.split_off(total - n_val);

    tracing::debug!(
        "Dataset split: {} training, {} validation",
        samples.len(),
        val.len(),
    );

    (samples, val)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ten_percent_split() {
        let items: Vec<usize> = (0..100).collect();
        let (train, val)      = split_train_val(items, 0.1, 7);
        assert_eq!(train.len(), 90);
        assert_eq!(val.len(),   10);
    }

    #[test]
    fn test_rounds_validation_up() {
        let items: Vec<usize> = (0..15).collect();
        let (train, val)      = split_train_val(items, 0.1, 7);
        assert_eq!(val.len(), 2);
        assert_eq!(train.len(), 13);
    }

    #[test]
    fn test_two_rows_split_one_and_one() {
        let (train, val) = split_train_val(vec!['a', 'b'], 0.1, 0);
        assert_eq!(train.len(), 1);
        assert_eq!(val.len(), 1);
    }

    #[test]
    fn test_single_row_stays_in_training() {
        let (train, val) = split_train_val(vec![1], 0.5, 0);
        assert_eq!(train, vec![1]);
        assert!(val.is_empty());
    }

    #[test]
    fn test_empty_dataset() {
        let (train, val) = split_train_val(Vec::<usize>::new(), 0.1, 0);
        assert!(train.is_empty());
        assert!(val.is_empty());
    }

    #[test]
    fn test_same_seed_same_split() {
        let a = split_train_val((0..50).collect::<Vec<_>>(), 0.2, 42);
        let b = split_train_val((0..50).collect::<Vec<_>>(), 0.2, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn test_all_items_preserved() {
        let (mut train, val) = split_train_val((0..30).collect::<Vec<usize>>(), 0.3, 1);
        train.extend(val);
        train.sort();
        assert_eq!(train, (0..30).collect::<Vec<_>>());
    }
}
