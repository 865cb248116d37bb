// ============================================================
// Layer 4 — Padded Pair Dataset
// ============================================================
// A split (train or validation) after padding, checked once
// before any epoch runs, then exposed to Burn's DataLoader.

use anyhow::{ensure, Result};
use burn::data::dataset::Dataset;

use crate::data::{padding::pad_sequences, vocabulary::IndexedPair};

/// One padded training sample. Both sides have length max_seq_len.
#[derive(Debug, Clone)]
pub struct PairSample {
    pub left:  Vec<u32>,
    pub right: Vec<u32>,
    pub label: f32,
}

/// Column-oriented padded split: left rows, right rows and labels.
#[derive(Debug, Clone)]
pub struct PaddedSplit {
    pub left:    Vec<Vec<u32>>,
    pub right:   Vec<Vec<u32>>,
    pub labels:  Vec<f32>,
    pub max_len: usize,
}

impl PaddedSplit {
    /// Pad the left and right members of every pair independently.
    pub fn from_indexed(pairs: &[IndexedPair], max_len: usize) -> Self {
        let left:  Vec<Vec<u32>> = pairs.iter().map(|p| p.left.clone()).collect();
        let right: Vec<Vec<u32>> = pairs.iter().map(|p| p.right.clone()).collect();
        Self {
            left:    pad_sequences(&left, max_len),
            right:   pad_sequences(&right, max_len),
            labels:  pairs.iter().map(|p| p.label).collect(),
            max_len,
        }
    }

    /// Shape checks that must hold before training starts.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.left.len() == self.right.len(),
            "left/right row counts differ: {} vs {}",
            self.left.len(),
            self.right.len()
        );
        ensure!(
            self.labels.len() == self.left.len(),
            "label count {} does not match sample count {}",
            self.labels.len(),
            self.left.len()
        );
        for (row, (l, r)) in self.left.iter().zip(&self.right).enumerate() {
            ensure!(
                l.len() == self.max_len && r.len() == self.max_len,
                "row {} has shape ({}, {}), expected ({m}, {m})",
                row,
                l.len(),
                r.len(),
                m = self.max_len
            );
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Validate, then convert into a row-oriented Burn dataset.
    pub fn into_dataset(self) -> Result<PairDataset> {
        self.validate()?;
        let samples = self
            .left
            .into_iter()
            .zip(self.right)
            .zip(self.labels)
            .map(|((left, right), label)| PairSample { left, right, label })
            .collect();
        Ok(PairDataset::new(samples))
    }
}

pub struct PairDataset {
    samples: Vec<PairSample>,
}

impl PairDataset {
    pub fn new(samples: Vec<PairSample>) -> Self { Self { samples } }
}

impl Dataset<PairSample> for PairDataset {
    fn get(&self, index: usize) -> Option<PairSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(left: Vec<u32>, right: Vec<u32>, label: f32) -> IndexedPair {
        IndexedPair { left, right, label }
    }

    #[test]
    fn test_pads_both_sides() {
        let split = PaddedSplit::from_indexed(&[pair(vec![3], vec![4, 5, 6, 7], 1.0)], 3);
        assert_eq!(split.left[0], vec![0, 0, 3]);
        assert_eq!(split.right[0], vec![4, 5, 6]);
        assert!(split.validate().is_ok());
    }

    #[test]
    fn test_label_count_mismatch_is_rejected() {
        let mut split = PaddedSplit::from_indexed(&[pair(vec![1], vec![2], 0.0)], 2);
        split.labels.push(1.0);
        assert!(split.validate().is_err());
    }

    #[test]
    fn test_left_right_mismatch_is_rejected() {
        let mut split = PaddedSplit::from_indexed(&[pair(vec![1], vec![2], 0.0)], 2);
        split.right.push(vec![0, 0]);
        assert!(split.validate().is_err());
    }

    #[test]
    fn test_wrong_row_width_is_rejected() {
        let mut split = PaddedSplit::from_indexed(&[pair(vec![1], vec![2], 0.0)], 2);
        split.left[0] = vec![1, 2, 3];
        assert!(split.into_dataset().is_err());
    }

    #[test]
    fn test_dataset_preserves_rows() {
        let split = PaddedSplit::from_indexed(
            &[pair(vec![1], vec![2], 0.0), pair(vec![3], vec![4], 1.0)],
            2,
        );
        let ds = split.into_dataset().unwrap();
        assert_eq!(ds.len(), 2);
        let second = ds.get(1).unwrap();
        assert_eq!(second.left, vec![0, 3]);
        assert_eq!(second.label, 1.0);
        assert!(ds.get(2).is_none());
    }
}
