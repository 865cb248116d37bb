// ============================================================
// Layer 4 — Sequence Padder
// ============================================================
// Brings every id sequence to exactly `max_len`:
//
//   too long  → drop tokens from the END   ("post" truncation)
//   too short → add PAD_ID at the START    ("pre" padding)
//
//   max_len = 5:  [5, 7]          → [0, 0, 0, 5, 7]
//   max_len = 3:  [5, 7, 9, 11]   → [5, 7, 9]
//
// Padding at the start keeps real tokens adjacent to the last
// recurrent step; truncating at the end keeps the opening words.

use crate::data::vocabulary::PAD_ID;

/// Pad or truncate a single sequence to `max_len`.
pub fn pad_sequence(ids: &[u32], max_len: usize) -> Vec<u32> {
    let kept = &ids[..ids.len().min(max_len)];
    let mut out = vec![PAD_ID; max_len - kept.len()];
    out.extend_from_slice(kept);
    out
}

/// Pad every sequence in `seqs`, preserving order.
pub fn pad_sequences(seqs: &[Vec<u32>], max_len: usize) -> Vec<Vec<u32>> {
    seqs.iter().map(|s| pad_sequence(s, max_len)).collect()
}
