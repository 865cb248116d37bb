// ============================================================
// Layer 5 — Manhattan Similarity
// ============================================================
// sim(a, b) = exp(-Σ_i |a_i - b_i|)
//
//   identical vectors      → exactly 1.0
//   L1 distance d > 0      → exp(-d), strictly decreasing in d
//   two all-zero vectors   → 1.0 (fully padded pairs look identical)
//
// No learned parameters, so it is a plain function rather than
// a Module; the saved record needs nothing extra to reload it.

use burn::prelude::*;

/// [batch, width] × [batch, width] → [batch, 1]
pub fn manhattan_similarity<B: Backend>(left: Tensor<B, 2>, right: Tensor<B, 2>) -> Tensor<B, 2> {
    (left - right).abs().sum_dim(1).neg().exp()
}
