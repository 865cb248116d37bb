// ============================================================
// Layer 3 — QuestionPair Domain Type
// ============================================================
// One labelled row of the corpus: two raw questions and a
// binary flag saying whether they ask the same thing.
//
// Example (already word-segmented upstream):
//   question1:    "借 呗 还款 信息"
//   question2:    "借 呗 还款 日期"
//   is_duplicate: 0
//
// The text is kept raw here; tokenisation happens in Layer 4.

use serde::{Deserialize, Serialize};

/// A labelled question pair as read from the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionPair {
    /// The left-hand question
    pub question1: String,

    /// The right-hand question
    pub question2: String,

    /// 1 when the two questions are duplicates, 0 otherwise
    pub is_duplicate: u8,
}

impl QuestionPair {
    pub fn new(
        question1:    impl Into<String>,
        question2:    impl Into<String>,
        is_duplicate: u8,
    ) -> Self {
        Self {
            question1: question1.into(),
            question2: question2.into(),
            is_duplicate,
        }
    }

    /// The label as a float target for the regression-style loss
    pub fn target(&self) -> f32 {
        if self.is_duplicate > 0 { 1.0 } else { 0.0 }
    }
}
