// ============================================================
// Layer 4 — Word Tokenizer
// ============================================================
// Lower-cases and splits on whitespace. Nothing else:
// punctuation stays attached and there is no stemming.
// Languages without spaces between words must be segmented
// before they reach this point.

/// Split `text` into lower-cased whitespace-delimited tokens.
pub fn tokenize(text: impl AsRef<str>) -> Vec<String> {
    text.as_ref()
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
