// ============================================================
// Layer 6 — Pretrained Word Vectors
// ============================================================
// Loads a word2vec text-format file into memory and serves it
// through the EmbeddingSource trait.
//
// Format:
//   <count> <dim>                 ← optional header line
//   <token> <f1> <f2> ... <fdim>
//   ...
//
// Every vector must have exactly the configured embedding
// width; a short or long line is a fatal error.
//
// Only the first non-blank line can be a header. With dim == 1
// a line like `42 3` is also a valid row, so it is read as a
// header only when its declared width is 1.
//
// The store is read-only and is dropped as soon as the
// embedding matrix has been assembled.

use anyhow::{bail, ensure, Context, Result};
use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::domain::traits::EmbeddingSource;

#[derive(Debug)]
pub struct WordVectors {
    dim:     usize,
    vectors: HashMap<String, Vec<f32>>,
}

impl WordVectors {
    /// Read a word2vec text file whose vectors are `dim` wide.
    pub fn load(path: impl AsRef<Path>, dim: usize) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!("Loading word vectors from '{}' (this may take a few minutes) ...", path.display());

        let file = File::open(path)
            .with_context(|| format!("Cannot open word vectors '{}'", path.display()))?;
        let store = Self::from_reader(BufReader::new(file), dim)
            .with_context(|| format!("Invalid word vectors in '{}'", path.display()))?;

        tracing::info!("Loaded {} word vectors of width {}", store.len(), dim);
        Ok(store)
    }

    pub fn from_reader<R: BufRead>(reader: R, dim: usize) -> Result<Self> {
        let mut vectors   = HashMap::new();
        let mut seen_line = false;

        for (index, line) in reader.lines().enumerate() {
            let line  = line.with_context(|| format!("read error at line {}", index + 1))?;
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let first = !seen_line;
            seen_line = true;

            if first && parts.len() == 2 {
                let header = (parts[0].parse::<usize>(), parts[1].parse::<usize>());
                // with dim == 1, "<int> <int>" is also a valid one-wide row
                if let (Ok(_count), Ok(header_dim)) = header {
                    if dim != 1 || header_dim == 1 {
                        ensure!(
                            header_dim == dim,
                            "header declares width {}, expected {}",
                            header_dim,
                            dim
                        );
                        continue;
                    }
                }
            }

            let token  = parts[0];
            let values = parts[1..]
                .iter()
                .map(|v| v.parse::<f32>())
                .collect::<std::result::Result<Vec<f32>, _>>()
                .with_context(|| format!("bad number at line {}", index + 1))?;

            if values.len() != dim {
                bail!(
                    "vector for '{}' at line {} has width {}, expected {}",
                    token,
                    index + 1,
                    values.len(),
                    dim
                );
            }
            vectors.insert(token.to_string(), values);
        }

        Ok(Self { dim, vectors })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }
}

impl EmbeddingSource for WordVectors {
    fn dim(&self) -> usize {
        self.dim
    }

    fn vector(&self, token: &str) -> Option<&[f32]> {
        self.vectors.get(token).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parses_with_header() {
        let text = "2 3\n还款 0.1 0.2 0.3\npay 1 2 3\n";
        let wv   = WordVectors::from_reader(Cursor::new(text), 3).unwrap();

        assert_eq!(wv.len(), 2);
        assert_eq!(wv.vector("pay"), Some(&[1.0, 2.0, 3.0][..]));
        assert!(wv.contains("还款"));
        assert!(!wv.contains("missing"));
    }

    #[test]
    fn test_parses_without_header() {
        let wv = WordVectors::from_reader(Cursor::new("a 1 2\nb 3 4\n"), 2).unwrap();
        assert_eq!(wv.len(), 2);
        assert_eq!(wv.dim(), 2);
    }

    #[test]
    fn test_rejects_wrong_width() {
        let err = WordVectors::from_reader(Cursor::new("a 1 2 3\n"), 2).unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_header_after_blank_lines_is_skipped() {
        let wv = WordVectors::from_reader(Cursor::new("\n  \n1 2\nb 3 4\n"), 2).unwrap();
        assert_eq!(wv.len(), 1);
        assert!(!wv.contains("1"));
        assert_eq!(wv.vector("b"), Some(&[3.0, 4.0][..]));
    }

    #[test]
    fn test_numeric_first_row_with_width_one() {
        let wv = WordVectors::from_reader(Cursor::new("42 3
b 4
"), 1).unwrap();
        assert_eq!(wv.len(), 2);
        assert_eq!(wv.vector("42"), Some(&[3.0][..]));

        let wv = WordVectors::from_reader(Cursor::new("1 1
b 4
"), 1).unwrap();
        assert_eq!(wv.len(), 1);
    }

    #[test]
    fn test_header_only_on_first_line() {
        // a later "<int> <int>" line is a row and fails the width check
        assert!(WordVectors::from_reader(Cursor::new("a 1 2
3 2
"), 2).is_err());
    }

    #[test]
    fn test_rejects_header_width_mismatch() {
        assert!(WordVectors::from_reader(Cursor::new("10 60\n"), 2).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(WordVectors::load(dir.path().join("vectors.txt"), 60).is_err());
    }
}
