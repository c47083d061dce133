//! Token-window chunking.
//!
//! The bluntest strategy that still honours a token budget: encode the text,
//! cut the id sequence into consecutive windows of `max_tokens`, decode each
//! window back to text.
//!
//! ## How It Works
//!
//! ```text
//! max_tokens = 4
//!
//! ids:      [t0 t1 t2 t3 | t4 t5 t6 t7 | t8 t9]
//! window 0:  t0..t4
//! window 1:  t4..t8
//! window 2:  t8..t10      <- final window may be shorter
//! ```
//!
//! The windows partition the id sequence: no overlap, no gaps. Nothing is
//! dropped except whitespace at window edges, which is trimmed.
//!
//! ## Where It Fits
//!
//! [`WindowChunker`] ignores paragraph structure entirely. Its real job is
//! as the fallback inside [`ParagraphChunker`](crate::ParagraphChunker) for a
//! single paragraph that is larger than the whole budget.
//!
//! Decoding a window can cut through a multi-token character or word; what
//! the tokenizer returns for a partial sequence is its own business. Byte
//! level BPE vocabularies typically yield a replacement character there.

use crate::lines::trim_blank;
use crate::{Chunked, Chunker, Error, Markers, Result, SlabSource, TokenBudget, Tokenizer};

/// Decode `ids` in windows of at most `budget` tokens, appending every
/// non-empty trimmed window to `out` tagged with `paragraph`.
pub(crate) fn split_windows<T: Tokenizer + ?Sized>(
    tokenizer: &T,
    ids: &[u32],
    budget: TokenBudget,
    paragraph: usize,
    out: &mut Vec<(String, SlabSource)>,
) -> Result<()> {
    for (window, span) in ids.chunks(budget.get()).enumerate() {
        let decoded = tokenizer
            .decode(span, Markers::Suppress)
            .map_err(Error::Tokenization)?;
        let trimmed = trim_blank(&decoded);
        if !trimmed.is_empty() {
            out.push((trimmed.to_string(), SlabSource::Window { paragraph, window }));
        }
    }
    Ok(())
}

/// Fixed token-window chunker.
///
/// ## Example
///
/// ```rust
/// use paraslab::{CharTokenizer, Chunker, TokenBudget, WindowChunker};
///
/// let chunker = WindowChunker::new(CharTokenizer::new(), TokenBudget::new(4).unwrap());
/// let chunked = chunker.chunk("abcdefghij").unwrap();
///
/// assert_eq!(chunked.into_texts(), ["abcd", "efgh", "ij"]);
/// ```
#[derive(Debug, Clone)]
pub struct WindowChunker<T> {
    tokenizer: T,
    budget: TokenBudget,
}

impl<T: Tokenizer> WindowChunker<T> {
    /// Create a new window chunker.
    #[must_use]
    pub fn new(tokenizer: T, budget: TokenBudget) -> Self {
        Self { tokenizer, budget }
    }

    /// The tokenizer used for encoding and decoding.
    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }
}

impl<T: Tokenizer> Chunker for WindowChunker<T> {
    fn chunk(&self, text: &str) -> Result<Chunked> {
        let text = trim_blank(text);
        if text.is_empty() {
            return Chunked::measure(&self.tokenizer, Vec::new(), self.budget);
        }

        let ids = self
            .tokenizer
            .encode(text, Markers::Suppress)
            .map_err(Error::Tokenization)?;

        let mut pieces = Vec::with_capacity(ids.len().div_ceil(self.budget.get()));
        split_windows(&self.tokenizer, &ids, self.budget, 0, &mut pieces)?;

        Chunked::measure(&self.tokenizer, pieces, self.budget)
    }

    fn budget(&self) -> TokenBudget {
        self.budget
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CharTokenizer;

    fn chunker(max_tokens: usize) -> WindowChunker<CharTokenizer> {
        WindowChunker::new(CharTokenizer::new(), TokenBudget::new(max_tokens).unwrap())
    }

    #[test]
    fn test_even_split() {
        let chunked = chunker(3).chunk("abcdefghi").unwrap();
        assert_eq!(chunked.chunk_count(), 3);
        assert!(chunked.slabs.iter().all(|s| s.tokens == 3));
    }

    #[test]
    fn test_short_last_window() {
        let chunked = chunker(4).chunk("abcdefghij").unwrap();
        assert_eq!(chunked.slabs.last().unwrap().text, "ij");
        assert_eq!(
            chunked.slabs[2].source,
            SlabSource::Window {
                paragraph: 0,
                window: 2
            }
        );
    }

    #[test]
    fn test_whitespace_windows_dropped() {
        // Window 1 is "    " and vanishes after trimming
        let chunked = chunker(4).chunk("abcd    efgh").unwrap();
        assert_eq!(chunked.into_texts(), ["abcd", "efgh"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(chunker(4).chunk("").unwrap().is_empty());
        assert!(chunker(4).chunk(" \n\t").unwrap().is_empty());
    }

    #[test]
    fn test_multibyte_lossless() {
        let text = "日本語のテキストです";
        let chunked = chunker(3).chunk(text).unwrap();
        assert_eq!(chunked.texts().collect::<String>(), text);
    }
}
