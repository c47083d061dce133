//! Paragraph-packing chunker.
//!
//! Packs whole paragraphs into chunks, left to right, until the next one
//! would break the token budget. Paragraphs are never split unless one of
//! them is larger than the entire budget on its own.
//!
//! ## The Algorithm
//!
//! One pass over the paragraphs with a pending accumulator:
//!
//! ```text
//! for each paragraph p (n = tokens(p)):
//!
//!   n > max                 oversized: flush pending, then emit p as
//!                           consecutive token windows of `max`
//!
//!   pending + n > max       overflow: flush pending, start over with p
//!   (pending non-empty)
//!
//!   otherwise               accumulate: pending += p
//!
//! at the end: flush pending
//! ```
//!
//! Flushing joins the pending paragraphs with `\n` and trims the result.
//!
//! ## Worked Example
//!
//! ```text
//! max_tokens = 10, one token per character
//!
//! "aaaa"          4   pending = [aaaa]               4
//! "bbbbbb"        6   pending = [aaaa, bbbbbb]      10   <- exact fit merges
//! "cc"            2   10 + 2 > 10: flush "aaaa\nbbbbbb"
//!                     pending = [cc]                 2
//! "d" * 25       25   oversized: flush "cc"
//!                     emit "d"*10, "d"*10, "d"*5
//! "e"             1   pending = [e]
//! end                 flush "e"
//! ```
//!
//! ## Budget Arithmetic
//!
//! Packing decisions use paragraph token counts. The `\n` joining two
//! paragraphs is not charged, so with a tokenizer that gives line breaks a
//! token of their own, a packed chunk can realize up to one token per joint
//! above the budget. Token windows never exceed it. The counts reported in
//! each [`Slab`](crate::Slab) are always the realized ones.

use crate::window::split_windows;
use crate::{
    lines, Chunked, Chunker, Error, Markers, Result, SlabSource, TokenBudget, Tokenizer,
};

/// The chunk under construction.
#[derive(Debug, Default)]
struct Accumulator<'a> {
    parts: Vec<&'a str>,
    tokens: usize,
    first: usize,
}

impl<'a> Accumulator<'a> {
    fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    fn push(&mut self, index: usize, paragraph: &'a str, tokens: usize) {
        if self.parts.is_empty() {
            self.first = index;
        }
        self.parts.push(paragraph);
        self.tokens += tokens;
    }

    /// Emit the pending paragraphs as one piece and reset.
    fn flush(&mut self, out: &mut Vec<(String, SlabSource)>) {
        if self.parts.is_empty() {
            return;
        }
        let joined = self.parts.join("\n");
        let text = lines::trim_blank(&joined);
        if !text.is_empty() {
            let span = self.first..self.first + self.parts.len();
            out.push((text.to_string(), SlabSource::Paragraphs(span)));
        }
        self.parts.clear();
        self.tokens = 0;
    }
}

/// Paragraph-aligned chunker measured against a token budget.
///
/// ## Example
///
/// ```rust
/// use paraslab::{CharTokenizer, Chunker, ParagraphChunker, TokenBudget};
///
/// let chunker = ParagraphChunker::new(CharTokenizer::new(), TokenBudget::new(10).unwrap());
/// let chunked = chunker.chunk("aaaa\nbbbbbb\n\ncc").unwrap();
///
/// assert_eq!(chunked.into_texts(), ["aaaa\nbbbbbb", "cc"]);
/// ```
#[derive(Debug, Clone)]
pub struct ParagraphChunker<T> {
    tokenizer: T,
    budget: TokenBudget,
}

impl<T: Tokenizer> ParagraphChunker<T> {
    /// Create a new paragraph chunker.
    ///
    /// # Arguments
    ///
    /// * `tokenizer` - Encode/decode oracle used for every measurement
    /// * `budget` - Maximum tokens per chunk
    #[must_use]
    pub fn new(tokenizer: T, budget: TokenBudget) -> Self {
        Self { tokenizer, budget }
    }

    /// The tokenizer used for measuring paragraphs.
    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    /// Run the packing pass, producing trimmed pieces in input order.
    fn assemble(&self, text: &str) -> Result<Vec<(String, SlabSource)>> {
        let mut pieces = Vec::new();
        let mut pending = Accumulator::default();

        for (index, paragraph) in lines::paragraphs(text).enumerate() {
            let ids = self
                .tokenizer
                .encode(paragraph, Markers::Suppress)
                .map_err(Error::Tokenization)?;
            let tokens = ids.len();

            if !self.budget.fits(tokens) {
                pending.flush(&mut pieces);
                tracing::trace!(index, tokens, "splitting oversized paragraph");
                split_windows(&self.tokenizer, &ids, self.budget, index, &mut pieces)?;
                continue;
            }

            if !pending.is_empty() && self.budget.would_overflow(pending.tokens, tokens) {
                pending.flush(&mut pieces);
            }
            pending.push(index, paragraph, tokens);
        }

        pending.flush(&mut pieces);
        Ok(pieces)
    }
}

impl<T: Tokenizer> Chunker for ParagraphChunker<T> {
    fn chunk(&self, text: &str) -> Result<Chunked> {
        let pieces = self.assemble(text)?;
        Chunked::measure(&self.tokenizer, pieces, self.budget)
    }

    fn budget(&self) -> TokenBudget {
        self.budget
    }

    fn estimate_chunks(&self, text_len: usize) -> usize {
        // ~4 bytes per token for typical prose
        (text_len / 4).div_ceil(self.budget.get()).max(1)
    }
}
