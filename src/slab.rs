//! The Slab type: a finished chunk with its token accounting.

use std::fmt;
use std::ops::Range;

use crate::{Error, Markers, Result, TokenBudget, Tokenizer};

/// Where a slab's content came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SlabSource {
    /// One or more whole paragraphs, by paragraph index (end exclusive).
    Paragraphs(Range<usize>),
    /// A token window cut from a single paragraph that exceeded the budget.
    Window {
        /// Index of the oversized paragraph.
        paragraph: usize,
        /// Zero-based window number within that paragraph.
        window: usize,
    },
}

/// A chunk of text that fits the token budget.
///
/// The name "slab" evokes a physical slice of material: concrete, wood,
/// stone. Each slab is a self-contained piece that can be sent to a model on
/// its own.
///
/// ## Token Counts
///
/// `tokens` is measured by re-encoding the final `text`, not summed from the
/// paragraphs that went into it. Joining paragraphs with `\n` and trimming the
/// edges can move the count by a token or two either way, and callers budget
/// against what they will actually send.
///
/// ```text
/// paragraphs:  "  alpha"  (7)   "beta"  (4)      running sum: 11
/// slab text:   "alpha\nbeta"                     re-encoded:  10
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slab {
    /// The chunk text, trimmed and never empty.
    pub text: String,
    /// Zero-based index of this chunk in the sequence.
    pub index: usize,
    /// Token count of `text`, encoded without implicit markers.
    pub tokens: usize,
    /// The paragraphs or token window this chunk was built from.
    pub source: SlabSource,
}

impl Slab {
    /// Create a new slab.
    #[must_use]
    pub fn new(text: impl Into<String>, index: usize, tokens: usize, source: SlabSource) -> Self {
        Self {
            text: text.into(),
            index,
            tokens,
            source,
        }
    }

    /// The length of this chunk in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether this chunk is empty. Always `false` for slabs a chunker produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whether this slab is a window of an oversized paragraph.
    #[must_use]
    pub fn is_window(&self) -> bool {
        matches!(self.source, SlabSource::Window { .. })
    }
}

impl fmt::Display for Slab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Slab {{ index: {}, tokens: {}, len: {} }}",
            self.index,
            self.tokens,
            self.len()
        )
    }
}

/// The outcome of one chunking call.
///
/// Holds the slabs in input order together with the budget they were cut
/// for. Nothing here outlives the call that produced it; chunkers keep no
/// state between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunked {
    /// The chunks, in input order.
    pub slabs: Vec<Slab>,
    /// The `max_tokens` the chunks were cut for.
    pub max_tokens: usize,
}

impl Chunked {
    /// Number of chunks produced.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.slabs.len()
    }

    /// Whether no chunks were produced (blank input).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slabs.is_empty()
    }

    /// Sum of the re-encoded token counts of every chunk.
    #[must_use]
    pub fn total_tokens(&self) -> usize {
        self.slabs.iter().map(|s| s.tokens).sum()
    }

    /// Largest realized chunk, in tokens.
    #[must_use]
    pub fn max_chunk_tokens(&self) -> usize {
        self.slabs.iter().map(|s| s.tokens).max().unwrap_or(0)
    }

    /// Iterate over the chunk texts.
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.slabs.iter().map(|s| s.text.as_str())
    }

    /// Consume the result, keeping only the chunk texts.
    #[must_use]
    pub fn into_texts(self) -> Vec<String> {
        self.slabs.into_iter().map(|s| s.text).collect()
    }
}

impl Chunked {
    /// Number every piece, measure it, and wrap the lot up.
    ///
    /// This is the accounting pass: each chunk is re-encoded on its own, so
    /// the reported counts are what a caller will see when it sends the chunk,
    /// not the running sums used while assembling. Empty pieces are dropped.
    pub(crate) fn measure<T: Tokenizer + ?Sized>(
        tokenizer: &T,
        pieces: Vec<(String, SlabSource)>,
        budget: TokenBudget,
    ) -> Result<Self> {
        let mut slabs = Vec::with_capacity(pieces.len());

        for (text, source) in pieces {
            if text.is_empty() {
                continue;
            }
            let tokens = tokenizer
                .count(&text, Markers::Suppress)
                .map_err(Error::Tokenization)?;
            let index = slabs.len();
            tracing::debug!(index, tokens, chars = text.chars().count(), "chunk");
            slabs.push(Slab::new(text, index, tokens, source));
        }

        let chunked = Self {
            slabs,
            max_tokens: budget.get(),
        };
        tracing::info!(
            chunks = chunked.chunk_count(),
            total_tokens = chunked.total_tokens(),
            max_tokens = chunked.max_tokens,
            "chunked text"
        );
        Ok(chunked)
    }
}

impl IntoIterator for Chunked {
    type Item = Slab;
    type IntoIter = std::vec::IntoIter<Slab>;

    fn into_iter(self) -> Self::IntoIter {
        self.slabs.into_iter()
    }
}

impl<'a> IntoIterator for &'a Chunked {
    type Item = &'a Slab;
    type IntoIter = std::slice::Iter<'a, Slab>;

    fn into_iter(self) -> Self::IntoIter {
        self.slabs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Chunked {
        Chunked {
            slabs: vec![
                Slab::new("alpha\nbeta", 0, 10, SlabSource::Paragraphs(0..2)),
                Slab::new(
                    "gamma",
                    1,
                    5,
                    SlabSource::Window {
                        paragraph: 2,
                        window: 0,
                    },
                ),
            ],
            max_tokens: 10,
        }
    }

    #[test]
    fn test_accounting() {
        let chunked = sample();
        assert_eq!(chunked.chunk_count(), 2);
        assert_eq!(chunked.total_tokens(), 15);
        assert_eq!(chunked.max_chunk_tokens(), 10);
        assert!(!chunked.is_empty());
    }

    #[test]
    fn test_texts() {
        let chunked = sample();
        assert_eq!(chunked.texts().collect::<Vec<_>>(), ["alpha\nbeta", "gamma"]);
        assert_eq!(chunked.into_texts(), ["alpha\nbeta", "gamma"]);
    }

    #[test]
    fn test_window_flag() {
        let chunked = sample();
        assert!(!chunked.slabs[0].is_window());
        assert!(chunked.slabs[1].is_window());
    }

    #[test]
    fn test_measure_recounts_and_renumbers() {
        use crate::CharTokenizer;

        let pieces = vec![
            ("ab\ncd".to_string(), SlabSource::Paragraphs(0..2)),
            (String::new(), SlabSource::Paragraphs(2..3)),
            ("éé".to_string(), SlabSource::Paragraphs(3..4)),
        ];
        let budget = TokenBudget::new(5).unwrap();
        let chunked = Chunked::measure(&CharTokenizer::new(), pieces, budget).unwrap();

        assert_eq!(chunked.chunk_count(), 2);
        assert_eq!(chunked.slabs[0].tokens, 5);
        assert_eq!(chunked.slabs[1].tokens, 2);
        assert_eq!(chunked.slabs[1].index, 1);
        assert_eq!(chunked.max_tokens, 5);
    }

    #[test]
    fn test_display() {
        let slab = Slab::new("hello", 3, 5, SlabSource::Paragraphs(4..5));
        assert_eq!(slab.to_string(), "Slab { index: 3, tokens: 5, len: 5 }");
    }
}
