//! # paraslab
//!
//! Paragraph-aligned text chunking against a token budget.
//!
//! ## The Problem
//!
//! You have a long text and a model that accepts at most N tokens per
//! request. You need to cut the text into pieces that each fit, without
//! losing anything, and preferably without cutting through paragraphs.
//!
//! Counting characters is not enough: "4 characters per token" is a rough
//! average that is wrong for code, for CJK text, for anything with long
//! numbers. The only reliable count comes from the model's own tokenizer.
//!
//! ## The Approach
//!
//! Treat each non-blank line as a paragraph, measure it with the tokenizer,
//! and pack paragraphs greedily:
//!
//! ```text
//! max_tokens = 100
//!
//! P0 (40)  ┐
//! P1 (35)  ├─ chunk 0   (75)
//!          ┘
//! P2 (50)  ┐            75 + 50 > 100
//! P3 (50)  ┴─ chunk 1   (100)   <- exact fit is allowed
//! P4 (260) ── chunks 2, 3, 4    <- alone too big: token windows 100/100/60
//! P5 (10)  ── chunk 5
//! ```
//!
//! Every emitted chunk is trimmed and non-empty, chunks appear in input
//! order, and every non-blank line of the input lands in exactly one chunk
//! (or, if oversized, is spread over consecutive windows).
//!
//! ## Tokenizers
//!
//! Tokenization is delegated to anything implementing [`Tokenizer`]:
//!
//! - [`CharTokenizer`]: one token per character, no vocabulary. Good for
//!   tests and for budgets measured in characters.
//! - `tokenizers::Tokenizer` (feature `hf`): any pretrained HuggingFace
//!   tokenizer, loaded from a `tokenizer.json`.
//!
//! ## Quick Start
//!
//! ```rust
//! use paraslab::{CharTokenizer, Chunker, ParagraphChunker, TokenBudget};
//!
//! let text = "The quick brown fox jumps over the lazy dog.\n\
//!             Pack my box with five dozen liquor jugs.\n\
//!             \n\
//!             How vexingly quick daft zebras jump!";
//!
//! let chunker = ParagraphChunker::new(CharTokenizer::new(), TokenBudget::new(90)?);
//! let chunked = chunker.chunk(text)?;
//!
//! assert_eq!(chunked.chunk_count(), 2);
//! assert!(chunked.slabs.iter().all(|s| !s.text.is_empty()));
//!
//! // Or in one call, with the budget as it arrives over the wire
//! let chunked = paraslab::chunk(&CharTokenizer::new(), text, 90)?;
//! assert_eq!(chunked.max_tokens, 90);
//! # Ok::<(), paraslab::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Adds |
//! |---------|------|
//! | `hf` | [`Tokenizer`] for `tokenizers::Tokenizer`, `load_pretrained` |
//! | `serde` | `api`: JSON request/response types and transport-agnostic handlers |
//! | `server` | `server`: HTTP endpoints `/chunk`, `/tokenize`, `/health`, plus the `paraslab-server` binary |

mod budget;
mod error;
mod lines;
mod paragraph;
mod slab;
mod tokenizer;
mod window;

#[cfg(feature = "serde")]
pub mod api;

#[cfg(feature = "server")]
pub mod server;

pub use budget::TokenBudget;
pub use error::{BoxError, Error, Result};
pub use lines::{is_blank, is_line_break, paragraphs, Paragraphs};
pub use paragraph::ParagraphChunker;
pub use slab::{Chunked, Slab, SlabSource};
pub use tokenizer::{CharTokenizer, Markers, Tokenizer};
pub use window::WindowChunker;

#[cfg(feature = "hf")]
pub use tokenizer::load_pretrained;

/// A token-budgeted chunking strategy.
///
/// Both chunkers implement this trait, enabling polymorphic usage:
///
/// ```rust
/// use paraslab::{CharTokenizer, Chunker, ParagraphChunker, TokenBudget, WindowChunker};
///
/// fn chunk_document(chunker: &dyn Chunker, text: &str) -> paraslab::Result<Vec<String>> {
///     Ok(chunker.chunk(text)?.into_texts())
/// }
///
/// let budget = TokenBudget::new(8)?;
/// let paragraphs = ParagraphChunker::new(CharTokenizer::new(), budget);
/// let windows = WindowChunker::new(CharTokenizer::new(), budget);
///
/// let text = "Hello.\nWorld.";
/// assert_eq!(chunk_document(&paragraphs, text)?, ["Hello.", "World."]);
/// assert_eq!(chunk_document(&windows, text)?, ["Hello.\nW", "orld."]);
/// # Ok::<(), paraslab::Error>(())
/// ```
pub trait Chunker: Send + Sync {
    /// Split text into chunks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Tokenization`] if the tokenizer fails at any point;
    /// no partial result is returned.
    fn chunk(&self, text: &str) -> Result<Chunked>;

    /// The per-chunk token limit.
    fn budget(&self) -> TokenBudget;

    /// Estimate the number of chunks for a given text length in bytes.
    ///
    /// Useful for pre-allocation. May be approximate.
    fn estimate_chunks(&self, text_len: usize) -> usize {
        // Conservative default
        (text_len / 500).max(1)
    }
}

/// Chunk `text` into paragraph-aligned pieces of at most `max_tokens` tokens.
///
/// The budget is validated first: zero or negative values fail with
/// [`Error::InvalidArgument`] before the tokenizer is touched. Blank input
/// yields an empty result, not an error.
///
/// # Errors
///
/// [`Error::InvalidArgument`] for a non-positive budget,
/// [`Error::Tokenization`] if the tokenizer fails.
///
/// # Examples
///
/// ```rust
/// use paraslab::CharTokenizer;
///
/// let chunked = paraslab::chunk(&CharTokenizer::new(), "hello", 100)?;
/// assert_eq!(chunked.into_texts(), ["hello"]);
///
/// assert!(paraslab::chunk(&CharTokenizer::new(), "hello", 0).is_err());
/// assert!(paraslab::chunk(&CharTokenizer::new(), "  \n\n ", 5)?.is_empty());
/// # Ok::<(), paraslab::Error>(())
/// ```
pub fn chunk<T: Tokenizer + ?Sized>(tokenizer: &T, text: &str, max_tokens: i64) -> Result<Chunked> {
    let budget = TokenBudget::try_from(max_tokens)?;
    ParagraphChunker::new(tokenizer, budget).chunk(text)
}
