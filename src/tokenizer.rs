//! The tokenizer seam.
//!
//! Chunking policy lives in this crate; vocabulary does not. Anything that can
//! turn text into an ordered list of token ids and back again can drive the
//! chunkers: an in-process HuggingFace tokenizer, a remote service, or the
//! [`CharTokenizer`] shipped here for tests and demos.
//!
//! ## Implicit Markers
//!
//! Many tokenizers wrap their output in start/end markers (`<s>`, `</s>`,
//! `[CLS]`, ...). Those markers are not content, and counting them against a
//! chunk's budget would make every chunk look two tokens heavier than it is.
//! Every call therefore states explicitly whether markers are wanted:
//!
//! ```text
//! encode("hi", Markers::Include)  -> [BOS, 'h', 'i', EOS]
//! encode("hi", Markers::Suppress) -> ['h', 'i']
//! ```
//!
//! The chunkers always measure and reconstruct with [`Markers::Suppress`].

use std::sync::Arc;

use crate::BoxError;

/// Whether a tokenizer should add (or, when decoding, keep) implicit markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Markers {
    /// No start/end markers; only the content tokens.
    #[default]
    Suppress,
    /// Whatever markers the tokenizer adds by default.
    Include,
}

impl Markers {
    /// `true` for [`Markers::Include`].
    #[must_use]
    pub const fn included(self) -> bool {
        matches!(self, Self::Include)
    }
}

/// An encode/decode oracle for token ids.
///
/// Implementations must be deterministic for the chunkers' guarantees to
/// hold: the same text must always encode to the same ids.
///
/// Thread safety is the implementation's own contract; the `Send + Sync`
/// bound lets one tokenizer be shared by concurrent chunking calls.
pub trait Tokenizer: Send + Sync {
    /// Encode `text` into token ids.
    ///
    /// # Errors
    ///
    /// Any backend failure, passed through unchanged.
    fn encode(&self, text: &str, markers: Markers) -> Result<Vec<u32>, BoxError>;

    /// Decode token ids back into text.
    ///
    /// # Errors
    ///
    /// Any backend failure, e.g. an id outside the vocabulary.
    fn decode(&self, ids: &[u32], markers: Markers) -> Result<String, BoxError>;

    /// Count the tokens of `text`.
    ///
    /// # Errors
    ///
    /// Same as [`Tokenizer::encode`].
    fn count(&self, text: &str, markers: Markers) -> Result<usize, BoxError> {
        self.encode(text, markers).map(|ids| ids.len())
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for &T {
    fn encode(&self, text: &str, markers: Markers) -> Result<Vec<u32>, BoxError> {
        (**self).encode(text, markers)
    }

    fn decode(&self, ids: &[u32], markers: Markers) -> Result<String, BoxError> {
        (**self).decode(ids, markers)
    }

    fn count(&self, text: &str, markers: Markers) -> Result<usize, BoxError> {
        (**self).count(text, markers)
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for Box<T> {
    fn encode(&self, text: &str, markers: Markers) -> Result<Vec<u32>, BoxError> {
        (**self).encode(text, markers)
    }

    fn decode(&self, ids: &[u32], markers: Markers) -> Result<String, BoxError> {
        (**self).decode(ids, markers)
    }

    fn count(&self, text: &str, markers: Markers) -> Result<usize, BoxError> {
        (**self).count(text, markers)
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for Arc<T> {
    fn encode(&self, text: &str, markers: Markers) -> Result<Vec<u32>, BoxError> {
        (**self).encode(text, markers)
    }

    fn decode(&self, ids: &[u32], markers: Markers) -> Result<String, BoxError> {
        (**self).decode(ids, markers)
    }

    fn count(&self, text: &str, markers: Markers) -> Result<usize, BoxError> {
        (**self).count(text, markers)
    }
}

/// One token per Unicode scalar value; the id is the code point.
///
/// Lossless and vocabulary-free, which makes chunk arithmetic easy to reason
/// about: `"héllo"` is exactly 5 tokens.
///
/// ## Example
///
/// ```rust
/// use paraslab::{CharTokenizer, Markers, Tokenizer};
///
/// let tok = CharTokenizer::new().with_markers(0xF0000, 0xF0001);
///
/// assert_eq!(tok.count("héllo", Markers::Suppress).unwrap(), 5);
/// assert_eq!(tok.count("héllo", Markers::Include).unwrap(), 7);
///
/// let ids = tok.encode("héllo", Markers::Include).unwrap();
/// assert_eq!(tok.decode(&ids, Markers::Suppress).unwrap(), "héllo");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharTokenizer {
    markers: Option<(u32, u32)>,
}

impl CharTokenizer {
    /// A tokenizer without implicit markers.
    #[must_use]
    pub const fn new() -> Self {
        Self { markers: None }
    }

    /// Emit `start` and `end` around the content under [`Markers::Include`].
    ///
    /// Pick ids outside the range of code points your text uses (for example
    /// from a private-use plane), otherwise suppressed decoding will drop
    /// real characters.
    #[must_use]
    pub const fn with_markers(self, start: u32, end: u32) -> Self {
        Self {
            markers: Some((start, end)),
        }
    }

    fn is_marker(&self, id: u32) -> bool {
        self.markers
            .is_some_and(|(start, end)| id == start || id == end)
    }
}

impl Tokenizer for CharTokenizer {
    fn encode(&self, text: &str, markers: Markers) -> Result<Vec<u32>, BoxError> {
        let content = text.chars().map(u32::from);
        match (self.markers, markers) {
            (Some((start, end)), Markers::Include) => {
                let mut ids = Vec::with_capacity(text.len() + 2);
                ids.push(start);
                ids.extend(content);
                ids.push(end);
                Ok(ids)
            }
            _ => Ok(content.collect()),
        }
    }

    fn decode(&self, ids: &[u32], markers: Markers) -> Result<String, BoxError> {
        let mut text = String::with_capacity(ids.len());
        for &id in ids {
            if !markers.included() && self.is_marker(id) {
                continue;
            }
            let c = char::from_u32(id)
                .ok_or_else(|| format!("token id {id:#x} is not a Unicode scalar value"))?;
            text.push(c);
        }
        Ok(text)
    }

    fn count(&self, text: &str, markers: Markers) -> Result<usize, BoxError> {
        let framing = match (self.markers, markers) {
            (Some(_), Markers::Include) => 2,
            _ => 0,
        };
        Ok(text.chars().count() + framing)
    }
}

/// HuggingFace `tokenizers` backend.
#[cfg(feature = "hf")]
mod hf {
    use std::ops::Deref;
    use std::path::Path;

    use super::{Markers, Tokenizer};
    use crate::BoxError;

    // Method calls go through `Deref` to reach the inherent `TokenizerImpl`
    // methods; plain `self.encode` would resolve to this trait.
    impl Tokenizer for tokenizers::Tokenizer {
        fn encode(&self, text: &str, markers: Markers) -> Result<Vec<u32>, BoxError> {
            let encoding = Deref::deref(self).encode(text, markers.included())?;
            Ok(encoding.get_ids().to_vec())
        }

        fn decode(&self, ids: &[u32], markers: Markers) -> Result<String, BoxError> {
            Deref::deref(self).decode(ids, !markers.included())
        }
    }

    /// Load a pretrained tokenizer from a `tokenizer.json` file, or from a
    /// directory containing one.
    ///
    /// # Errors
    ///
    /// Returns the underlying `tokenizers` error if the file is missing or
    /// malformed.
    pub fn load_pretrained(path: impl AsRef<Path>) -> Result<tokenizers::Tokenizer, BoxError> {
        let path = path.as_ref();
        let file = if path.is_dir() {
            path.join("tokenizer.json")
        } else {
            path.to_path_buf()
        };
        tokenizers::Tokenizer::from_file(&file)
            .map_err(|e| format!("failed to load tokenizer from {}: {e}", file.display()).into())
    }
}

#[cfg(feature = "hf")]
pub use hf::load_pretrained;
