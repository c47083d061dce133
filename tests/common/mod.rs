//! Shared test tokenizers.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use paraslab::{BoxError, CharTokenizer, Markers, Tokenizer};

/// Small closed vocabulary used by [`WordTokenizer`] and the text generators.
pub const VOCAB: &[&str] = &[
    "the", "quick", "brown", "fox", "jumps", "over", "lazy", "dog", "pack", "my", "box", "with",
    "five", "dozen", "liquor", "jugs", "sphinx", "of", "black", "quartz",
];

/// One token per whitespace-separated word of [`VOCAB`].
///
/// Whitespace carries no tokens, so joining and trimming never change a
/// count: realized chunk totals equal the packing sums exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn encode(&self, text: &str, _markers: Markers) -> Result<Vec<u32>, BoxError> {
        text.split_whitespace()
            .map(|word| {
                VOCAB
                    .iter()
                    .position(|v| *v == word)
                    .map(|i| i as u32)
                    .ok_or_else(|| BoxError::from(format!("unknown word {word:?}")))
            })
            .collect()
    }

    fn decode(&self, ids: &[u32], _markers: Markers) -> Result<String, BoxError> {
        let words = ids
            .iter()
            .map(|&id| {
                VOCAB
                    .get(id as usize)
                    .copied()
                    .ok_or_else(|| BoxError::from(format!("unknown id {id}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(words.join(" "))
    }
}

/// Counts every encode and decode call, delegating to [`CharTokenizer`].
#[derive(Debug, Default)]
pub struct CountingTokenizer {
    pub encodes: AtomicUsize,
    pub decodes: AtomicUsize,
}

impl Tokenizer for CountingTokenizer {
    fn encode(&self, text: &str, markers: Markers) -> Result<Vec<u32>, BoxError> {
        self.encodes.fetch_add(1, Ordering::Relaxed);
        CharTokenizer::new().encode(text, markers)
    }

    fn decode(&self, ids: &[u32], markers: Markers) -> Result<String, BoxError> {
        self.decodes.fetch_add(1, Ordering::Relaxed);
        CharTokenizer::new().decode(ids, markers)
    }
}

/// Encodes fine, fails every decode.
#[derive(Debug, Default)]
pub struct NoDecodeTokenizer;

impl Tokenizer for NoDecodeTokenizer {
    fn encode(&self, text: &str, markers: Markers) -> Result<Vec<u32>, BoxError> {
        CharTokenizer::new().encode(text, markers)
    }

    fn decode(&self, _ids: &[u32], _markers: Markers) -> Result<String, BoxError> {
        Err("decoder not available".into())
    }
}

/// Remove all whitespace, for whitespace-insensitive comparisons.
pub fn squash(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
