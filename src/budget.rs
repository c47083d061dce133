//! Token budget configuration.
//!
//! ## The Problem
//!
//! Every model has a hard context limit measured in tokens, not characters.
//! A chunk that is one token over is as useless as one that is a thousand
//! over: the model truncates it or rejects the request.
//!
//! ```text
//! max_tokens = 6
//!
//! Paragraph A: 4 tokens   ┐
//! Paragraph B: 2 tokens   ┘ 4 + 2 = 6  -> one chunk
//! Paragraph C: 3 tokens     6 + 3 > 6  -> new chunk
//! ```
//!
//! ## The Solution: A Validated Ceiling
//!
//! `TokenBudget` is the `max_tokens` ceiling, checked once at the boundary.
//! Zero and negative budgets are rejected before any tokenizer call, so the
//! chunkers never have to re-check them.

use std::fmt;
use std::num::NonZeroUsize;

use crate::{Error, Result};

/// A strictly positive per-chunk token limit.
///
/// # Examples
///
/// ```rust
/// use paraslab::TokenBudget;
///
/// let budget = TokenBudget::new(512).unwrap();
/// assert_eq!(budget.get(), 512);
/// assert!(budget.fits(512));
/// assert!(!budget.fits(513));
///
/// // Wire values arrive signed
/// assert!(TokenBudget::try_from(-5_i64).is_err());
/// assert!(TokenBudget::try_from(0_i64).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenBudget(NonZeroUsize);

impl TokenBudget {
    /// Create a budget of `max_tokens` tokens per chunk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `max_tokens == 0`.
    pub fn new(max_tokens: usize) -> Result<Self> {
        NonZeroUsize::new(max_tokens)
            .map(Self)
            .ok_or_else(|| Error::invalid("max_tokens must be positive"))
    }

    /// The maximum number of tokens allowed in one chunk.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0.get()
    }

    /// Whether a chunk of `count` tokens stays within the budget.
    #[must_use]
    pub const fn fits(&self, count: usize) -> bool {
        count <= self.get()
    }

    /// Check if adding `additional` tokens to `current` would exceed the budget.
    ///
    /// Useful for incremental chunk building.
    #[must_use]
    pub fn would_overflow(&self, current: usize, additional: usize) -> bool {
        current.saturating_add(additional) > self.get()
    }
}

impl TryFrom<usize> for TokenBudget {
    type Error = Error;

    fn try_from(max_tokens: usize) -> Result<Self> {
        Self::new(max_tokens)
    }
}

impl TryFrom<i64> for TokenBudget {
    type Error = Error;

    fn try_from(max_tokens: i64) -> Result<Self> {
        if max_tokens <= 0 {
            return Err(Error::invalid("max_tokens must be positive"));
        }
        let max_tokens = usize::try_from(max_tokens)
            .map_err(|_| Error::invalid(format!("max_tokens {max_tokens} is out of range")))?;
        Self::new(max_tokens)
    }
}

impl From<NonZeroUsize> for TokenBudget {
    fn from(max_tokens: NonZeroUsize) -> Self {
        Self(max_tokens)
    }
}

impl fmt::Display for TokenBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}
