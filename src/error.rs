//! Error types for paraslab.

/// Boxed error produced by a [`Tokenizer`](crate::Tokenizer) backend.
///
/// Same shape as `tokenizers::Error`, so the HuggingFace backend forwards its
/// errors without conversion.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur during chunking.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A caller-supplied argument was missing or out of range.
    ///
    /// Raised before any tokenization work starts.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The tokenizer failed while encoding or decoding.
    ///
    /// The whole chunking call is aborted; no partial result is returned.
    #[error("tokenization failed: {0}")]
    Tokenization(#[source] BoxError),
}

impl Error {
    /// Shorthand for [`Error::InvalidArgument`].
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Whether this error was caused by bad input rather than the tokenizer.
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

/// Result type for paraslab operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_tokenization_keeps_cause() {
        let cause: BoxError = "vocabulary missing".into();
        let err = Error::Tokenization(cause);

        assert!(!err.is_invalid_argument());
        assert_eq!(err.to_string(), "tokenization failed: vocabulary missing");
        assert_eq!(
            err.source().map(ToString::to_string).as_deref(),
            Some("vocabulary missing")
        );
    }

    #[test]
    fn test_invalid_argument_message() {
        let err = Error::invalid("max_tokens must be positive");
        assert!(err.is_invalid_argument());
        assert_eq!(err.to_string(), "invalid argument: max_tokens must be positive");
    }
}
