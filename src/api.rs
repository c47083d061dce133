//! Caller-facing JSON contracts.
//!
//! Transport-agnostic request handling for the three operations a chunking
//! service exposes. The HTTP server in [`crate::server`] is a thin shell
//! around these functions; a CLI or queue worker could wrap them just as well.
//!
//! # Operations
//!
//! | Operation | Request | Response |
//! |-----------|---------|----------|
//! | [`chunk`] | `{"text": "...", "max_tokens": 6000}` | `{"chunks": [...], "chunk_count": 2, "max_tokens_setting": 6000, "actual_total_tokens_in_chunks": 7431}` |
//! | [`tokenize`] | `{"text": "..."}` | `{"token_count": 12, "tokens": [1, 2, ..., "...", ...]}` |
//! | [`health`] | none | `{"status": "healthy", "tokenizer": "loaded", "test_tokenization": 3}` |
//!
//! # Error Contract
//!
//! Failures serialize as [`ErrorBody`]:
//!
//! ```json
//! { "error": "max_tokens must be positive" }
//! ```
//!
//! [`ApiErrorKind::BadRequest`] covers missing or invalid fields;
//! [`ApiErrorKind::Internal`] covers tokenizer failures.

use serde::{Deserialize, Serialize, Serializer};

use crate::{Chunked, Error, Markers, Tokenizer};

/// Text used by [`health`] to prove the tokenizer works.
pub const HEALTH_PROBE: &str = "Test message";

/// How many ids [`tokenize`] shows from each end of the sequence.
pub const PREVIEW_LEN: usize = 10;

// ============ Requests ============

/// Body of a chunk request.
///
/// Both fields are optional at the type level so that a missing field is
/// reported through the error contract instead of a deserializer message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkRequest {
    /// The text to chunk.
    pub text: Option<String>,
    /// Maximum tokens per chunk.
    pub max_tokens: Option<MaxTokens>,
}

/// A `max_tokens` value as it may arrive over the wire.
///
/// Clients send integers, floats, and numeric strings; all are coerced to an
/// integer (floats truncate toward zero) before the positivity check.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MaxTokens {
    /// `6000`
    Int(i64),
    /// `6000.0`
    Float(f64),
    /// `"6000"`
    Text(String),
}

impl MaxTokens {
    /// Coerce to an integer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for non-numeric strings and
    /// non-finite floats.
    pub fn to_i64(&self) -> crate::Result<i64> {
        match self {
            Self::Int(n) => Ok(*n),
            Self::Float(f) if f.is_finite() => Ok(f.trunc() as i64),
            Self::Float(f) => Err(Error::invalid(format!("max_tokens {f} is not a number"))),
            Self::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| Error::invalid(format!("max_tokens {s:?} is not an integer"))),
        }
    }
}

impl From<i64> for MaxTokens {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

/// Body of a tokenize request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenizeRequest {
    /// The text to count.
    pub text: Option<String>,
}

// ============ Responses ============

/// Successful chunk response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkResponse {
    /// The chunks, in input order.
    pub chunks: Vec<String>,
    /// `chunks.len()`.
    pub chunk_count: usize,
    /// The budget the chunks were cut for.
    pub max_tokens_setting: usize,
    /// Sum of the chunks' own token counts, each re-encoded without markers.
    pub actual_total_tokens_in_chunks: usize,
}

impl From<Chunked> for ChunkResponse {
    fn from(chunked: Chunked) -> Self {
        let actual_total_tokens_in_chunks = chunked.total_tokens();
        let max_tokens_setting = chunked.max_tokens;
        let chunks = chunked.into_texts();
        Self {
            chunk_count: chunks.len(),
            chunks,
            max_tokens_setting,
            actual_total_tokens_in_chunks,
        }
    }
}

/// One element of a token preview: an id, or the elision marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewToken {
    /// A token id.
    Id(u32),
    /// Stands in for the ids that were left out; serializes as `"..."`.
    Elided,
}

impl Serialize for PreviewToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Id(id) => serializer.serialize_u32(*id),
            Self::Elided => serializer.serialize_str("..."),
        }
    }
}

/// Successful tokenize response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenizeResponse {
    /// Number of tokens, implicit markers included.
    pub token_count: usize,
    /// The first ids, an elision marker, and the last ids.
    pub tokens: Vec<PreviewToken>,
}

/// Health probe result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum HealthResponse {
    /// The tokenizer encoded [`HEALTH_PROBE`].
    Healthy {
        /// Always `"loaded"`.
        tokenizer: String,
        /// Token count of the probe.
        test_tokenization: usize,
    },
    /// The tokenizer failed on the probe.
    Unhealthy {
        /// The tokenizer's error message.
        error: String,
    },
}

impl HealthResponse {
    /// Whether the probe succeeded.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy { .. })
    }
}

/// JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub error: String,
}

// ============ Errors ============

/// Which side of the contract failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// The request was malformed or out of range.
    BadRequest,
    /// The tokenizer failed.
    Internal,
}

/// A failed request, ready to be rendered by a transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    /// Failure class, for picking a status code.
    pub kind: ApiErrorKind,
    /// Message placed in [`ErrorBody::error`].
    pub message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::BadRequest,
            message: message.into(),
        }
    }

    /// The JSON body for this error.
    #[must_use]
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.message.clone(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidArgument(message) => Self::bad_request(message),
            Error::Tokenization(source) => Self {
                kind: ApiErrorKind::Internal,
                message: source.to_string(),
            },
        }
    }
}

// ============ Handlers ============

/// Validate a chunk request and run the paragraph chunker.
///
/// # Errors
///
/// [`ApiErrorKind::BadRequest`] if `text` or `max_tokens` is missing, not an
/// integer, or not positive; [`ApiErrorKind::Internal`] if the tokenizer fails.
///
/// # Examples
///
/// ```rust
/// use paraslab::api::{chunk, ChunkRequest};
/// use paraslab::CharTokenizer;
///
/// let request = ChunkRequest {
///     text: Some("hello\n\nworld".into()),
///     max_tokens: Some(100.into()),
/// };
/// let response = chunk(&CharTokenizer::new(), request).unwrap();
///
/// assert_eq!(response.chunks, ["hello\nworld"]);
/// assert_eq!(response.actual_total_tokens_in_chunks, 11);
/// ```
pub fn chunk<T: Tokenizer + ?Sized>(
    tokenizer: &T,
    request: ChunkRequest,
) -> Result<ChunkResponse, ApiError> {
    let (Some(text), Some(max_tokens)) = (request.text, request.max_tokens) else {
        return Err(ApiError::bad_request("Missing required parameters"));
    };
    let max_tokens = max_tokens.to_i64()?;
    let chunked = crate::chunk(tokenizer, &text, max_tokens)?;
    Ok(chunked.into())
}

/// Count the tokens of a text, implicit markers included, with a preview.
///
/// # Errors
///
/// [`ApiErrorKind::BadRequest`] if `text` is missing;
/// [`ApiErrorKind::Internal`] if the tokenizer fails.
pub fn tokenize<T: Tokenizer + ?Sized>(
    tokenizer: &T,
    request: TokenizeRequest,
) -> Result<TokenizeResponse, ApiError> {
    let text = request
        .text
        .ok_or_else(|| ApiError::bad_request("Missing text parameter"))?;
    let ids = tokenizer
        .encode(&text, Markers::Include)
        .map_err(Error::Tokenization)?;

    Ok(TokenizeResponse {
        token_count: ids.len(),
        tokens: preview(&ids),
    })
}

/// Encode [`HEALTH_PROBE`] and report whether it worked.
pub fn health<T: Tokenizer + ?Sized>(tokenizer: &T) -> HealthResponse {
    match tokenizer.count(HEALTH_PROBE, Markers::Include) {
        Ok(test_tokenization) => HealthResponse::Healthy {
            tokenizer: "loaded".to_string(),
            test_tokenization,
        },
        Err(err) => {
            tracing::warn!(error = %err, "tokenizer health probe failed");
            HealthResponse::Unhealthy {
                error: err.to_string(),
            }
        }
    }
}

/// First [`PREVIEW_LEN`] ids; then `"..."` if there are more; then the last
/// [`PREVIEW_LEN`] ids if there are more than twice that.
fn preview(ids: &[u32]) -> Vec<PreviewToken> {
    let mut out: Vec<PreviewToken> = ids
        .iter()
        .take(PREVIEW_LEN)
        .copied()
        .map(PreviewToken::Id)
        .collect();
    if ids.len() > PREVIEW_LEN {
        out.push(PreviewToken::Elided);
    }
    if ids.len() > 2 * PREVIEW_LEN {
        out.extend(ids[ids.len() - PREVIEW_LEN..].iter().copied().map(PreviewToken::Id));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BoxError, CharTokenizer};
    use serde_json::json;

    struct BrokenTokenizer;

    impl Tokenizer for BrokenTokenizer {
        fn encode(&self, _: &str, _: Markers) -> Result<Vec<u32>, BoxError> {
            Err("model file truncated".into())
        }

        fn decode(&self, _: &[u32], _: Markers) -> Result<String, BoxError> {
            Err("model file truncated".into())
        }
    }

    fn request(value: serde_json::Value) -> ChunkRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_max_tokens_coercion() {
        let cases = [
            (json!(5), Some(5)),
            (json!(5.9), Some(5)),
            (json!("12"), Some(12)),
            (json!(" 7 "), Some(7)),
            (json!("seven"), None),
        ];
        for (value, expected) in cases {
            let parsed: MaxTokens = serde_json::from_value(value.clone()).unwrap();
            assert_eq!(parsed.to_i64().ok(), expected, "{value}");
        }
    }

    #[test]
    fn test_missing_fields() {
        let tok = CharTokenizer::new();
        for body in [json!({}), json!({"text": "x"}), json!({"max_tokens": 5})] {
            let err = chunk(&tok, request(body)).unwrap_err();
            assert_eq!(err.kind, ApiErrorKind::BadRequest);
            assert_eq!(err.message, "Missing required parameters");
        }
    }

    #[test]
    fn test_non_positive_budget() {
        let tok = CharTokenizer::new();
        for max_tokens in [json!(0), json!(-5), json!("0"), json!(0.5)] {
            let err = chunk(&tok, request(json!({"text": "x", "max_tokens": max_tokens})))
                .unwrap_err();
            assert_eq!(err.kind, ApiErrorKind::BadRequest);
            assert_eq!(err.body().error, "max_tokens must be positive");
        }
    }

    #[test]
    fn test_chunk_response_shape() {
        let tok = CharTokenizer::new();
        let response = chunk(
            &tok,
            request(json!({"text": "aaaa\nbbbb\ncccc", "max_tokens": 8})),
        )
        .unwrap();

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "chunks": ["aaaa\nbbbb", "cccc"],
                "chunk_count": 2,
                "max_tokens_setting": 8,
                "actual_total_tokens_in_chunks": 13
            })
        );
    }

    #[test]
    fn test_tokenizer_failure_is_internal() {
        let err = chunk(&BrokenTokenizer, request(json!({"text": "x", "max_tokens": 5})))
            .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Internal);
        assert_eq!(err.message, "model file truncated");
    }

    #[test]
    fn test_blank_text_is_not_an_error() {
        let response = chunk(
            &BrokenTokenizer,
            request(json!({"text": "\n \n", "max_tokens": 5})),
        )
        .unwrap();
        assert_eq!(response.chunk_count, 0);
        assert_eq!(response.actual_total_tokens_in_chunks, 0);
    }

    #[test]
    fn test_preview_lengths() {
        let ids: Vec<u32> = (0..30).collect();

        assert_eq!(preview(&ids[..5]).len(), 5);
        // 15 ids: 10 shown, elided, no tail
        let p = preview(&ids[..15]);
        assert_eq!(p.len(), 11);
        assert_eq!(p[10], PreviewToken::Elided);
        // 30 ids: head, elided, tail
        let p = preview(&ids);
        assert_eq!(p.len(), 21);
        assert_eq!(p[11], PreviewToken::Id(20));
        assert_eq!(p[20], PreviewToken::Id(29));
    }

    #[test]
    fn test_tokenize_counts_markers() {
        let tok = CharTokenizer::new().with_markers(0xF0000, 0xF0001);
        let response = tokenize(&tok, TokenizeRequest { text: Some("hi".into()) }).unwrap();
        assert_eq!(response.token_count, 4);
        assert_eq!(
            serde_json::to_value(&response).unwrap()["tokens"],
            json!([0xF0000, 104, 105, 0xF0001])
        );

        let err = tokenize(&tok, TokenizeRequest::default()).unwrap_err();
        assert_eq!(err.message, "Missing text parameter");
    }

    #[test]
    fn test_preview_serializes_ellipsis() {
        let tok = CharTokenizer::new();
        let text = "a".repeat(12);
        let response = tokenize(&tok, TokenizeRequest { text: Some(text) }).unwrap();
        assert_eq!(serde_json::to_value(&response).unwrap()["tokens"][10], json!("..."));
    }

    #[test]
    fn test_health() {
        assert_eq!(
            serde_json::to_value(health(&CharTokenizer::new())).unwrap(),
            json!({"status": "healthy", "tokenizer": "loaded", "test_tokenization": 12})
        );
        let unhealthy = health(&BrokenTokenizer);
        assert!(!unhealthy.is_healthy());
        assert_eq!(
            serde_json::to_value(unhealthy).unwrap(),
            json!({"status": "unhealthy", "error": "model file truncated"})
        );
    }
}
