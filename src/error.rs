//! Error types for the paper2deck library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`DeckError`] — **Fatal**, but only at the harness level: the input file
//!   cannot be read, the configuration is invalid, the output cannot be
//!   written. Returned from the file helpers and [`crate::analyze::generate`].
//!   The heuristic analysis itself never fails; an empty document still
//!   produces a complete deck of placeholder slides.
//!
//! * [`LlmError`] — **Recovered**: the external language-model call failed
//!   (transport, status, missing content, malformed payload). The merge policy
//!   logs it and hands back the untouched heuristic baseline, so callers of
//!   `generate` never see it. It is public so custom
//!   [`crate::client::ChatCompletionClient`] implementations can report
//!   failures with the same vocabulary.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors returned by the paper2deck harness functions.
#[derive(Debug, Error)]
pub enum DeckError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The extracted-document file does not exist.
    #[error("Document file not found: '{path}'\nCheck the path exists and is readable.")]
    DocumentNotFound { path: PathBuf },

    /// The file was read but is not valid extractor JSON.
    #[error("Document '{path}' is not a valid extracted document: {detail}")]
    InvalidDocument { path: PathBuf, detail: String },

    /// The figure manifest could not be read or parsed.
    #[error("Figure manifest '{path}' is invalid: {detail}")]
    InvalidFigures { path: PathBuf, detail: String },

    /// Reading an input file failed for a reason other than "not found".
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the deck file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// LLM mode was requested but the provider cannot be constructed.
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A failure of the LLM augmentation path.
///
/// Never escapes [`crate::pipeline::llm::augment`]; it is logged and the
/// heuristic deck is returned instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LlmError {
    /// The request never produced a response (DNS, connect, TLS, body read).
    #[error("{provider} request failed: {detail}")]
    Transport { provider: String, detail: String },

    /// The HTTP client gave up waiting.
    #[error("{provider} request timed out")]
    Timeout { provider: String },

    /// The API answered with a non-success status.
    #[error("{provider} request failed: {status} {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },

    /// The response parsed, but had no usable content field.
    #[error("{provider} response missing content")]
    MissingContent { provider: String },

    /// The content was not a JSON deck payload.
    #[error("LLM payload is not valid deck JSON: {0}")]
    MalformedPayload(String),
}
