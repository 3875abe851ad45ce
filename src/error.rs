//! Error types for rs-readable.
//!
//! Only parsing and top-level orchestration can fail; the simplification
//! passes are infallible tree rewrites and the scoring engine returns 0.0
//! for degenerate input instead of erroring.

/// Error type for content location and simplification.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input could not be tokenized into an HTML document.
    #[error("HTML parsing failed: {0}")]
    Parse(String),

    /// The parsed document lacks a body element.
    #[error("document has no body: {0}")]
    Structure(String),

    /// An operation exceeded its deadline.
    #[error("operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// A worker thread died before producing a result.
    #[error("worker thread failed: {0}")]
    WorkerFailed(String),

    /// Parsing failed even after the repair fallback was attempted.
    #[error("parse repair fallback exhausted: {0}")]
    ExhaustedFallback(String),

    /// An operation kept failing after the configured number of retries.
    #[error("failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        /// Total attempts made, including the first.
        attempts: usize,
        /// The last error observed.
        #[source]
        source: Box<Error>,
    },
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
