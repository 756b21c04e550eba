//! Internal error taxonomy for expansion and rewriting.
//!
//! Nothing here escapes the public pipeline surface: every failure degrades
//! to "link unchanged" or "rewrite declined" at the boundary where it is
//! caught. The enum exists so remote providers and the expander can use `?`
//! internally and log a meaningful cause before falling back.

use thiserror::Error;

/// Failures that can occur while expanding or rewriting a single link.
#[derive(Debug, Error)]
pub enum RewriteError {
    /// Transport-level failure: timeout, DNS, connection reset, TLS.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The input (or an intermediate candidate) is not a parseable URL.
    #[error("malformed URL: {0}")]
    MalformedUrl(#[from] url::ParseError),

    /// A partner API answered with something other than its documented
    /// shape (missing field, error payload, non-2xx body).
    #[error("unexpected partner API response: {0}")]
    PartnerContract(String),
}

/// Convenience alias for internal fallible operations.
pub type RewriteResult<T> = Result<T, RewriteError>;
