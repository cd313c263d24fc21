use thiserror::Error;

/// Core error type shared across seqgen crates.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A symbol is empty or otherwise unusable.
    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),
    /// The alphabet violates its invariants (duplicate symbols).
    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(String),
    /// A rule name does not resolve to a catalog entry.
    #[error("unknown rule: {0}")]
    UnknownRule(String),
    /// Request parameters are out of their valid range.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Convenience alias for results returned by seqgen crates.
pub type Result<T> = std::result::Result<T, Error>;
