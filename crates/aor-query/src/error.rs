//! Error types for request parsing.

use thiserror::Error;

/// A search request that cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The scope is not `collection`, `collection.book` or `collection.book.page`.
    #[error("invalid search scope: {0:?}")]
    InvalidScope(String),

    /// A parameter value is malformed.
    #[error("invalid value for parameter {name}: {value:?}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: String,
    },

    /// A parameter is not valid percent-encoding.
    #[error("parameter {name} is not valid percent-encoded UTF-8")]
    Encoding {
        /// Parameter name.
        name: String,
    },

    /// A quoted phrase is never closed.
    #[error("unclosed quote in query {0:?}")]
    UnclosedQuote(String),
}
