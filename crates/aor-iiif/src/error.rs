//! Error types for the aor-iiif crate.

use thiserror::Error;

/// Errors raised while building selectors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IiifError {
    /// The SVG shape name is not recognized.
    #[error("unknown svg shape: {0}")]
    UnknownShape(String),

    /// An SVG shape has fewer points than it needs.
    #[error("{shape} needs at least {required} points, found {found}")]
    TooFewPoints {
        /// Shape name.
        shape: &'static str,
        /// Minimum number of points.
        required: usize,
        /// Number of points given.
        found: usize,
    },
}
