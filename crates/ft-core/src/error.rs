//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// The top-level error type for `ft-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("line geometry needs at least 2 coordinates, got {0}")]
    DegenerateLine(usize),

    #[error("coordinate is not finite: ({lon}, {lat})")]
    NonFinite { lon: f64, lat: f64 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `ft-*` crates.
pub type CoreResult<T> = Result<T, CoreError>;
