/// Error types for the viewer

use thiserror::Error;

/// Errors from reading a color string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("color {0:?} must start with '#'")]
    MissingHash(String),

    #[error("color {0:?} must be #rgb or #rrggbb")]
    InvalidLength(String),

    #[error("color {0:?} contains a non-hex digit")]
    InvalidDigit(String),
}

/// Errors that can occur while fetching mesh source text
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {reference}")]
    Read {
        reference: String,
        #[source]
        error: std::io::Error,
    },

    #[error("fetching {reference} returned HTTP {status}")]
    Status { reference: String, status: u16 },

    #[error("failed to fetch {reference}: {message}")]
    Transport { reference: String, message: String },
}
